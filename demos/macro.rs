//! Using the value! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use std::error::Error;
use typetext::{to_json, to_jsv, value, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = value!(null);
    let bool_val = value!(true);
    let number = value!(42);
    let text = value!("Hello, JSV!");

    println!("Primitives (JSON / JSV):");
    println!("  null:   {} / {}", to_json(&null_val)?, to_jsv(&null_val)?);
    println!("  bool:   {} / {}", to_json(&bool_val)?, to_jsv(&bool_val)?);
    println!("  number: {} / {}", to_json(&number)?, to_jsv(&number)?);
    println!("  text:   {} / {}\n", to_json(&text)?, to_jsv(&text)?);

    let numbers = value!([1, 2, 3, 4, 5]);
    let mixed = value!([1, "two", true, null]);

    println!("Arrays:");
    println!("  Numbers: {}", to_jsv(&numbers)?);
    println!("  Mixed:   {}\n", to_jsv(&mixed)?);

    let config = value!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n{}\n", to_json(&config)?, to_jsv(&config)?);

    let items = vec![
        value!({"id": 1, "status": "active"}),
        value!({"id": 2, "status": "pending"}),
    ];
    let summary = value!({
        "total": 2,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", to_jsv(&summary)?);

    if let Value::Object(obj) = &config {
        if let Some(Value::Object(app)) = obj.get("app") {
            if let Some(name) = app.get("name").and_then(|v| v.as_str()) {
                println!("App name: {}", name);
            }
        }
    }

    Ok(())
}
