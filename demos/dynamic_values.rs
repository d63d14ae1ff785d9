//! Writing values whose type is only known at runtime.
//!
//! Run with: cargo run --example dynamic_values

use std::error::Error;
use typetext::{reflect_object, to_json, to_jsv, to_string_dynamic, Format, Reflect, Value};

struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

reflect_object!(User { id, name, roles });

fn main() -> Result<(), Box<dyn Error>> {
    // Parse arbitrary JSON into a Value tree
    let config: Value = serde_json::from_str(
        r#"{"host":"localhost","port":8080,"features":["auth","logging"],"debug":true}"#,
    )?;
    println!("Config as JSV:\n{}\n", to_jsv(&config)?);

    if let Some(port) = config.as_object().and_then(|o| o.get("port")).and_then(Value::as_i64) {
        println!("Accessing field 'port': {}\n", port);
    }

    // Heterogeneous values behind Box<dyn Reflect> carry their type name
    let payload: Vec<Box<dyn Reflect>> = vec![
        Box::new(User {
            id: 123,
            name: "Alice".to_string(),
            roles: vec!["admin".to_string(), "developer".to_string()],
        }),
        Box::new("plain text"),
        Box::new(3.25),
        Box::new(config),
    ];
    println!("Mixed payload:\n{}\n", to_json(&payload)?);

    let user = User {
        id: 7,
        name: "Bob".to_string(),
        roles: vec![],
    };
    println!("As dynamic value:\n{}", to_string_dynamic(&user, Format::Jsv)?);

    Ok(())
}
