//! Basic JSON and JSV serialization.
//!
//! Run with: cargo run --example simple

use std::error::Error;
use typetext::{reflect_object, to_json, to_jsv};

struct User {
    id: u32,
    name: String,
    email: Option<String>,
}

reflect_object!(User { id as "Id", name as "Name", email as "Email" });

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: Some("alice@example.com".to_string()),
        },
        User {
            id: 43,
            name: "Smith, Bob".to_string(),
            email: None,
        },
    ];

    println!("JSON:\n{}\n", to_json(&users)?);
    println!("JSV:\n{}", to_jsv(&users)?);

    Ok(())
}
