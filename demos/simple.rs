//! Basic serialization and materialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_construct::{from_str, materialize, serialize, to_string, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    // Serde data goes through a value tree
    let text = to_string(&users)?;
    println!("Serde output:\n{}\n", text);

    let users_back: Vec<User> = from_str(&text)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful\n");

    // Values JSON cannot carry
    let value = Value::object([
        ("missing", Value::Undefined),
        ("ratio", Value::from(f64::NAN)),
        ("zero", Value::from(-0.0)),
        ("huge", Value::BigInt("123456789012345678901234567890".parse()?)),
        ("created", Value::date_from_millis(1_700_000_000_000.0)),
        ("tags", Value::set([Value::from("a"), Value::from("b")])),
    ]);

    let text = serialize(&value)?;
    println!("Value output:\n{}\n", text);

    let back = materialize(&text)?;
    assert_eq!(back, value);
    println!("✓ Round-trip successful");

    Ok(())
}
