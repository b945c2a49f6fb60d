//! Building and inspecting values at runtime.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_construct::{materialize, serialize_with_options, to_value, value, Options, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with the value! macro
    let config = value!({
        host: "localhost",
        port: 8080,
        features: ["auth", "logging", "metrics"],
        debug: true,
        timeout: void
    });

    println!("Config:\n{}\n", serialize_with_options(&config, Options::pretty())?);

    // Access values dynamically
    if let Some(obj) = config.as_object() {
        if let Some(Value::String(host)) = obj.get("host") {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(|v| v.as_f64()) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::Array(features)) = obj.get("features") {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    // Convert existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!(
        "User as Value:\n{}\n",
        serialize_with_options(&user_value, Options::pretty())?
    );

    // Runtime type checking
    let parsed = materialize(
        r#"[BigInt("12"), Date(2024, 0, 1), Map(["k", void]), RegExp("x+", "g"), $Date]"#,
    )?;
    println!("Kinds:");
    if let Some(items) = parsed.as_array() {
        for item in items.to_vec() {
            println!("  {:<8} {}", item.kind(), item.to_display_string());
        }
    }
    println!("\nType checks:");
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());
    println!("  is_string: {}", user_value.is_string());

    Ok(())
}
