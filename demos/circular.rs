//! The four reference modes on a graph with shared and circular references.
//!
//! Run with: cargo run --example circular

use serde_construct::{Mode, Notation, Object, Options, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut notation = Notation::new();

    // One list used twice
    let shared = Value::array([1, 2]);
    let pair = Value::array([shared.clone(), shared]);

    println!("Shared list:");
    for mode in [Mode::Basic, Mode::Repeat, Mode::Binding, Mode::Circular] {
        match notation.serialize_with(&pair, Options::new().with_mode(mode)) {
            Ok(text) => println!("  {:?}: {}", mode, text),
            Err(e) => println!("  {:?}: error: {}", mode, e),
        }
    }

    // Two people who know each other
    let alice = Object::new();
    let bob = Object::new();
    alice.set("name", "Alice");
    alice.set("friend", bob.clone());
    bob.set("name", "Bob");
    bob.set("friend", alice.clone());
    let graph = Value::Object(alice.clone());

    println!("\nCircular graph:");
    for mode in [Mode::Binding, Mode::Circular] {
        match notation.serialize_with(&graph, Options::new().with_mode(mode)) {
            Ok(text) => println!("  {:?}: {}", mode, text),
            Err(e) => println!("  {:?}: error: {}", mode, e),
        }
    }

    let text = notation.serialize_with(&graph, Options::new().with_mode(Mode::Circular))?;
    let back = notation.materialize(&text)?;
    let friend = back.as_object().and_then(|o| o.get("friend")).unwrap_or_default();
    let friend_of_friend = friend.as_object().and_then(|o| o.get("friend")).unwrap_or_default();
    assert!(friend_of_friend.same(&back));
    println!("\n✓ Cycle preserved after materializing");

    // Break the cycle so both objects are freed
    alice.remove("friend");
    if let Some(back) = back.as_object() {
        back.remove("friend");
    }

    Ok(())
}
