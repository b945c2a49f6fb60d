//! Registering constructions for your own classes.
//!
//! Run with: cargo run --example custom_types

use serde_construct::library::DATE;
use serde_construct::{
    Class, ConstructionSpec, Error as NotationError, Mode, Notation, Object, Options, TypeToken,
    Value,
};
use std::error::Error;

static POINT: Class = Class::new("Point").with_constructor(|this, args| {
    this.set("x", args.first().cloned().unwrap_or_default());
    this.set("y", args.get(1).cloned().unwrap_or_default());
    Ok(())
});

static READING: Class = Class::new("Reading");

fn point(x: f64, y: f64) -> Value {
    let point = Object::instance(TypeToken::of(&POINT));
    point.set("x", x);
    point.set("y", y);
    Value::Object(point)
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut notation = Notation::new();

    // Rebuilt by calling the constructor with the serialized arguments
    notation.registry_mut().register(
        ConstructionSpec::new(TypeToken::of(&POINT)).with_serializer(|value| {
            let point = value
                .as_object()
                .ok_or_else(|| NotationError::Serialization("not a point".into()))?;
            Ok(vec![
                point.get("x").unwrap_or_default(),
                point.get("y").unwrap_or_default(),
            ])
        }),
    )?;

    // Rebuilt from its own members under a namespaced identifier
    notation.registry_mut().register(
        ConstructionSpec::generic(TypeToken::of(&READING))
            .with_identifier("iot.Reading")
            .with_include(&DATE),
    )?;

    let path = Value::array([point(0.0, 0.0), point(3.5, -1.0)]);
    let text = notation.serialize(&path)?;
    println!("Points:\n{}\n", text);
    assert_eq!(notation.materialize(&text)?, path);

    let reading = Object::instance(TypeToken::of(&READING));
    reading.set("celsius", 21.5);
    reading.set("at", Value::date_from_millis(1_700_000_000_000.0));
    let reading = Value::Object(reading);

    let text = notation.serialize_with(&reading, Options::pretty())?;
    println!("Reading:\n{}\n", text);
    assert_eq!(notation.materialize(&text)?, reading);

    // Classes without a construction are rejected unless auto-included
    static GADGET: Class = Class::new("Gadget");
    let gadget = Value::Object(Object::instance(TypeToken::of(&GADGET)));
    match notation.serialize(&gadget) {
        Ok(text) => println!("Gadget: {}", text),
        Err(e) => println!("Gadget without construction: {}", e),
    }
    let options = Options::new().with_auto_include(true).with_mode(Mode::Binding);
    println!("Gadget auto-included: {}", notation.serialize_with(&gadget, options)?);

    println!("\nRegistered: {}", notation.registry().identifiers().join(", "));
    println!("✓ Round-trip successful");

    Ok(())
}
