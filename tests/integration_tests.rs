use serde::{Deserialize, Serialize};
use serde_construct::{
    from_reader, from_slice, from_str, from_value, to_string, to_string_pretty,
    to_string_with_options, to_value, to_writer, Error, Mode, Options, Value,
};
use std::collections::HashMap;
use std::io::Cursor;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

#[test]
fn test_simple_struct() {
    let text = to_string(&alice()).unwrap();
    assert_eq!(
        text,
        r#"{id:123,name:"Alice",active:true,tags:["admin","developer"]}"#
    );

    let user_back: User = from_str(&text).unwrap();
    assert_eq!(alice(), user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: alice(),
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
    };

    let text = to_string_pretty(&order).unwrap();
    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_enums() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Event {
        Started,
        Progress(u8),
        Moved { x: i32, y: i32 },
        Pair(String, bool),
    }

    let events = vec![
        Event::Started,
        Event::Progress(50),
        Event::Moved { x: -1, y: 2 },
        Event::Pair("ok".to_string(), false),
    ];
    let text = to_string(&events).unwrap();
    assert_eq!(
        text,
        r#"["Started",{Progress:50},{Moved:{x:-1,y:2}},{Pair:["ok",false]}]"#
    );
    let back: Vec<Event> = from_str(&text).unwrap();
    assert_eq!(events, back);
}

#[test]
fn test_options_and_maps() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        nickname: Option<String>,
        settings: HashMap<String, i64>,
    }

    let profile = Profile {
        nickname: None,
        settings: HashMap::from([("volume".to_string(), 7), ("max level".to_string(), -3)]),
    };
    let text = to_string(&profile).unwrap();
    assert!(text.contains(r#""max level":-3"#));
    let back: Profile = from_str(&text).unwrap();
    assert_eq!(profile, back);
}

#[test]
fn test_special_floats() {
    let values = vec![f64::INFINITY, f64::NEG_INFINITY, -0.0, 1e300, 5e-324];
    let text = to_string(&values).unwrap();
    assert_eq!(text, "[Infinity,-Infinity,-0,1e+300,5e-324]");

    let back: Vec<f64> = from_str(&text).unwrap();
    assert_eq!(back, values);
    assert!(back[2].is_sign_negative());

    let nan: f64 = from_str("NaN").unwrap();
    assert!(nan.is_nan());
}

#[test]
fn test_integer_extremes() {
    let values = (i64::MIN, i64::MAX, u64::MAX, 9_007_199_254_740_991i64);
    let text = to_string(&values).unwrap();
    assert_eq!(
        text,
        r#"[BigInt("-9223372036854775808"),BigInt("9223372036854775807"),BigInt("18446744073709551615"),9007199254740991]"#
    );
    let back: (i64, i64, u64, i64) = from_str(&text).unwrap();
    assert_eq!(back, values);
}

#[test]
fn test_unicode_and_escapes() {
    let text = "héllo \"wörld\"\n\t🎉 \u{0}";
    let serialized = to_string(&text).unwrap();
    let back: String = from_str(&serialized).unwrap();
    assert_eq!(back, text);
}

#[test]
fn test_writer_and_reader() {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, &alice()).unwrap();
    let user: User = from_reader(Cursor::new(&buffer)).unwrap();
    assert_eq!(user, alice());

    let user: User = from_slice(&buffer).unwrap();
    assert_eq!(user, alice());
}

#[test]
fn test_binding_mode_output_reads_back() {
    let options = Options::new().with_mode(Mode::Binding);
    let text = to_string_with_options(&vec![vec![1, 2], vec![3]], options).unwrap();
    assert_eq!(text, "$0=[$1=[1,2],$2=[3]]");
    let back: Vec<Vec<u8>> = from_str(&text).unwrap();
    assert_eq!(back, vec![vec![1, 2], vec![3]]);
}

#[test]
fn test_reading_builtins_into_rust_types() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Record {
        created: String,
        ids: Vec<u32>,
        labels: HashMap<String, bool>,
        error: String,
        bytes: Vec<u8>,
    }

    let record: Record = from_str(
        r#"{
            created: Date(2024, 0, 31, 8, 0, 0, 0),
            ids: Set(3, 1, 3),
            labels: Map(["a", true], ["b", false]),
            error: TypeError("bad input"),
            bytes: Uint8Array(1, 2, 3)
        }"#,
    )
    .unwrap();

    assert_eq!(record.created, "2024-01-31T08:00:00.000Z");
    assert_eq!(record.ids, vec![3, 1]);
    assert_eq!(record.labels.get("b"), Some(&false));
    assert_eq!(record.error, "bad input");
    assert_eq!(record.bytes, vec![1, 2, 3]);
}

#[test]
fn test_value_round_trip_through_serde() {
    let value = to_value(&alice()).unwrap();
    assert_eq!(value.as_object().unwrap().get("id"), Some(Value::from(123)));
    let back: User = from_value(value).unwrap();
    assert_eq!(back, alice());
}

#[test]
fn test_shape_mismatch() {
    let result: Result<User, Error> = from_str("{id: \"not a number\"}");
    assert!(result.is_err());

    let result: Result<User, Error> = from_str("{id: 1,");
    assert!(matches!(result, Err(Error::Syntax { .. })));
}
