use serde_construct::{serialize, value, Object, Value};

#[test]
fn test_value_macro_literals() {
    assert_eq!(value!(null), Value::Null);
    assert_eq!(value!(void), Value::Undefined);
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(false), Value::Bool(false));
    assert_eq!(value!(42), Value::Number(42.0));
    assert_eq!(value!(-123), Value::Number(-123.0));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::array(Vec::<Value>::new()));
    assert_eq!(
        value!([1, "hello", true, null]),
        Value::array([
            Value::from(1),
            Value::from("hello"),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn test_value_macro_nested() {
    let nested = value!({
        "user": {
            id: 123,
            name: "Bob",
            active: true
        },
        tags: ["admin", "developer"],
        count: 42
    });

    let object = nested.as_object().unwrap();
    assert_eq!(object.len(), 3);

    let user = object.get("user").unwrap();
    let user = user.as_object().unwrap();
    assert_eq!(user.get("id"), Some(Value::from(123)));
    assert_eq!(user.get("name"), Some(Value::from("Bob")));

    let tags = object.get("tags").unwrap();
    assert_eq!(tags.as_array().unwrap().to_vec(), vec![Value::from("admin"), Value::from("developer")]);

    assert_eq!(
        serialize(&nested).unwrap(),
        r#"{user:{id:123,name:"Bob",active:true},tags:["admin","developer"],count:42}"#
    );
}

#[test]
fn test_value_macro_expressions() {
    let name = String::from("Eve");
    let shared = Object::new();
    let v = value!({ name: (name.clone()), node: (shared.clone()) });
    let object = v.as_object().unwrap();
    assert_eq!(object.get("name"), Some(Value::from("Eve")));
    assert!(object.get("node").unwrap().same(&Value::Object(shared)));
}

#[test]
fn test_value_methods() {
    let null_val = value!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_number());
    assert!(!null_val.is_string());
    assert!(!null_val.is_array());
    assert!(!null_val.is_object());

    let bool_val = value!(true);
    assert_eq!(bool_val.as_bool(), Some(true));

    let str_val = value!("hello");
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = value!([1, 2, 3]);
    assert_eq!(array_val.as_array().unwrap().len(), 3);

    let obj_val = value!({ key: "value" });
    assert_eq!(obj_val.as_object().unwrap().len(), 1);
    assert_eq!(obj_val.kind(), "Object");
}
