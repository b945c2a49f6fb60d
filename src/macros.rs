/// Builds a [`Value`](crate::Value) from literal notation.
///
/// Arrays and objects are freshly allocated on every evaluation. Object keys
/// may be string literals or bare identifiers; anything else is converted with
/// `Value::from`.
///
/// ```rust
/// use serde_construct::{value, Value};
///
/// let v = value!({ name: "Ada", "year of birth": 1815, tags: ["math", null], gone: void });
/// let object = v.as_object().unwrap();
/// assert_eq!(object.get("year of birth"), Some(Value::from(1815)));
/// assert!(object.get("gone").unwrap().is_undefined());
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (void) => {
        $crate::Value::Undefined
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array($crate::Array::from_vec(vec![$($crate::value!($elem)),*]))
    };

    ({}) => {
        $crate::Value::Object($crate::Object::new())
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let object = $crate::Object::new();
        $(
            object.set($crate::value!(@key $key), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    (@key $key:ident) => {
        stringify!($key)
    };

    (@key $key:literal) => {
        $key
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Object, Value};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(void), Value::Undefined);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(42), Value::Number(42.0));
        assert_eq!(value!(-3.5), Value::Number(-3.5));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_arrays() {
        assert_eq!(value!([]), Value::array(Vec::<Value>::new()));
        assert_eq!(value!([1, "two", [null]]).as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_value_macro_objects() {
        assert_eq!(value!({}), Value::Object(Object::new()));

        let obj = value!({ "name": "Alice", age: 30 });
        let object = obj.as_object().unwrap();
        assert_eq!(object.keys(), vec!["name".to_string(), "age".to_string()]);
        assert_eq!(object.get("age"), Some(Value::from(30)));
    }

    #[test]
    fn test_value_macro_allocates_fresh_compounds() {
        let make = || value!({ inner: {} });
        assert!(!make().same(&make()));
    }
}
