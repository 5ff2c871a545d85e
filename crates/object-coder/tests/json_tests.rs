use object_coder::{
    decode, encode, CoderError, KeyDecodingStrategy, KeyEncodingStrategy, Map, Object,
};
use serde_json::json;
use std::collections::BTreeMap;

// ============================================================================
// Object → JSON
// ============================================================================

#[test]
fn to_json_renders_every_shape() {
    let object = Object::Map(
        [
            ("flag", Object::Bool(true)),
            ("small", Object::Int8(-3)),
            ("big", Object::UInt64(u64::MAX)),
            ("ratio", Object::Float32(0.5)),
            ("name", Object::String("x".into())),
            ("list", Object::Array(vec![Object::Null, Object::UInt(2)])),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(
        object.to_json(),
        json!({
            "flag": true,
            "small": -3,
            "big": u64::MAX,
            "ratio": 0.5,
            "name": "x",
            "list": [null, 2],
        })
    );
}

#[test]
fn to_json_keeps_map_order() {
    let object = encode(&{
        let mut m = BTreeMap::new();
        m.insert("b".to_string(), 1u8);
        m.insert("a".to_string(), 2u8);
        m
    })
    .unwrap();
    let text = serde_json::to_string(&object.to_json()).unwrap();
    assert_eq!(text, r#"{"a":2,"b":1}"#);
}

#[test]
fn non_finite_floats_become_null() {
    assert_eq!(Object::Float64(f64::NAN).to_json(), serde_json::Value::Null);
    assert_eq!(Object::Float32(f32::INFINITY).to_json(), serde_json::Value::Null);
}

// ============================================================================
// JSON → Object
// ============================================================================

#[test]
fn from_json_value_picks_widest_numbers() {
    let object = Object::from(json!({
        "neg": -1,
        "pos": 1,
        "huge": u64::MAX,
        "frac": 1.25,
        "nothing": null,
    }));
    let map = object.as_map().unwrap();
    assert_eq!(map.get("neg"), Some(&Object::Int64(-1)));
    assert_eq!(map.get("pos"), Some(&Object::Int64(1)));
    assert_eq!(map.get("huge"), Some(&Object::UInt64(u64::MAX)));
    assert_eq!(map.get("frac"), Some(&Object::Float64(1.25)));
    assert_eq!(map.get("nothing"), Some(&Object::Null));
}

#[test]
fn serde_json_roundtrip_through_text() {
    let text = r#"{"z":[1,-2,3.5,"s",null,true],"a":{}}"#;
    let object: Object = serde_json::from_str(text).unwrap();

    let keys: Vec<&str> = object.as_map().unwrap().keys().collect();
    assert_eq!(keys, vec!["z", "a"]);
    assert_eq!(serde_json::to_string(&object).unwrap(), text);
}

#[test]
fn duplicate_json_keys_keep_last_value() {
    let object: Object = serde_json::from_str(r#"{"k":1,"j":0,"k":2}"#).unwrap();
    let expected: Map = [("k", Object::UInt64(2)), ("j", Object::UInt64(0))]
        .into_iter()
        .collect();
    assert_eq!(object, Object::Map(expected));
}

#[test]
fn width_checks_apply_after_json() {
    let object: Object = serde_json::from_str("[127, 128, -1]").unwrap();
    let items = object.as_array().unwrap();

    assert_eq!(decode::<i8>(&items[0]).unwrap(), 127);
    assert!(matches!(
        decode::<i8>(&items[1]),
        Err(CoderError::NumberOutOfRange { target: "i8", .. })
    ));
    assert_eq!(decode::<u8>(&items[1]).unwrap(), 128);
    assert!(decode::<u32>(&items[2]).is_err());
    assert_eq!(decode::<Vec<i16>>(&object).unwrap(), vec![127, 128, -1]);
}

#[test]
fn encoded_values_survive_json_text() {
    let values: Vec<Option<String>> = vec![Some("a".into()), None];
    let object = encode(&values).unwrap();
    let text = serde_json::to_string(&object).unwrap();
    assert_eq!(text, r#"["a",null]"#);

    let back: Object = serde_json::from_str(&text).unwrap();
    assert_eq!(decode::<Vec<Option<String>>>(&back).unwrap(), values);
}

// ============================================================================
// Key strategies
// ============================================================================

#[test]
fn to_snake_case_examples() {
    let cases = [
        ("myValue", "my_value"),
        ("myURLProperty", "my_url_property"),
        ("URL", "url"),
        ("already_snake", "already_snake"),
        ("value2Go", "value2_go"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(
            KeyEncodingStrategy::ConvertToSnakeCase.apply(input),
            expected,
            "{input}"
        );
    }
    assert_eq!(KeyEncodingStrategy::UseDefaultKeys.apply("myValue"), "myValue");
}

#[test]
fn from_snake_case_examples() {
    let cases = [
        ("my_value", "myValue"),
        ("my_url_property", "myUrlProperty"),
        ("_leading", "_leading"),
        ("__two_words__", "__twoWords__"),
        ("single", "single"),
        ("___", "___"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(
            KeyDecodingStrategy::ConvertFromSnakeCase.apply(input),
            expected,
            "{input}"
        );
    }
    assert_eq!(KeyDecodingStrategy::UseDefaultKeys.apply("my_value"), "my_value");
}
