use object_coder::{
    decode, CoderError, CodingKey, CodingPath, Decodable, Decoder, Key, KeyDecodingStrategy, Map,
    Object, ObjectDecoder, ObjectKind, Result,
};
use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;

fn map(entries: Vec<(&str, Object)>) -> Object {
    Object::Map(entries.into_iter().collect())
}

fn path(keys: Vec<Key>) -> CodingPath {
    CodingPath::from(keys)
}

/// Reads any string key, so tests can address arbitrary map entries.
#[derive(Debug, Clone, PartialEq)]
struct Name(String);

impl CodingKey for Name {
    fn string_value(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.0)
    }

    fn from_string_value(value: &str) -> Option<Self> {
        Some(Name(value.to_string()))
    }
}

fn name(s: &str) -> Name {
    Name(s.to_string())
}

// ============================================================================
// Numeric coercion
// ============================================================================

#[test]
fn integer_out_of_range_for_narrower_target() {
    let err = decode::<i8>(&Object::UInt8(200)).unwrap_err();
    assert_eq!(
        err,
        CoderError::NumberOutOfRange {
            path: CodingPath::root(),
            value: "200".to_string(),
            target: "i8",
        }
    );
    assert_eq!(decode::<i16>(&Object::UInt8(200)).unwrap(), 200);
}

#[test]
fn integers_cross_widths_when_value_fits() {
    assert_eq!(decode::<u8>(&Object::Int64(255)).unwrap(), 255);
    assert_eq!(decode::<i64>(&Object::UInt64(42)).unwrap(), 42);
    assert_eq!(decode::<usize>(&Object::Int16(7)).unwrap(), 7);
    assert_eq!(decode::<u64>(&Object::UInt(u64::MAX as usize)).unwrap(), u64::MAX);
    assert!(decode::<i64>(&Object::UInt64(u64::MAX)).is_err());
    assert!(decode::<u32>(&Object::Int64(i64::from(u32::MAX) + 1)).is_err());
}

#[test]
fn negative_into_unsigned_fails() {
    let err = decode::<u8>(&Object::Int64(-1)).unwrap_err();
    assert!(matches!(
        err,
        CoderError::NumberOutOfRange { target: "u8", .. }
    ));
    assert!(decode::<u64>(&Object::Int8(-1)).is_err());
}

#[test]
fn integral_float_decodes_into_integer() {
    assert_eq!(decode::<i32>(&Object::Float64(3.0)).unwrap(), 3);
    assert_eq!(decode::<u8>(&Object::Float32(255.0)).unwrap(), 255);
    assert_eq!(decode::<i64>(&Object::Float64(-0.0)).unwrap(), 0);
}

#[test]
fn fractional_or_non_finite_float_into_integer_fails() {
    for value in [1.5, f64::NAN, f64::INFINITY, 1e300] {
        let err = decode::<i64>(&Object::Float64(value)).unwrap_err();
        assert!(
            matches!(err, CoderError::NumberOutOfRange { target: "i64", .. }),
            "{value}: {err}"
        );
    }
    assert!(decode::<u8>(&Object::Float64(256.0)).is_err());
}

#[test]
fn f32_rejects_finite_doubles_beyond_its_range() {
    let err = decode::<f32>(&Object::Float64(1e300)).unwrap_err();
    assert!(matches!(err, CoderError::NumberOutOfRange { target: "f32", .. }));

    assert_eq!(decode::<f32>(&Object::Float64(0.5)).unwrap(), 0.5);
    assert_eq!(
        decode::<f32>(&Object::Float64(f64::INFINITY)).unwrap(),
        f32::INFINITY
    );
    assert!(decode::<f32>(&Object::Float64(f64::NAN)).unwrap().is_nan());
}

#[test]
fn floats_accept_integers() {
    assert_eq!(decode::<f64>(&Object::Int32(-4)).unwrap(), -4.0);
    assert_eq!(decode::<f32>(&Object::UInt8(9)).unwrap(), 9.0);
    assert_eq!(decode::<f64>(&Object::Float32(0.25)).unwrap(), 0.25);
}

// ============================================================================
// Shape errors
// ============================================================================

#[test]
fn wrong_scalar_shape_is_type_mismatch() {
    let err = decode::<bool>(&Object::Int8(1)).unwrap_err();
    assert_eq!(
        err,
        CoderError::TypeMismatch {
            path: CodingPath::root(),
            expected: "bool",
            found: ObjectKind::Int8,
        }
    );
    assert!(matches!(
        decode::<String>(&Object::Bool(true)),
        Err(CoderError::TypeMismatch { expected: "string", .. })
    ));
    assert!(matches!(
        decode::<i32>(&Object::String("1".into())),
        Err(CoderError::TypeMismatch { expected: "i32", .. })
    ));
}

#[test]
fn null_is_value_not_found() {
    let err = decode::<bool>(&Object::Null).unwrap_err();
    assert_eq!(
        err,
        CoderError::ValueNotFound {
            path: CodingPath::root(),
            expected: "bool",
        }
    );
    assert!(matches!(
        decode::<Vec<u8>>(&Object::Null),
        Err(CoderError::ValueNotFound { expected: "array", .. })
    ));
}

#[test]
fn keyed_container_over_array_is_type_mismatch() {
    #[derive(Debug)]
    struct NeedsMap;
    impl Decodable for NeedsMap {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            decoder.container::<Name>()?;
            Ok(NeedsMap)
        }
    }

    let err = decode::<NeedsMap>(&Object::Array(vec![])).unwrap_err();
    assert_eq!(
        err,
        CoderError::TypeMismatch {
            path: CodingPath::root(),
            expected: "map",
            found: ObjectKind::Array,
        }
    );
}

#[test]
fn unkeyed_container_over_map_is_type_mismatch() {
    let err = decode::<Vec<u8>>(&map(vec![])).unwrap_err();
    assert!(matches!(
        err,
        CoderError::TypeMismatch {
            expected: "array",
            found: ObjectKind::Map,
            ..
        }
    ));
}

#[test]
fn unparsable_url_is_malformed() {
    let url: Url = decode(&Object::String("https://apple.com".into())).unwrap();
    assert_eq!(url.as_str(), "https://apple.com/");

    let err = decode::<Url>(&Object::String("not a url".into())).unwrap_err();
    assert!(matches!(err, CoderError::Malformed { .. }), "{err}");
    assert!(err.to_string().contains("not a url"), "{err}");

    let err = decode::<Url>(&Object::Int32(1)).unwrap_err();
    assert!(matches!(err, CoderError::TypeMismatch { .. }), "{err}");
}

#[test]
fn char_needs_exactly_one_character() {
    assert_eq!(decode::<char>(&Object::String("x".into())).unwrap(), 'x');
    for s in ["", "ab"] {
        let err = decode::<char>(&Object::String(s.into())).unwrap_err();
        assert!(matches!(err, CoderError::Malformed { .. }), "{s:?}: {err}");
    }
}

// ============================================================================
// Keyed containers
// ============================================================================

#[derive(Debug)]
struct Single {
    value: i32,
}

impl Decodable for Single {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let c = decoder.container::<Name>()?;
        Ok(Single {
            value: c.decode(name("value"))?,
        })
    }
}

#[test]
fn missing_key_is_key_not_found() {
    let err = decode::<Single>(&map(vec![("other", Object::Int32(1))])).unwrap_err();
    assert_eq!(
        err,
        CoderError::KeyNotFound {
            path: CodingPath::root(),
            key: Key::named("value"),
        }
    );
}

#[test]
fn keyed_errors_carry_the_key_in_their_path() {
    let err = decode::<Single>(&map(vec![("value", Object::String("x".into()))])).unwrap_err();
    assert_eq!(err.path(), &path(vec![Key::named("value")]));
    assert!(err.to_string().contains("at value"), "{err}");
}

#[test]
fn keyed_lookup_helpers() {
    struct Check;
    impl Decodable for Check {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let c = decoder.container::<Name>()?;
            assert_eq!(c.all_keys(), vec![name("b"), name("a"), name("n")]);
            assert!(c.contains(&name("a")));
            assert!(!c.contains(&name("z")));

            assert!(c.decode_nil(name("n"))?);
            assert!(!c.decode_nil(name("a"))?);
            assert!(matches!(
                c.decode_nil(name("z")),
                Err(CoderError::KeyNotFound { .. })
            ));

            assert_eq!(c.decode_if_present::<u8>(name("n"))?, None);
            assert_eq!(c.decode_if_present::<u8>(name("z"))?, None);
            assert_eq!(c.decode_if_present::<u8>(name("a"))?, Some(1));
            Ok(Check)
        }
    }

    let object = map(vec![
        ("b", Object::UInt8(2)),
        ("a", Object::UInt8(1)),
        ("n", Object::Null),
    ]);
    decode::<Check>(&object).unwrap();
}

#[test]
fn super_decoder_over_missing_key_reads_null() {
    struct Base(Option<u8>);
    impl Decodable for Base {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let c = decoder.container::<Name>()?;
            let sup = c.super_decoder();
            assert_eq!(sup.coding_path(), &path(vec![Key::named("super")]));
            Ok(Base(Option::<u8>::decode(&sup)?))
        }
    }

    assert_eq!(decode::<Base>(&map(vec![])).unwrap().0, None);
    assert_eq!(
        decode::<Base>(&map(vec![("super", Object::UInt8(4))])).unwrap().0,
        Some(4)
    );
}

#[test]
fn snake_case_keys_read_as_camel_case() {
    #[derive(Debug, PartialEq)]
    struct Profile {
        display_name: String,
        item_count: u32,
    }

    impl Decodable for Profile {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let c = decoder.container::<Name>()?;
            Ok(Profile {
                display_name: c.decode(name("displayName"))?,
                item_count: c.decode(name("itemCount"))?,
            })
        }
    }

    let object = map(vec![
        ("display_name", Object::String("Ada".into())),
        ("item_count", Object::UInt32(3)),
    ]);
    let decoder = ObjectDecoder::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
    assert_eq!(
        decoder.decode::<Profile>(&object).unwrap(),
        Profile {
            display_name: "Ada".into(),
            item_count: 3,
        }
    );

    // Without the strategy the camelCase keys are not there.
    assert_eq!(
        decode::<Profile>(&object).unwrap_err(),
        CoderError::KeyNotFound {
            path: CodingPath::root(),
            key: Key::named("displayName"),
        }
    );
}

#[test]
fn all_keys_applies_decoding_strategy() {
    struct Keys(Vec<Name>);
    impl Decodable for Keys {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            Ok(Keys(decoder.container::<Name>()?.all_keys()))
        }
    }

    let object = map(vec![("user_id", Object::Null), ("_private", Object::Null)]);
    let decoder = ObjectDecoder::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
    assert_eq!(
        decoder.decode::<Keys>(&object).unwrap().0,
        vec![name("userId"), name("_private")]
    );
}

#[test]
fn colliding_converted_keys_are_malformed() {
    let object = map(vec![("my_value", Object::UInt8(1)), ("myValue", Object::UInt8(2))]);
    let decoder = ObjectDecoder::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
    let err = decoder.decode::<BTreeMap<String, u8>>(&object).unwrap_err();
    assert_eq!(
        err,
        CoderError::Malformed {
            path: CodingPath::root(),
            message: r#"stored keys "my_value" and "myValue" both decode as "myValue""#.to_string(),
        }
    );

    // Default keys keep both entries.
    let both: BTreeMap<String, u8> = decode(&object).unwrap();
    assert_eq!(both.len(), 2);
}

#[test]
fn nested_key_collision_reports_container_path() {
    let inner = map(vec![("a_b", Object::Null), ("aB", Object::Null)]);
    let object = map(vec![("outer", Object::Array(vec![inner]))]);
    let decoder = ObjectDecoder::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
    let err = decoder
        .decode::<BTreeMap<String, Vec<BTreeMap<String, Option<u8>>>>>(&object)
        .unwrap_err();
    assert!(matches!(err, CoderError::Malformed { .. }), "{err}");
    assert_eq!(err.path(), &path(vec![Key::named("outer"), Key::index(0)]));
}

// ============================================================================
// Unkeyed containers
// ============================================================================

#[test]
fn decoding_past_the_end_is_at_end() {
    #[derive(Debug)]
    struct Pair(u8, u8);
    impl Decodable for Pair {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let mut c = decoder.unkeyed_container()?;
            Ok(Pair(c.decode()?, c.decode()?))
        }
    }

    let err = decode::<Pair>(&Object::Array(vec![Object::UInt8(1)])).unwrap_err();
    assert_eq!(
        err,
        CoderError::AtEnd {
            path: path(vec![Key::index(1)]),
            count: 1,
        }
    );
}

#[test]
fn nested_element_errors_report_index_path() {
    let object = Object::Array(vec![Object::Array(vec![
        Object::UInt8(1),
        Object::String("two".into()),
    ])]);
    let err = decode::<Vec<Vec<u8>>>(&object).unwrap_err();
    assert_eq!(err.path(), &path(vec![Key::index(0), Key::index(1)]));
    assert!(matches!(err, CoderError::TypeMismatch { found: ObjectKind::String, .. }));
}

#[test]
fn decode_nil_only_consumes_null() {
    struct Check;
    impl Decodable for Check {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let mut c = decoder.unkeyed_container()?;
            assert_eq!(c.count(), 3);
            assert!(!c.decode_nil()?);
            assert_eq!(c.current_index(), 0);
            assert_eq!(c.decode::<u8>()?, 5);
            assert!(c.decode_nil()?);
            assert_eq!(c.current_index(), 2);
            assert_eq!(c.decode_if_present::<String>()?, Some("s".to_string()));
            assert!(c.is_at_end());
            assert!(matches!(c.decode_nil(), Err(CoderError::AtEnd { .. })));
            Ok(Check)
        }
    }

    let object = Object::Array(vec![Object::UInt8(5), Object::Null, Object::String("s".into())]);
    decode::<Check>(&object).unwrap();
}

#[test]
fn failed_decode_does_not_advance_cursor() {
    struct Check;
    impl Decodable for Check {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let mut c = decoder.unkeyed_container()?;
            assert!(c.decode::<bool>().is_err());
            assert_eq!(c.current_index(), 0);
            assert_eq!(c.decode::<String>()?, "x");
            Ok(Check)
        }
    }

    decode::<Check>(&Object::Array(vec![Object::String("x".into())])).unwrap();
}

#[test]
fn nested_unkeyed_containers_advance_and_carry_index() {
    struct Check;
    impl Decodable for Check {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let mut c = decoder.unkeyed_container()?;
            let keyed = c.nested_container::<Name>()?;
            assert_eq!(keyed.coding_path(), &path(vec![Key::index(0)]));
            let inner = c.nested_unkeyed_container()?;
            assert_eq!(inner.coding_path(), &path(vec![Key::index(1)]));
            assert_eq!(inner.count(), 0);
            let sup = c.super_decoder()?;
            assert_eq!(sup.coding_path(), &path(vec![Key::index(2)]));
            assert!(c.is_at_end());
            Ok(Check)
        }
    }

    let object = Object::Array(vec![map(vec![]), Object::Array(vec![]), Object::Null]);
    decode::<Check>(&object).unwrap();
}

// ============================================================================
// Decoder context
// ============================================================================

#[test]
fn user_info_is_visible_to_nested_decoders() {
    struct Scaled(Vec<i64>);
    impl Decodable for Scaled {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let factor = decoder
                .user_info()
                .get("factor")
                .and_then(Object::as_integer)
                .unwrap_or(1) as i64;
            let mut c = decoder.unkeyed_container()?;
            let mut out = Vec::new();
            while !c.is_at_end() {
                let n: i64 = c.decode()?;
                out.push(n * factor);
            }
            Ok(Scaled(out))
        }
    }

    let decoder = ObjectDecoder::new().with_user_info("factor", 10i64);
    let object = Object::Array(vec![Object::Int64(1), Object::Int64(2)]);
    assert_eq!(decoder.decode::<Scaled>(&object).unwrap().0, vec![10, 20]);
}

#[test]
fn malformed_reports_decoder_path() {
    #[derive(Debug)]
    struct Even(u8);
    impl Decodable for Even {
        fn decode(decoder: &Decoder<'_>) -> Result<Self> {
            let n = u8::decode(decoder)?;
            if n % 2 != 0 {
                return Err(decoder.malformed(format!("{n} is odd")));
            }
            Ok(Even(n))
        }
    }

    let object = Object::Array(vec![Object::UInt8(2), Object::UInt8(3)]);
    let err = decode::<Vec<Even>>(&object).unwrap_err();
    assert_eq!(
        err,
        CoderError::Malformed {
            path: path(vec![Key::index(1)]),
            message: "3 is odd".to_string(),
        }
    );
}

#[test]
fn decoding_leaves_input_untouched() {
    let object = map(vec![
        ("list", Object::Array(vec![Object::Int8(1), Object::Null])),
        ("nested", map(vec![("x", Object::Float64(0.5))])),
    ]);
    let before = object.clone();
    let _ = decode::<Object>(&object).unwrap();
    let _ = decode::<Vec<u8>>(&object);
    let _ = decode::<Single>(&object);
    assert_eq!(object, before);
}

#[test]
fn decode_into_map_types() {
    let object = map(vec![("a", Object::UInt8(1)), ("b", Object::Int64(2))]);
    let decoded: BTreeMap<String, u16> = decode(&object).unwrap();
    assert_eq!(decoded.get("a"), Some(&1));
    assert_eq!(decoded.get("b"), Some(&2));

    let entries: Map = [("k", Object::Bool(true))].into_iter().collect();
    let back: Object = decode(&Object::Map(entries.clone())).unwrap();
    assert_eq!(back, Object::Map(entries));
}
