//! serde support for [`Object`], and conversions to and from `serde_json::Value`.
//!
//! This is how a tree leaves the process: any serde format can render an
//! `Object`, and any serde format can produce one. Integer widths collapse
//! on the way through a textual format, so a deserialized tree holds `Int64`,
//! `UInt64` and `Float64` numbers only; decoding re-applies the width checks.

use crate::object::{Map, Object};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};
use std::fmt;

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Object::Null => serializer.serialize_unit(),
            Object::Bool(b) => serializer.serialize_bool(*b),
            Object::Int8(n) => serializer.serialize_i8(*n),
            Object::Int16(n) => serializer.serialize_i16(*n),
            Object::Int32(n) => serializer.serialize_i32(*n),
            Object::Int64(n) => serializer.serialize_i64(*n),
            Object::UInt8(n) => serializer.serialize_u8(*n),
            Object::UInt16(n) => serializer.serialize_u16(*n),
            Object::UInt32(n) => serializer.serialize_u32(*n),
            Object::UInt64(n) => serializer.serialize_u64(*n),
            Object::Int(n) => serializer.serialize_i64(*n as i64),
            Object::UInt(n) => serializer.serialize_u64(*n as u64),
            Object::Float32(f) => serializer.serialize_f32(*f),
            Object::Float64(f) => serializer.serialize_f64(*f),
            Object::String(s) => serializer.serialize_str(s),
            Object::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Object::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Object, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ObjectVisitor)
    }
}

struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = Object;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Object, E> {
        Ok(Object::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Object, E> {
        Ok(Object::Int64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Object, E> {
        Ok(Object::UInt64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Object, E> {
        Ok(Object::Float64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Object, E> {
        Ok(Object::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Object, E> {
        Ok(Object::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Object, E> {
        Ok(Object::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Object, D::Error>
    where
        D: Deserializer<'de>,
    {
        Object::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Object, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Object::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Object, A::Error>
    where
        A: MapAccess<'de>,
    {
        // Duplicate keys collapse, last one wins.
        let mut map = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Object>()? {
            map.insert(key, value);
        }
        Ok(Object::Map(map))
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Object::Null,
            Value::Bool(b) => Object::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Object::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Object::UInt64(u)
                } else {
                    n.as_f64().map_or(Object::Null, Object::Float64)
                }
            }
            Value::String(s) => Object::String(s),
            Value::Array(items) => Object::Array(items.into_iter().map(Object::from).collect()),
            Value::Object(entries) => Object::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Object::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Object {
    /// Render as JSON. Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Object::Null => Value::Null,
            Object::Bool(b) => Value::Bool(*b),
            Object::Float32(f) => float_to_json(f64::from(*f)),
            Object::Float64(f) => float_to_json(*f),
            Object::String(s) => Value::String(s.clone()),
            Object::Array(items) => Value::Array(items.iter().map(Object::to_json).collect()),
            Object::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
            integer => match integer.as_integer() {
                Some(n) if n < 0 => Value::Number(Number::from(n as i64)),
                Some(n) => Value::Number(Number::from(n as u64)),
                None => Value::Null,
            },
        }
    }
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}
