//! The `Object` value tree that every encodable type is lowered into.
//!
//! `Object` mirrors the shapes a typed value can take: scalars of every fixed
//! integer width, both float widths, strings, ordered arrays and string-keyed
//! maps. Integer widths are kept distinct so a decoded value can be range
//! checked against its destination instead of going through a lossy common
//! representation.

use indexmap::IndexMap;
use std::fmt;

/// A self-describing value produced by encoding and consumed by decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Object {
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    /// Platform-width signed integer.
    Int(isize),
    /// Platform-width unsigned integer.
    UInt(usize),
    Float32(f32),
    Float64(f64),
    String(String),
    Array(Vec<Object>),
    Map(Map),
}

/// The shape of an [`Object`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Null,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int,
    UInt,
    Float32,
    Float64,
    String,
    Array,
    Map,
}

impl ObjectKind {
    /// Lower-case name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Null => "null",
            ObjectKind::Bool => "bool",
            ObjectKind::Int8 => "int8",
            ObjectKind::Int16 => "int16",
            ObjectKind::Int32 => "int32",
            ObjectKind::Int64 => "int64",
            ObjectKind::UInt8 => "uint8",
            ObjectKind::UInt16 => "uint16",
            ObjectKind::UInt32 => "uint32",
            ObjectKind::UInt64 => "uint64",
            ObjectKind::Int => "int",
            ObjectKind::UInt => "uint",
            ObjectKind::Float32 => "float32",
            ObjectKind::Float64 => "float64",
            ObjectKind::String => "string",
            ObjectKind::Array => "array",
            ObjectKind::Map => "map",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Null => ObjectKind::Null,
            Object::Bool(_) => ObjectKind::Bool,
            Object::Int8(_) => ObjectKind::Int8,
            Object::Int16(_) => ObjectKind::Int16,
            Object::Int32(_) => ObjectKind::Int32,
            Object::Int64(_) => ObjectKind::Int64,
            Object::UInt8(_) => ObjectKind::UInt8,
            Object::UInt16(_) => ObjectKind::UInt16,
            Object::UInt32(_) => ObjectKind::UInt32,
            Object::UInt64(_) => ObjectKind::UInt64,
            Object::Int(_) => ObjectKind::Int,
            Object::UInt(_) => ObjectKind::UInt,
            Object::Float32(_) => ObjectKind::Float32,
            Object::Float64(_) => ObjectKind::Float64,
            Object::String(_) => ObjectKind::String,
            Object::Array(_) => ObjectKind::Array,
            Object::Map(_) => ObjectKind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Object::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Integer payload of any integer width, widened losslessly.
    ///
    /// Returns `None` for every non-integer shape, floats included.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Object::Int8(n) => Some(n.into()),
            Object::Int16(n) => Some(n.into()),
            Object::Int32(n) => Some(n.into()),
            Object::Int64(n) => Some(n.into()),
            Object::UInt8(n) => Some(n.into()),
            Object::UInt16(n) => Some(n.into()),
            Object::UInt32(n) => Some(n.into()),
            Object::UInt64(n) => Some(n.into()),
            Object::Int(n) => Some(n as i128),
            Object::UInt(n) => Some(n as i128),
            _ => None,
        }
    }

    /// Float payload of either float width.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Object::Float32(f) => Some(f.into()),
            Object::Float64(f) => Some(f),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    isize => Int,
    usize => UInt,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<Object> => Array,
    Map => Map,
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(value.to_string())
    }
}

/// String-keyed entries in insertion order.
///
/// Keys are unique. Inserting an existing key replaces its value in place, so
/// the entry keeps the position of its first insertion (last write wins).
/// Equality compares entries in order.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: IndexMap<String, Object>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Object) -> Option<Object> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    /// The value for `key`, inserting `default()` at the end if absent.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Object) -> &mut Object {
        match self.entries.get_index_of(key) {
            Some(i) => &mut self.entries[i],
            None => self.entries.entry(key.to_string()).or_insert_with(default),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, shifting later entries down to keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, Object)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Object)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Object);
    type IntoIter = indexmap::map::IntoIter<String, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
