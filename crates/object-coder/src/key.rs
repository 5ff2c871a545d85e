//! Coding keys and coding paths.
//!
//! A [`CodingKey`] names one position inside a keyed or unkeyed container. The
//! chain of keys from the root to a container is its [`CodingPath`], which is
//! captured when the container is created and never changes afterwards.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Identity of a position inside a container.
///
/// Every key has a string form. Keys that address positions by number (array
/// indices, integer-backed enums) also expose an integer form.
pub trait CodingKey {
    fn string_value(&self) -> Cow<'_, str>;

    fn int_value(&self) -> Option<i64> {
        None
    }

    /// Rebuild a key from its string form, used when listing the keys of a
    /// decoded map.
    fn from_string_value(value: &str) -> Option<Self>
    where
        Self: Sized;

    fn from_int_value(_value: i64) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// An owned, type-erased coding key.
///
/// Paths store `Key`s so that keys of different user types can share one
/// path. Two keys are equal only when both their string and integer forms
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    string: String,
    int: Option<i64>,
}

impl Key {
    /// A string-only key.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            string: name.into(),
            int: None,
        }
    }

    /// The key of the element at `index` in an unkeyed container.
    ///
    /// Renders as `"Index {index}"` with integer form `index`.
    pub fn index(index: usize) -> Self {
        Self {
            string: format!("Index {index}"),
            int: Some(index as i64),
        }
    }

    /// The key a keyed container uses for `super_encoder()` / `super_decoder()`.
    pub fn super_key() -> Self {
        Self::named("super")
    }

    /// Erase a typed key.
    pub fn of<K: CodingKey + ?Sized>(key: &K) -> Self {
        Self {
            string: key.string_value().into_owned(),
            int: key.int_value(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn as_int(&self) -> Option<i64> {
        self.int
    }
}

impl CodingKey for Key {
    fn string_value(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.string)
    }

    fn int_value(&self) -> Option<i64> {
        self.int
    }

    fn from_string_value(value: &str) -> Option<Self> {
        Some(Key::named(value))
    }

    /// String form is the bare number (`"3"`), so the result is not equal to
    /// [`Key::index`] for the same value, which renders as `"Index 3"`.
    fn from_int_value(value: i64) -> Option<Self> {
        Some(Self {
            string: value.to_string(),
            int: Some(value),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

/// The keys leading from the root value to a container.
///
/// Paths are immutable and cheap to clone; [`CodingPath::appending`] builds
/// the path of a child without touching the parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodingPath {
    keys: Arc<[Key]>,
}

impl CodingPath {
    /// The empty path of a root encoder or decoder.
    pub fn root() -> Self {
        Self {
            keys: Arc::from(Vec::<Key>::new()),
        }
    }

    pub fn appending(&self, key: Key) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend_from_slice(&self.keys);
        keys.push(key);
        Self {
            keys: Arc::from(keys),
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }
}

impl Default for CodingPath {
    fn default() -> Self {
        Self::root()
    }
}

impl From<Vec<Key>> for CodingPath {
    fn from(keys: Vec<Key>) -> Self {
        Self {
            keys: Arc::from(keys),
        }
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("<root>");
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(key.as_str())?;
        }
        Ok(())
    }
}
