//! The `Encodable` / `Decodable` traits and their implementations for
//! standard types and `url::Url`.
//!
//! A type describes itself by requesting containers from the encoder or
//! decoder it is given:
//!
//! ```
//! use object_coder::{decode, encode, CodingKey, Decodable, Decoder, Encodable, Encoder, Result};
//! use std::borrow::Cow;
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! #[derive(Clone, Copy)]
//! enum PointKey {
//!     X,
//!     Y,
//! }
//!
//! impl CodingKey for PointKey {
//!     fn string_value(&self) -> Cow<'_, str> {
//!         match self {
//!             PointKey::X => "x".into(),
//!             PointKey::Y => "y".into(),
//!         }
//!     }
//!
//!     fn from_string_value(value: &str) -> Option<Self> {
//!         match value {
//!             "x" => Some(PointKey::X),
//!             "y" => Some(PointKey::Y),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Encodable for Point {
//!     fn encode(&self, encoder: &Encoder) -> Result<()> {
//!         let mut container = encoder.container::<PointKey>()?;
//!         container.encode(PointKey::X, &self.x)?;
//!         container.encode(PointKey::Y, &self.y)
//!     }
//! }
//!
//! impl Decodable for Point {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self> {
//!         let container = decoder.container::<PointKey>()?;
//!         Ok(Point {
//!             x: container.decode(PointKey::X)?,
//!             y: container.decode(PointKey::Y)?,
//!         })
//!     }
//! }
//!
//! let point = Point { x: 3, y: -4 };
//! let object = encode(&point).unwrap();
//! assert_eq!(decode::<Point>(&object).unwrap(), point);
//! ```

use crate::convert;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::key::Key;
use crate::object::Object;
use std::collections::BTreeMap;
use url::Url;

/// A type that can write itself through an [`Encoder`].
pub trait Encodable {
    fn encode(&self, encoder: &Encoder) -> Result<()>;
}

/// A type that can rebuild itself from a [`Decoder`].
pub trait Decodable: Sized {
    fn decode(decoder: &Decoder<'_>) -> Result<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encodable for $ty {
                fn encode(&self, encoder: &Encoder) -> Result<()> {
                    encoder.single_value_container()?.encode_object(Object::from(*self))
                }
            }

            impl Decodable for $ty {
                fn decode(decoder: &Decoder<'_>) -> Result<Self> {
                    convert::unbox_integer(decoder.object(), decoder.coding_path(), stringify!($ty))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Encodable for bool {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_object(Object::Bool(*self))
    }
}

impl Decodable for bool {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        convert::unbox_bool(decoder.object(), decoder.coding_path())
    }
}

impl Encodable for f32 {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_object(Object::Float32(*self))
    }
}

impl Decodable for f32 {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        convert::unbox_f32(decoder.object(), decoder.coding_path())
    }
}

impl Encodable for f64 {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_object(Object::Float64(*self))
    }
}

impl Decodable for f64 {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        convert::unbox_f64(decoder.object(), decoder.coding_path())
    }
}

impl Encodable for str {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder
            .single_value_container()?
            .encode_object(Object::String(self.to_string()))
    }
}

impl Encodable for String {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        self.as_str().encode(encoder)
    }
}

impl Decodable for String {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        convert::unbox_string(decoder.object(), decoder.coding_path())
    }
}

impl Encodable for char {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder
            .single_value_container()?
            .encode_object(Object::String(self.to_string()))
    }
}

impl Decodable for char {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let s = String::decode(decoder)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(decoder.malformed(format!(
                "expected a single character, found {:?}",
                s
            ))),
        }
    }
}

impl Encodable for Url {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder
            .single_value_container()?
            .encode_object(Object::String(self.as_str().to_string()))
    }
}

/// Stored as its string form; a string that does not parse is
/// [`CoderError::Malformed`](crate::CoderError::Malformed).
impl Decodable for Url {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let s = String::decode(decoder)?;
        Url::parse(&s).map_err(|err| decoder.malformed(format!("invalid URL {s:?}: {err}")))
    }
}

impl Encodable for Object {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_object(self.clone())
    }
}

impl Decodable for Object {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        Ok(decoder.object().clone())
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single_value_container()?.encode_nil(),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        if decoder.single_value_container().decode_nil() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        let mut container = encoder.unkeyed_container()?;
        for item in self {
            container.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let mut container = decoder.unkeyed_container()?;
        let mut items = Vec::with_capacity(container.count());
        while !container.is_at_end() {
            items.push(container.decode()?);
        }
        Ok(items)
    }
}

impl<T: Encodable> Encodable for BTreeMap<String, T> {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        let mut container = encoder.container::<Key>()?;
        for (key, value) in self {
            container.encode(Key::named(key.as_str()), value)?;
        }
        Ok(())
    }
}

impl<T: Decodable> Decodable for BTreeMap<String, T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        let container = decoder.container::<Key>()?;
        let mut map = BTreeMap::new();
        for key in container.all_keys() {
            let name = key.as_str().to_string();
            map.insert(name, container.decode(key)?);
        }
        Ok(map)
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, encoder: &Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}
