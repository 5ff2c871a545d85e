//! # object-coder
//!
//! Encode typed Rust values into a self-describing in-memory [`Object`] tree
//! and decode them back, with no textual or binary format in between.
//!
//! Types describe themselves through a small container protocol: an
//! [`Encodable`] value asks its [`Encoder`] for a single-value, keyed or
//! unkeyed container and writes into it; a [`Decodable`] value asks its
//! [`Decoder`] for the same shape and reads back out. Every encoder, decoder
//! and container knows its exact [`CodingPath`] from the root, and every
//! [`CoderError`] reports the path where it happened.
//!
//! ## Quick start
//!
//! ```rust
//! use object_coder::{decode, encode, Object};
//!
//! let values: Vec<Option<i16>> = vec![Some(-3), None, Some(7)];
//! let object = encode(&values).unwrap();
//! assert_eq!(
//!     object,
//!     Object::Array(vec![Object::Int16(-3), Object::Null, Object::Int16(7)])
//! );
//!
//! let back: Vec<Option<i16>> = decode(&object).unwrap();
//! assert_eq!(back, values);
//!
//! // Stored widths are range checked on the way out.
//! assert!(decode::<i8>(&Object::UInt8(200)).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`object`]: the `Object` tree and its ordered `Map`
//! - [`key`]: `CodingKey`, `Key` and `CodingPath`
//! - [`encoder`]: `ObjectEncoder`, `Encoder`, single-value encoding
//! - [`decoder`]: `ObjectDecoder`, `Decoder`, single-value decoding
//! - [`keyed`]: map-shaped containers
//! - [`unkeyed`]: sequence-shaped containers
//! - [`coding`]: `Encodable` / `Decodable` and std implementations
//! - [`options`]: key strategies and user info
//! - [`error`]: `CoderError`
//! - [`json`]: serde / `serde_json` interop for `Object`

pub mod coding;
mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod key;
pub mod keyed;
pub mod object;
pub mod options;
mod storage;
pub mod unkeyed;

pub use coding::{Decodable, Encodable};
pub use decoder::{Decoder, ObjectDecoder, SingleValueDecodingContainer};
pub use encoder::{Encoder, ObjectEncoder, SingleValueEncodingContainer};
pub use error::{CoderError, Result};
pub use key::{CodingKey, CodingPath, Key};
pub use keyed::{KeyedDecodingContainer, KeyedEncodingContainer};
pub use object::{Map, Object, ObjectKind};
pub use options::{DecoderOptions, EncoderOptions, KeyDecodingStrategy, KeyEncodingStrategy, UserInfo};
pub use unkeyed::{UnkeyedDecodingContainer, UnkeyedEncodingContainer};

/// Encode `value` into a new [`Object`] tree with default options.
pub fn encode<T: Encodable + ?Sized>(value: &T) -> Result<Object> {
    ObjectEncoder::new().encode(value)
}

/// Decode a `T` from `object` with default options.
pub fn decode<T: Decodable>(object: &Object) -> Result<T> {
    ObjectDecoder::new().decode(object)
}
