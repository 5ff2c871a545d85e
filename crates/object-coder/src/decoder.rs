//! Decoding: [`Object`] tree → typed values.
//!
//! A [`Decoder`] borrows one node of an existing tree together with the coding
//! path that leads to it. Containers handed out by a decoder validate the
//! node's shape and build child decoders over sub-nodes; nothing on this side
//! can mutate the tree, so one tree may be decoded any number of times.

use crate::coding::Decodable;
use crate::convert;
use crate::error::{CoderError, Result};
use crate::key::{CodingKey, CodingPath};
use crate::keyed::KeyedDecodingContainer;
use crate::object::Object;
use crate::options::{DecoderOptions, KeyDecodingStrategy, UserInfo};
use crate::unkeyed::UnkeyedDecodingContainer;
use tracing::{debug, trace};

/// Decodes values out of an [`Object`] tree.
#[derive(Debug, Clone, Default)]
pub struct ObjectDecoder {
    options: DecoderOptions,
}

impl ObjectDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn with_key_strategy(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.options.key_strategy = strategy;
        self
    }

    pub fn with_user_info(mut self, key: impl Into<String>, value: impl Into<Object>) -> Self {
        self.options.user_info.insert(key.into(), value.into());
        self
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn decode<T: Decodable>(&self, object: &Object) -> Result<T> {
        let decoder = Decoder::new(object, CodingPath::root(), &self.options);
        match T::decode(&decoder) {
            Ok(value) => {
                debug!(kind = %object.kind(), "decoded object");
                Ok(value)
            }
            Err(err) => {
                debug!(path = %err.path(), error = %err, "decode failed");
                Err(err)
            }
        }
    }
}

/// A decoding context over one node of the tree.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    object: &'a Object,
    coding_path: CodingPath,
    options: &'a DecoderOptions,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(object: &'a Object, coding_path: CodingPath, options: &'a DecoderOptions) -> Self {
        Self {
            object,
            coding_path,
            options,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    pub fn user_info(&self) -> &'a UserInfo {
        &self.options.user_info
    }

    /// The raw node this decoder reads.
    pub fn object(&self) -> &'a Object {
        self.object
    }

    pub fn single_value_container(&self) -> SingleValueDecodingContainer<'a> {
        SingleValueDecodingContainer {
            object: self.object,
            coding_path: self.coding_path.clone(),
            options: self.options,
        }
    }

    /// Fails with [`CoderError::TypeMismatch`] unless the node is a map, or
    /// with [`CoderError::Malformed`] if the key strategy makes two stored
    /// keys collide.
    pub fn container<K: CodingKey>(&self) -> Result<KeyedDecodingContainer<'a, K>> {
        match self.object {
            Object::Map(map) => {
                trace!(path = %self.coding_path, "keyed container");
                KeyedDecodingContainer::new(map, self.coding_path.clone(), self.options)
            }
            other => Err(convert::missing_or_mismatch(other, &self.coding_path, "map")),
        }
    }

    /// Fails with [`CoderError::TypeMismatch`] unless the node is an array.
    pub fn unkeyed_container(&self) -> Result<UnkeyedDecodingContainer<'a>> {
        match self.object {
            Object::Array(items) => {
                trace!(path = %self.coding_path, "unkeyed container");
                Ok(UnkeyedDecodingContainer::new(
                    items,
                    self.coding_path.clone(),
                    self.options,
                ))
            }
            other => Err(convert::missing_or_mismatch(other, &self.coding_path, "array")),
        }
    }

    /// A [`CoderError::Malformed`] at this decoder's path, for validation
    /// done by a type's own decoding logic.
    pub fn malformed(&self, message: impl Into<String>) -> CoderError {
        CoderError::Malformed {
            path: self.coding_path.clone(),
            message: message.into(),
        }
    }
}

/// Reads the single value at its decoder's path.
#[derive(Debug, Clone)]
pub struct SingleValueDecodingContainer<'a> {
    object: &'a Object,
    coding_path: CodingPath,
    options: &'a DecoderOptions,
}

impl<'a> SingleValueDecodingContainer<'a> {
    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    pub fn object(&self) -> &'a Object {
        self.object
    }

    pub fn decode_nil(&self) -> bool {
        self.object.is_null()
    }

    /// Decode the value using `T`'s own logic, converting scalars with range
    /// checks.
    pub fn decode<T: Decodable>(&self) -> Result<T> {
        T::decode(&Decoder::new(
            self.object,
            self.coding_path.clone(),
            self.options,
        ))
    }

    pub fn malformed(&self, message: impl Into<String>) -> CoderError {
        CoderError::Malformed {
            path: self.coding_path.clone(),
            message: message.into(),
        }
    }
}
