//! Sequence-shaped containers.
//!
//! Elements are addressed by position. Children of an unkeyed container get
//! the path `coding_path + [Key::index(i)]`, where `i` is the element's
//! position: the Nth nested container created (or decoded) sits at index N-1.

use crate::coding::{Decodable, Encodable};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{CoderError, Result};
use crate::key::{CodingKey, CodingPath, Key};
use crate::keyed::{KeyedDecodingContainer, KeyedEncodingContainer};
use crate::object::{Map, Object};
use crate::options::{DecoderOptions, EncoderOptions};
use crate::storage::StorageRef;
use std::rc::Rc;
use tracing::trace;

/// Appends elements to the array stored at its coding path.
#[derive(Debug)]
pub struct UnkeyedEncodingContainer {
    storage: StorageRef,
    coding_path: CodingPath,
    options: Rc<EncoderOptions>,
}

impl UnkeyedEncodingContainer {
    pub(crate) fn new(storage: StorageRef, coding_path: CodingPath, options: Rc<EncoderOptions>) -> Self {
        Self {
            storage,
            coding_path,
            options,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    /// Number of elements in the array, including those appended through
    /// sibling views. Fails once the slot no longer holds an array.
    pub fn count(&self) -> Result<usize> {
        self.with_array(|items| items.len())
    }

    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<()> {
        let index = self.append(Object::Map(Map::new()))?;
        value.encode(&self.element_encoder(index))
    }

    pub fn encode_nil(&mut self) -> Result<()> {
        self.append(Object::Null)?;
        Ok(())
    }

    /// Append a keyed container as the next element.
    pub fn nested_container<K: CodingKey>(&mut self) -> Result<KeyedEncodingContainer<K>> {
        let index = self.append(Object::Map(Map::new()))?;
        let coding_path = self.coding_path.appending(Key::index(index));
        trace!(path = %coding_path, "nested keyed container");
        Ok(KeyedEncodingContainer::new(
            self.storage.element(index),
            coding_path,
            Rc::clone(&self.options),
        ))
    }

    /// Append an unkeyed container as the next element.
    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedEncodingContainer> {
        let index = self.append(Object::Array(Vec::new()))?;
        let coding_path = self.coding_path.appending(Key::index(index));
        trace!(path = %coding_path, "nested unkeyed container");
        Ok(UnkeyedEncodingContainer::new(
            self.storage.element(index),
            coding_path,
            Rc::clone(&self.options),
        ))
    }

    /// An encoder for the next element, delegated to a base representation.
    pub fn super_encoder(&mut self) -> Result<Encoder> {
        let index = self.append(Object::Map(Map::new()))?;
        let encoder = self.element_encoder(index);
        trace!(path = %encoder.coding_path(), "super encoder");
        Ok(encoder)
    }

    fn element_encoder(&self, index: usize) -> Encoder {
        Encoder::new(
            self.storage.element(index),
            self.coding_path.appending(Key::index(index)),
            Rc::clone(&self.options),
        )
    }

    /// Push a placeholder and return its index.
    fn append(&self, placeholder: Object) -> Result<usize> {
        self.with_array(|items| {
            items.push(placeholder);
            items.len() - 1
        })
    }

    fn with_array<R>(&self, f: impl FnOnce(&mut Vec<Object>) -> R) -> Result<R> {
        self.storage
            .update(&self.coding_path, |slot| match slot {
                Object::Array(items) => Some(f(items)),
                _ => None,
            })?
            .ok_or_else(|| {
                CoderError::conflict(
                    &self.coding_path,
                    "unkeyed container storage no longer holds an array",
                )
            })
    }
}

/// Reads the elements of a decoded array in order.
#[derive(Debug)]
pub struct UnkeyedDecodingContainer<'a> {
    items: &'a [Object],
    coding_path: CodingPath,
    options: &'a DecoderOptions,
    current_index: usize,
}

impl<'a> UnkeyedDecodingContainer<'a> {
    pub(crate) fn new(items: &'a [Object], coding_path: CodingPath, options: &'a DecoderOptions) -> Self {
        Self {
            items,
            coding_path,
            options,
            current_index: 0,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Decode the element at the cursor and advance.
    pub fn decode<T: Decodable>(&mut self) -> Result<T> {
        let value = T::decode(&self.element_decoder()?)?;
        self.current_index += 1;
        Ok(value)
    }

    /// If the element at the cursor is null, consume it and return `true`.
    /// Otherwise leave the cursor in place and return `false`.
    pub fn decode_nil(&mut self) -> Result<bool> {
        let is_null = self.current()?.is_null();
        if is_null {
            self.current_index += 1;
        }
        Ok(is_null)
    }

    pub fn decode_if_present<T: Decodable>(&mut self) -> Result<Option<T>> {
        if self.decode_nil()? {
            return Ok(None);
        }
        self.decode().map(Some)
    }

    pub fn nested_container<K: CodingKey>(&mut self) -> Result<KeyedDecodingContainer<'a, K>> {
        let container = self.element_decoder()?.container()?;
        trace!(path = %container.coding_path(), "nested keyed container");
        self.current_index += 1;
        Ok(container)
    }

    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedDecodingContainer<'a>> {
        let container = self.element_decoder()?.unkeyed_container()?;
        trace!(path = %container.coding_path(), "nested unkeyed container");
        self.current_index += 1;
        Ok(container)
    }

    pub fn super_decoder(&mut self) -> Result<Decoder<'a>> {
        let decoder = self.element_decoder()?;
        trace!(path = %decoder.coding_path(), "super decoder");
        self.current_index += 1;
        Ok(decoder)
    }

    fn current(&self) -> Result<&'a Object> {
        self.items
            .get(self.current_index)
            .ok_or_else(|| CoderError::AtEnd {
                path: self.coding_path.appending(Key::index(self.current_index)),
                count: self.items.len(),
            })
    }

    fn element_decoder(&self) -> Result<Decoder<'a>> {
        let object = self.current()?;
        Ok(Decoder::new(
            object,
            self.coding_path.appending(Key::index(self.current_index)),
            self.options,
        ))
    }
}
