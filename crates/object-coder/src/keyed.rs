//! Map-shaped containers addressed by typed coding keys.
//!
//! Both sides build every child at `coding_path + [key]` and never touch the
//! path of the container they were created from.

use crate::coding::{Decodable, Encodable};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{CoderError, Result};
use crate::key::{CodingKey, CodingPath, Key};
use crate::object::{Map, Object};
use crate::options::{DecoderOptions, EncoderOptions, KeyDecodingStrategy};
use crate::storage::StorageRef;
use crate::unkeyed::{UnkeyedDecodingContainer, UnkeyedEncodingContainer};
use indexmap::IndexMap;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::trace;

static NULL: Object = Object::Null;

/// Writes entries into the map stored at its coding path.
#[derive(Debug)]
pub struct KeyedEncodingContainer<K> {
    storage: StorageRef,
    coding_path: CodingPath,
    options: Rc<EncoderOptions>,
    _key: PhantomData<fn(K)>,
}

impl<K: CodingKey> KeyedEncodingContainer<K> {
    pub(crate) fn new(storage: StorageRef, coding_path: CodingPath, options: Rc<EncoderOptions>) -> Self {
        Self {
            storage,
            coding_path,
            options,
            _key: PhantomData,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    /// Encode `value` under `key`, replacing any previous entry.
    ///
    /// A value that encodes nothing is stored as an empty map.
    pub fn encode<T: Encodable + ?Sized>(&mut self, key: K, value: &T) -> Result<()> {
        let name = self.map_key(&key);
        self.with_map(|map| map.insert(name.clone(), Object::Map(Map::new())))?;
        let encoder = self.child_encoder(name, Key::of(&key));
        value.encode(&encoder)
    }

    pub fn encode_nil(&mut self, key: K) -> Result<()> {
        let name = self.map_key(&key);
        self.with_map(|map| map.insert(name, Object::Null))?;
        Ok(())
    }

    /// Encode `value` under `key`, or leave the key out entirely when `None`.
    pub fn encode_if_present<T: Encodable + ?Sized>(&mut self, key: K, value: Option<&T>) -> Result<()> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// A keyed container stored under `key`.
    pub fn nested_container<NK: CodingKey>(&mut self, key: K) -> Result<KeyedEncodingContainer<NK>> {
        let name = self.map_key(&key);
        self.vivify(&name, |slot| {
            if !matches!(slot, Object::Map(_)) {
                *slot = Object::Map(Map::new());
            }
        })?;
        let coding_path = self.coding_path.appending(Key::of(&key));
        trace!(path = %coding_path, "nested keyed container");
        Ok(KeyedEncodingContainer::new(
            self.storage.entry(name),
            coding_path,
            Rc::clone(&self.options),
        ))
    }

    /// An unkeyed container stored under `key`.
    pub fn nested_unkeyed_container(&mut self, key: K) -> Result<UnkeyedEncodingContainer> {
        let name = self.map_key(&key);
        self.vivify(&name, |slot| {
            if !matches!(slot, Object::Array(_)) {
                *slot = Object::Array(Vec::new());
            }
        })?;
        let coding_path = self.coding_path.appending(Key::of(&key));
        trace!(path = %coding_path, "nested unkeyed container");
        Ok(UnkeyedEncodingContainer::new(
            self.storage.entry(name),
            coding_path,
            Rc::clone(&self.options),
        ))
    }

    /// An encoder for a base representation stored under the `"super"` key.
    pub fn super_encoder(&mut self) -> Result<Encoder> {
        self.super_encoder_at(Key::super_key())
    }

    /// An encoder for a base representation stored under `key`.
    pub fn super_encoder_for(&mut self, key: K) -> Result<Encoder> {
        self.super_encoder_at(Key::of(&key))
    }

    fn super_encoder_at(&mut self, key: Key) -> Result<Encoder> {
        let name = self.options.key_strategy.apply(key.as_str());
        self.vivify(&name, |_| {})?;
        let coding_path = self.coding_path.appending(key);
        trace!(path = %coding_path, "super encoder");
        Ok(Encoder::new(
            self.storage.entry(name),
            coding_path,
            Rc::clone(&self.options),
        ))
    }

    fn child_encoder(&self, name: String, key: Key) -> Encoder {
        Encoder::new(
            self.storage.entry(name),
            self.coding_path.appending(key),
            Rc::clone(&self.options),
        )
    }

    fn map_key(&self, key: &K) -> String {
        self.options.key_strategy.apply(&key.string_value())
    }

    /// Make sure entry `name` exists (as an empty map if new), then adjust it.
    fn vivify(&self, name: &str, shape: impl FnOnce(&mut Object)) -> Result<()> {
        self.with_map(|map| shape(map.get_or_insert_with(name, || Object::Map(Map::new()))))
    }

    fn with_map<R>(&self, f: impl FnOnce(&mut Map) -> R) -> Result<R> {
        self.storage
            .update(&self.coding_path, |slot| match slot {
                Object::Map(map) => Some(f(map)),
                _ => None,
            })?
            .ok_or_else(|| {
                CoderError::conflict(
                    &self.coding_path,
                    "keyed container storage no longer holds a map",
                )
            })
    }
}

/// Reads entries from a decoded map.
#[derive(Debug)]
pub struct KeyedDecodingContainer<'a, K> {
    map: &'a Map,
    /// Entries re-keyed through the decoding strategy, when one is set.
    converted: Option<IndexMap<String, (&'a str, &'a Object)>>,
    coding_path: CodingPath,
    options: &'a DecoderOptions,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: CodingKey> KeyedDecodingContainer<'a, K> {
    /// Fails with [`CoderError::Malformed`] when the key strategy maps two
    /// stored keys onto the same coding key.
    pub(crate) fn new(map: &'a Map, coding_path: CodingPath, options: &'a DecoderOptions) -> Result<Self> {
        let converted = match options.key_strategy {
            KeyDecodingStrategy::UseDefaultKeys => None,
            strategy => Some(convert_keys(map, strategy, &coding_path)?),
        };
        Ok(Self {
            map,
            converted,
            coding_path,
            options,
            _key: PhantomData,
        })
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    /// Every stored key that `K` recognizes, in storage order.
    pub fn all_keys(&self) -> Vec<K> {
        match &self.converted {
            Some(converted) => converted.keys().filter_map(|key| K::from_string_value(key)).collect(),
            None => self.map.keys().filter_map(K::from_string_value).collect(),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    pub fn decode<T: Decodable>(&self, key: K) -> Result<T> {
        let object = self.require(&key)?;
        T::decode(&self.child_decoder(object, &key))
    }

    /// Whether the value stored under `key` is null.
    pub fn decode_nil(&self, key: K) -> Result<bool> {
        Ok(self.require(&key)?.is_null())
    }

    /// `None` when `key` is absent or holds null.
    pub fn decode_if_present<T: Decodable>(&self, key: K) -> Result<Option<T>> {
        match self.lookup(&key) {
            None | Some(Object::Null) => Ok(None),
            Some(object) => T::decode(&self.child_decoder(object, &key)).map(Some),
        }
    }

    pub fn nested_container<NK: CodingKey>(&self, key: K) -> Result<KeyedDecodingContainer<'a, NK>> {
        let object = self.require(&key)?;
        let container = self.child_decoder(object, &key).container()?;
        trace!(path = %container.coding_path(), "nested keyed container");
        Ok(container)
    }

    pub fn nested_unkeyed_container(&self, key: K) -> Result<UnkeyedDecodingContainer<'a>> {
        let object = self.require(&key)?;
        let container = self.child_decoder(object, &key).unkeyed_container()?;
        trace!(path = %container.coding_path(), "nested unkeyed container");
        Ok(container)
    }

    /// A decoder over the `"super"` entry, or over null when it is absent.
    pub fn super_decoder(&self) -> Decoder<'a> {
        self.super_decoder_at(Key::super_key())
    }

    /// A decoder over the entry for `key`, or over null when it is absent.
    pub fn super_decoder_for(&self, key: K) -> Decoder<'a> {
        self.super_decoder_at(Key::of(&key))
    }

    fn super_decoder_at(&self, key: Key) -> Decoder<'a> {
        let object = self.find(key.as_str()).unwrap_or(&NULL);
        let coding_path = self.coding_path.appending(key);
        trace!(path = %coding_path, "super decoder");
        Decoder::new(object, coding_path, self.options)
    }

    fn require(&self, key: &K) -> Result<&'a Object> {
        self.lookup(key).ok_or_else(|| CoderError::KeyNotFound {
            path: self.coding_path.clone(),
            key: Key::of(key),
        })
    }

    fn lookup(&self, key: &K) -> Option<&'a Object> {
        self.find(&key.string_value())
    }

    fn find(&self, name: &str) -> Option<&'a Object> {
        match &self.converted {
            Some(converted) => converted.get(name).map(|&(_, value)| value),
            None => self.map.get(name),
        }
    }

    fn child_decoder(&self, object: &'a Object, key: &K) -> Decoder<'a> {
        Decoder::new(object, self.coding_path.appending(Key::of(key)), self.options)
    }
}

fn convert_keys<'a>(
    map: &'a Map,
    strategy: KeyDecodingStrategy,
    path: &CodingPath,
) -> Result<IndexMap<String, (&'a str, &'a Object)>> {
    let mut converted = IndexMap::with_capacity(map.len());
    for (stored, value) in map.iter() {
        let key = strategy.apply(stored);
        if let Some(&(first, _)) = converted.get(&key) {
            return Err(CoderError::Malformed {
                path: path.clone(),
                message: format!("stored keys {first:?} and {stored:?} both decode as {key:?}"),
            });
        }
        converted.insert(key, (stored, value));
    }
    Ok(converted)
}
