//! Encoding: typed values → [`Object`] tree.
//!
//! [`ObjectEncoder`] creates the root [`Encoder`] over an empty shared tree and
//! hands it to the value's [`Encodable`] implementation. That implementation
//! obtains exactly one kind of container from the encoder:
//!
//! - [`SingleValueEncodingContainer`] for a scalar (or a value delegated whole)
//! - [`KeyedEncodingContainer`] for a map of named fields
//! - [`UnkeyedEncodingContainer`] for an ordered sequence
//!
//! Keyed and unkeyed containers create child encoders for every value they
//! store, each with its own coding path and storage slot, so nesting depth is
//! unbounded and every fragment lands directly in the shared tree.
//!
//! # Example
//! ```
//! use object_coder::{encode, Object};
//!
//! let object = encode(&vec![1u8, 2, 3]).unwrap();
//! assert_eq!(
//!     object,
//!     Object::Array(vec![Object::UInt8(1), Object::UInt8(2), Object::UInt8(3)])
//! );
//! ```

use crate::coding::Encodable;
use crate::error::{CoderError, Result};
use crate::key::{CodingKey, CodingPath};
use crate::keyed::KeyedEncodingContainer;
use crate::object::{Map, Object};
use crate::options::{EncoderOptions, KeyEncodingStrategy, UserInfo};
use crate::storage::StorageRef;
use crate::unkeyed::UnkeyedEncodingContainer;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Encodes values into a fresh [`Object`] tree.
#[derive(Debug, Clone, Default)]
pub struct ObjectEncoder {
    options: EncoderOptions,
}

impl ObjectEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn with_key_strategy(mut self, strategy: KeyEncodingStrategy) -> Self {
        self.options.key_strategy = strategy;
        self
    }

    pub fn with_user_info(mut self, key: impl Into<String>, value: impl Into<Object>) -> Self {
        self.options.user_info.insert(key.into(), value.into());
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode `value` into a new tree.
    ///
    /// Fails with [`CoderError::InvalidValue`] if the value does not encode
    /// anything at the top level. On any failure the partial tree is dropped.
    pub fn encode<T: Encodable + ?Sized>(&self, value: &T) -> Result<Object> {
        let storage = StorageRef::root();
        let encoder = Encoder::new(
            storage.clone(),
            CodingPath::root(),
            Rc::new(self.options.clone()),
        );

        if let Err(err) = value.encode(&encoder) {
            debug!(path = %err.path(), error = %err, "encode failed");
            return Err(err);
        }
        if !encoder.has_encoded() {
            let err = CoderError::InvalidValue {
                path: CodingPath::root(),
                message: format!(
                    "top-level {} did not encode any values",
                    std::any::type_name::<T>()
                ),
            };
            debug!(error = %err, "encode failed");
            return Err(err);
        }

        let object = storage.take_root();
        debug!(kind = %object.kind(), "encoded object");
        Ok(object)
    }
}

/// Which container an [`Encoder`] has handed out so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerState {
    Unrequested,
    SingleValue { written: bool },
    Keyed,
    Unkeyed,
}

impl ContainerState {
    fn describe(self) -> &'static str {
        match self {
            ContainerState::Unrequested => "no container",
            ContainerState::SingleValue { .. } => "a single value container",
            ContainerState::Keyed => "a keyed container",
            ContainerState::Unkeyed => "an unkeyed container",
        }
    }
}

/// An encoding context bound to one coding path and one storage slot.
///
/// An encoder yields one shape of container over its lifetime. Asking again
/// for the same keyed or unkeyed shape returns another view over the same
/// storage; asking for a different shape fails with
/// [`CoderError::ContainerConflict`].
#[derive(Debug)]
pub struct Encoder {
    storage: StorageRef,
    coding_path: CodingPath,
    options: Rc<EncoderOptions>,
    state: Cell<ContainerState>,
}

impl Encoder {
    pub(crate) fn new(storage: StorageRef, coding_path: CodingPath, options: Rc<EncoderOptions>) -> Self {
        Self {
            storage,
            coding_path,
            options,
            state: Cell::new(ContainerState::Unrequested),
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.options.user_info
    }

    pub fn single_value_container(&self) -> Result<SingleValueEncodingContainer<'_>> {
        match self.state.get() {
            ContainerState::Unrequested => {
                self.state.set(ContainerState::SingleValue { written: false });
            }
            ContainerState::SingleValue { .. } => {}
            other => return Err(self.conflict("a single value container", other)),
        }
        Ok(SingleValueEncodingContainer { encoder: self })
    }

    /// A keyed container over this encoder's slot, which becomes an empty map
    /// unless it already holds one.
    pub fn container<K: CodingKey>(&self) -> Result<KeyedEncodingContainer<K>> {
        self.claim(ContainerState::Keyed)?;
        self.storage.update(&self.coding_path, |slot| {
            if !matches!(slot, Object::Map(_)) {
                *slot = Object::Map(Map::new());
            }
        })?;
        trace!(path = %self.coding_path, "keyed container");
        Ok(KeyedEncodingContainer::new(
            self.storage.clone(),
            self.coding_path.clone(),
            Rc::clone(&self.options),
        ))
    }

    /// An unkeyed container over this encoder's slot, which becomes an empty
    /// array unless it already holds one.
    pub fn unkeyed_container(&self) -> Result<UnkeyedEncodingContainer> {
        self.claim(ContainerState::Unkeyed)?;
        self.storage.update(&self.coding_path, |slot| {
            if !matches!(slot, Object::Array(_)) {
                *slot = Object::Array(Vec::new());
            }
        })?;
        trace!(path = %self.coding_path, "unkeyed container");
        Ok(UnkeyedEncodingContainer::new(
            self.storage.clone(),
            self.coding_path.clone(),
            Rc::clone(&self.options),
        ))
    }

    /// Whether anything has been written through this encoder.
    pub(crate) fn has_encoded(&self) -> bool {
        !matches!(
            self.state.get(),
            ContainerState::Unrequested | ContainerState::SingleValue { written: false }
        )
    }

    fn claim(&self, requested: ContainerState) -> Result<()> {
        match self.state.get() {
            ContainerState::Unrequested | ContainerState::SingleValue { written: false } => {
                self.state.set(requested);
                Ok(())
            }
            current if current == requested => Ok(()),
            current => Err(self.conflict(requested.describe(), current)),
        }
    }

    fn conflict(&self, requested: &str, current: ContainerState) -> CoderError {
        CoderError::conflict(
            &self.coding_path,
            format!(
                "cannot request {requested} after {} was requested",
                current.describe()
            ),
        )
    }
}

/// Accepts exactly one value at its encoder's path.
#[derive(Debug)]
pub struct SingleValueEncodingContainer<'e> {
    encoder: &'e Encoder,
}

impl SingleValueEncodingContainer<'_> {
    pub fn coding_path(&self) -> &CodingPath {
        &self.encoder.coding_path
    }

    pub fn encode_nil(&mut self) -> Result<()> {
        self.encode_object(Object::Null)
    }

    /// Store `value` using its own encoding logic.
    ///
    /// The value receives a fresh encoder over the same slot and path, so it
    /// may in turn request any kind of container.
    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.begin_write()?;
        let encoder = &self.encoder;
        let delegate = Encoder::new(
            encoder.storage.clone(),
            encoder.coding_path.clone(),
            Rc::clone(&encoder.options),
        );
        value.encode(&delegate)?;
        if !delegate.has_encoded() {
            encoder
                .storage
                .update(&encoder.coding_path, |slot| *slot = Object::Map(Map::new()))?;
        }
        Ok(())
    }

    /// Store an already-built fragment as is.
    pub fn encode_object(&mut self, object: Object) -> Result<()> {
        self.begin_write()?;
        self.encoder
            .storage
            .update(&self.encoder.coding_path, |slot| *slot = object)
    }

    fn begin_write(&mut self) -> Result<()> {
        match self.encoder.state.get() {
            ContainerState::SingleValue { written: false } => {
                self.encoder
                    .state
                    .set(ContainerState::SingleValue { written: true });
                Ok(())
            }
            ContainerState::SingleValue { written: true } => Err(CoderError::conflict(
                &self.encoder.coding_path,
                "single value container already holds a value",
            )),
            other => Err(self.encoder.conflict("a single value write", other)),
        }
    }
}
