//! Error types for encoding into and decoding from an [`Object`](crate::Object) tree.

use crate::key::{CodingPath, Key};
use crate::object::ObjectKind;
use thiserror::Error;

/// Errors that can occur while encoding or decoding.
///
/// Every variant records the coding path at which the failure was detected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoderError {
    /// A container was requested that is incompatible with one already
    /// obtained from the same encoder, or a container's storage slot was
    /// replaced by a later write.
    #[error("container conflict at {path}: {message}")]
    ContainerConflict { path: CodingPath, message: String },

    /// The stored node does not have the shape the caller asked for.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: CodingPath,
        expected: &'static str,
        found: ObjectKind,
    },

    /// Keyed decode of a key the map does not contain.
    #[error("key not found at {path}: no value associated with key \"{key}\"")]
    KeyNotFound { path: CodingPath, key: Key },

    /// A stored number does not fit the requested width.
    #[error("number out of range at {path}: {value} does not fit in {target}")]
    NumberOutOfRange {
        path: CodingPath,
        value: String,
        target: &'static str,
    },

    /// Unkeyed decode past the last element.
    #[error("unkeyed container is at end at {path}: all {count} elements consumed")]
    AtEnd { path: CodingPath, count: usize },

    /// A null was found where a non-optional value is required.
    #[error("value not found at {path}: expected {expected} but found null")]
    ValueNotFound {
        path: CodingPath,
        expected: &'static str,
    },

    /// A decoded value violates a structural rule of its type.
    #[error("malformed value at {path}: {message}")]
    Malformed { path: CodingPath, message: String },

    /// A value could not be encoded (e.g. a root value that wrote nothing).
    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: CodingPath, message: String },
}

impl CoderError {
    /// The coding path at which the error was raised.
    pub fn path(&self) -> &CodingPath {
        match self {
            CoderError::ContainerConflict { path, .. }
            | CoderError::TypeMismatch { path, .. }
            | CoderError::KeyNotFound { path, .. }
            | CoderError::NumberOutOfRange { path, .. }
            | CoderError::AtEnd { path, .. }
            | CoderError::ValueNotFound { path, .. }
            | CoderError::Malformed { path, .. }
            | CoderError::InvalidValue { path, .. } => path,
        }
    }

    pub(crate) fn conflict(path: &CodingPath, message: impl Into<String>) -> Self {
        CoderError::ContainerConflict {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(path: &CodingPath, expected: &'static str, found: ObjectKind) -> Self {
        CoderError::TypeMismatch {
            path: path.clone(),
            expected,
            found,
        }
    }
}

/// Convenience alias used throughout object-coder.
pub type Result<T> = std::result::Result<T, CoderError>;
