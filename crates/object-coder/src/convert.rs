//! Scalar conversion rules applied when a decoder reads a stored node.
//!
//! Integers of any stored width decode into any integer type whose range holds
//! the value; anything else is rejected rather than truncated or wrapped.
//! Floats are stored natively, so ±∞ and NaN need no special handling.

use crate::error::{CoderError, Result};
use crate::key::CodingPath;
use crate::object::Object;
use std::fmt::Display;

/// Floats at or beyond this magnitude cannot fit any supported integer width.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e38;

pub(crate) fn unbox_bool(object: &Object, path: &CodingPath) -> Result<bool> {
    object
        .as_bool()
        .ok_or_else(|| missing_or_mismatch(object, path, "bool"))
}

pub(crate) fn unbox_string(object: &Object, path: &CodingPath) -> Result<String> {
    object
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| missing_or_mismatch(object, path, "string"))
}

/// Decode any stored integer (or integral float) into `T`, range checked.
pub(crate) fn unbox_integer<T>(object: &Object, path: &CodingPath, target: &'static str) -> Result<T>
where
    T: TryFrom<i128>,
{
    let wide = if let Some(n) = object.as_integer() {
        n
    } else if let Some(f) = object.as_float() {
        if !f.is_finite() || f.fract() != 0.0 || f.abs() >= INTEGRAL_FLOAT_LIMIT {
            return Err(out_of_range(path, f, target));
        }
        f as i128
    } else {
        return Err(missing_or_mismatch(object, path, target));
    };
    T::try_from(wide).map_err(|_| out_of_range(path, wide, target))
}

pub(crate) fn unbox_f64(object: &Object, path: &CodingPath) -> Result<f64> {
    if let Some(f) = object.as_float() {
        return Ok(f);
    }
    match object.as_integer() {
        Some(n) => Ok(n as f64),
        None => Err(missing_or_mismatch(object, path, "f64")),
    }
}

pub(crate) fn unbox_f32(object: &Object, path: &CodingPath) -> Result<f32> {
    match *object {
        Object::Float32(f) => Ok(f),
        Object::Float64(f) => {
            if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                return Err(out_of_range(path, f, "f32"));
            }
            Ok(f as f32)
        }
        _ => match object.as_integer() {
            Some(n) => Ok(n as f32),
            None => Err(missing_or_mismatch(object, path, "f32")),
        },
    }
}

/// `ValueNotFound` for a null node, `TypeMismatch` for anything else.
pub(crate) fn missing_or_mismatch(object: &Object, path: &CodingPath, expected: &'static str) -> CoderError {
    if object.is_null() {
        CoderError::ValueNotFound {
            path: path.clone(),
            expected,
        }
    } else {
        CoderError::mismatch(path, expected, object.kind())
    }
}

fn out_of_range(path: &CodingPath, value: impl Display, target: &'static str) -> CoderError {
    CoderError::NumberOutOfRange {
        path: path.clone(),
        value: value.to_string(),
        target,
    }
}
