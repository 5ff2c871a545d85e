//! Encoder and decoder configuration.
//!
//! Options are set once on [`ObjectEncoder`](crate::ObjectEncoder) /
//! [`ObjectDecoder`](crate::ObjectDecoder) and shared, read-only, by every
//! nested encoder, decoder and container of one call.

use crate::object::Object;
use std::collections::BTreeMap;

/// Caller-supplied context visible from every encoder and decoder of a call.
pub type UserInfo = BTreeMap<String, Object>;

/// How keyed containers turn a coding key into a map key when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncodingStrategy {
    /// Use each key's string form unchanged.
    #[default]
    UseDefaultKeys,
    /// `camelCase` / `PascalCase` keys become `snake_case` (`myURLValue` → `my_url_value`).
    ConvertToSnakeCase,
}

impl KeyEncodingStrategy {
    pub fn apply(self, key: &str) -> String {
        match self {
            KeyEncodingStrategy::UseDefaultKeys => key.to_string(),
            KeyEncodingStrategy::ConvertToSnakeCase => to_snake_case(key),
        }
    }
}

/// How keyed containers match stored map keys against coding keys when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDecodingStrategy {
    #[default]
    UseDefaultKeys,
    /// Stored `snake_case` keys are read as `camelCase` (`my_value` → `myValue`).
    /// Leading and trailing underscores are kept.
    ConvertFromSnakeCase,
}

impl KeyDecodingStrategy {
    pub fn apply(self, stored: &str) -> String {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => stored.to_string(),
            KeyDecodingStrategy::ConvertFromSnakeCase => from_snake_case(stored),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EncoderOptions {
    pub key_strategy: KeyEncodingStrategy,
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    pub key_strategy: KeyDecodingStrategy,
    pub user_info: UserInfo,
}

/// Insert `_` before each word boundary and lower-case the result.
///
/// A boundary is an upper-case letter that follows a lower-case letter or
/// digit, or that ends a run of capitals and is followed by a lower-case
/// letter.
fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };
        if boundary {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

fn from_snake_case(key: &str) -> String {
    let start = key.len() - key.trim_start_matches('_').len();
    let end = key.trim_end_matches('_').len();
    if start >= end {
        return key.to_string();
    }
    let words: Vec<&str> = key[start..end].split('_').filter(|w| !w.is_empty()).collect();
    if words.len() == 1 {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..start]);
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(&key[end..]);
    out
}
