//! Gateway response normalization.
//!
//! The gateway is inconsistent about its list responses: some endpoints wrap
//! items as `{"Items": [...]}`, others return a bare array. Error payloads use
//! one of several message field names.

use serde::Deserialize;
use serde_json::Value;

use teamfight_core::Item;

use crate::error::{Result, StoreError};

/// Field names the gateway uses for error messages, checked in order.
pub const ERROR_FIELDS: [&str; 4] = ["error", "message", "errorMessage", "Error"];

/// Maximum body length quoted in parse errors and logs.
const SNIPPET_LEN: usize = 200;

/// A list response, by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ListBody {
    /// `[ {...}, ... ]`
    Bare(Vec<Item>),
    /// `{ "Items": [ {...}, ... ], ... }`
    Wrapped(Vec<Item>),
}

#[derive(Deserialize)]
struct ItemsEnvelope {
    #[serde(rename = "Items")]
    items: Vec<Item>,
}

impl ListBody {
    /// Parse a list response, choosing the parser from the first byte of the body.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` for an empty body, a body that is neither
    /// an array nor an object, or an object without an `Items` array.
    pub fn parse(body: &str) -> Result<Self> {
        let trimmed = body.trim_start();
        match trimmed.as_bytes().first() {
            Some(b'[') => serde_json::from_str(trimmed)
                .map(Self::Bare)
                .map_err(|e| StoreError::Parse(format!("response as array: {e}"))),
            Some(b'{') => serde_json::from_str::<ItemsEnvelope>(trimmed)
                .map(|envelope| Self::Wrapped(envelope.items))
                .map_err(|e| {
                    StoreError::Parse(format!("{e} (body: {})", snippet(trimmed, SNIPPET_LEN)))
                }),
            Some(_) => Err(StoreError::Parse(format!(
                "unexpected response (body: {})",
                snippet(trimmed, SNIPPET_LEN)
            ))),
            None => Err(StoreError::Parse("empty response body".to_string())),
        }
    }

    /// Consume the body and return its items, whatever the shape.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Self::Bare(items) | Self::Wrapped(items) => items,
        }
    }
}

/// Build the error for a non-success gateway response.
///
/// Takes the first string among [`ERROR_FIELDS`]; falls back to the whole
/// JSON object, then to the raw body.
#[must_use]
pub fn gateway_error(status: u16, body: &str) -> StoreError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => ERROR_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).and_then(Value::as_str))
            .map_or_else(|| Value::Object(fields.clone()).to_string(), str::to_string),
        _ => format!("status code {status}: {body}"),
    };

    StoreError::Gateway { status, message }
}

/// Return at most `max` characters of `body`.
pub(crate) fn snippet(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
