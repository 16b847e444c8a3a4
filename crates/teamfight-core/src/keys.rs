//! Partition-key resolution.
//!
//! Items reach the gateway in several shapes. The resolver tries a fixed,
//! ordered list of shapes and the first one that matches decides the
//! partition key. Items may satisfy several shapes at once, so the order in
//! [`KeyShape::PRECEDENCE`] is part of the contract.

use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::item::Item;

/// Partition key used when the item does not name one explicitly.
pub const DEFAULT_PARTITION_KEY: &str = "BUILD#";

/// Sort-key attribute of the store's tables.
pub const SORT_KEY: &str = "METADATA";

/// Suffix that marks an attribute name as a partition key.
const PARTITION_MARKER: char = '#';

/// The item shapes recognized by the resolver, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// `{"pkey": "<name>", "pval": "<value>"}`.
    ExplicitPair,
    /// A top-level field named after the default partition key (`BUILD#`).
    MarkerField,
    /// `{"partitionKey": {"<NAME>#": <value>, ...}}`.
    NestedPartitionKey,
    /// `{"name": "<value>"}`, stored under the default partition key.
    NameFallback,
}

impl KeyShape {
    /// All shapes, first match wins.
    pub const PRECEDENCE: [Self; 4] = [
        Self::ExplicitPair,
        Self::MarkerField,
        Self::NestedPartitionKey,
        Self::NameFallback,
    ];

    /// Try to extract a `(key_name, key_value)` pair using this shape.
    #[must_use]
    pub fn detect(self, item: &Item) -> Option<(String, String)> {
        match self {
            Self::ExplicitPair => {
                let name = item.get("pkey")?.as_str()?;
                let value = item.get("pval")?.as_str()?;
                Some((name.to_string(), value.to_string()))
            }
            Self::MarkerField => {
                let value = item.get(DEFAULT_PARTITION_KEY)?.as_str()?;
                Some((DEFAULT_PARTITION_KEY.to_string(), value.to_string()))
            }
            Self::NestedPartitionKey => item
                .get("partitionKey")?
                .as_object()?
                .iter()
                .find(|(name, _)| name.ends_with(PARTITION_MARKER))
                .map(|(name, value)| (name.clone(), value_to_key_string(value))),
            Self::NameFallback => {
                let value = item.get("name")?.as_str()?;
                Some((DEFAULT_PARTITION_KEY.to_string(), value.to_string()))
            }
        }
    }
}

/// A partition key resolved from an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Attribute name of the partition key, e.g. `BUILD#`.
    pub name: String,
    /// Partition value.
    pub value: String,
    /// The shape that produced this key.
    pub shape: KeyShape,
}

/// Resolve the partition key of an item.
///
/// # Errors
///
/// Returns `CoreError::NoKeyFound` if the item matches none of the shapes.
pub fn resolve_key(item: &Item) -> Result<ResolvedKey> {
    KeyShape::PRECEDENCE
        .into_iter()
        .find_map(|shape| {
            shape
                .detect(item)
                .map(|(name, value)| ResolvedKey { name, value, shape })
        })
        .ok_or(CoreError::NoKeyFound)
}

/// Strings are used verbatim; anything else by its JSON text.
fn value_to_key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
