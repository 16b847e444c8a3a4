//! Schemaless item payloads.
//!
//! Items, primary keys and update operations are passed through this layer
//! without a fixed schema; only the partition-key heuristic in
//! [`crate::keys`] looks inside them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// One record in a named table: field name to dynamically-typed value.
pub type Item = Map<String, Value>;

/// Attribute name to value, identifying exactly one item within a table.
pub type PrimaryKey = Map<String, Value>;

/// An update against a single item, in the downstream store's expression syntax.
///
/// The expression and its placeholders are opaque to this layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOperation {
    /// Key of the item to update.
    #[serde(rename = "Key", default)]
    pub key: PrimaryKey,
    /// Update expression, e.g. `SET #n = :name`.
    #[serde(rename = "UpdateExpression", default)]
    pub update_expression: String,
    /// Values bound to the expression placeholders.
    #[serde(rename = "ExpressionAttributeValues", default)]
    pub expression_attribute_values: Map<String, Value>,
}

/// Convert an arbitrary JSON value into an [`Item`].
///
/// # Errors
///
/// Returns `CoreError::NotAnObject` if the value is not a JSON object.
pub fn item_from_value(value: Value) -> Result<Item> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::NotAnObject(json_kind(&other))),
    }
}

/// Human-readable JSON type name, used in error messages.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_operation_uses_gateway_field_names() {
        let op: UpdateOperation = serde_json::from_value(json!({
            "Key": { "BUILD#": "abc", "METADATA": "1" },
            "UpdateExpression": "SET #n = :name",
            "ExpressionAttributeValues": { ":name": "Fast 8" }
        }))
        .unwrap();

        assert_eq!(op.key["BUILD#"], "abc");
        assert_eq!(op.update_expression, "SET #n = :name");

        let back = serde_json::to_value(&op).unwrap();
        assert!(back.get("Key").is_some());
        assert!(back.get("ExpressionAttributeValues").is_some());
    }

    #[test]
    fn update_operation_defaults_missing_fields() {
        let op: UpdateOperation = serde_json::from_value(json!({
            "UpdateExpression": "REMOVE notes"
        }))
        .unwrap();
        assert!(op.key.is_empty());
        assert!(op.expression_attribute_values.is_empty());
    }

    #[test]
    fn item_from_value_rejects_non_objects() {
        assert!(item_from_value(json!({ "name": "x" })).is_ok());
        assert!(matches!(
            item_from_value(json!([1, 2])),
            Err(CoreError::NotAnObject("array"))
        ));
        assert!(matches!(
            item_from_value(json!("x")),
            Err(CoreError::NotAnObject("string"))
        ));
    }
}
