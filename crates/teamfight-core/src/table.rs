//! Table name type.
//!
//! Table names follow the remote store's naming rules and carry a prefix
//! (`tft_builds`). The gateway exposes each table under a resource segment
//! derived from the name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum length of a table name accepted by the remote store.
const MIN_LEN: usize = 3;

/// Maximum length of a table name accepted by the remote store.
const MAX_LEN: usize = 255;

/// Errors that can occur when parsing a table name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableNameError {
    /// The name is shorter or longer than the store permits.
    #[error("table name must be 3-255 characters, got {0}")]
    InvalidLength(usize),

    /// The name contains a character outside `[A-Za-z0-9_.-]`.
    #[error("invalid character {0:?} in table name")]
    InvalidCharacter(char),
}

/// A validated table name.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Return the table name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the gateway resource segment for this table.
    ///
    /// A two-part name such as `tft_builds` maps to `builds`; any other name
    /// is used as-is.
    #[must_use]
    pub fn resource(&self) -> &str {
        let mut parts = self.0.split('_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(suffix), None) => suffix,
            _ => &self.0,
        }
    }
}

impl FromStr for TableName {
    type Err = TableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(TableNameError::InvalidLength(len));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(TableNameError::InvalidCharacter(c));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableName({})", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = TableNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_strips_prefix() {
        let table: TableName = "tft_builds".parse().unwrap();
        assert_eq!(table.resource(), "builds");
        assert_eq!(table.as_str(), "tft_builds");
    }

    #[test]
    fn resource_keeps_unprefixed_name() {
        let table: TableName = "champions".parse().unwrap();
        assert_eq!(table.resource(), "champions");
    }

    #[test]
    fn resource_keeps_multi_part_name() {
        let table: TableName = "tft_set_14".parse().unwrap();
        assert_eq!(table.resource(), "tft_set_14");
    }

    #[test]
    fn rejects_short_name() {
        assert_eq!(
            "ab".parse::<TableName>(),
            Err(TableNameError::InvalidLength(2))
        );
    }

    #[test]
    fn rejects_invalid_character() {
        assert_eq!(
            "tft builds".parse::<TableName>(),
            Err(TableNameError::InvalidCharacter(' '))
        );
        assert_eq!(
            "tft/builds".parse::<TableName>(),
            Err(TableNameError::InvalidCharacter('/'))
        );
    }

    #[test]
    fn serde_roundtrip_validates() {
        let table: TableName = serde_json::from_str("\"tft_items\"").unwrap();
        assert_eq!(table.to_string(), "tft_items");
        assert!(serde_json::from_str::<TableName>("\"x\"").is_err());
    }
}
