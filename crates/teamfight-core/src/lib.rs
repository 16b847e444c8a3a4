//! Core types and utilities for teamfight.
//!
//! This crate provides the foundational types shared by every layer of the
//! CRUD gateway:
//!
//! - **Items**: schemaless records ([`Item`]), primary keys and update operations
//! - **Table names**: validated table identifiers with their gateway resource segment
//! - **Key resolution**: the ordered heuristic that derives a partition key from an item
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use teamfight_core::{item_from_value, resolve_key, KeyShape, TableName};
//!
//! let table: TableName = "tft_builds".parse().unwrap();
//! assert_eq!(table.resource(), "builds");
//!
//! let item = item_from_value(json!({ "name": "Reroll Jinx" })).unwrap();
//! let key = resolve_key(&item).unwrap();
//! assert_eq!(key.name, "BUILD#");
//! assert_eq!(key.value, "Reroll Jinx");
//! assert_eq!(key.shape, KeyShape::NameFallback);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod item;
pub mod keys;
pub mod table;

pub use error::{CoreError, Result};
pub use item::{item_from_value, Item, PrimaryKey, UpdateOperation};
pub use keys::{resolve_key, KeyShape, ResolvedKey, DEFAULT_PARTITION_KEY, SORT_KEY};
pub use table::{TableName, TableNameError};
