//! Request and response types for CRUD dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use teamfight_core::{Item, PrimaryKey, SORT_KEY};
use teamfight_store::IndexQuery;

use crate::error::ControlError;

/// HTTP methods accepted by the CRUD endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read items.
    Get,
    /// Create an item.
    Post,
    /// Update an item.
    Put,
    /// Delete an item.
    Delete,
}

impl Method {
    /// Whether this method only reads.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Get)
    }

    /// Whether this method adds to or changes an item (and so counts against quota).
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// The method name in upper case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(ControlError::MethodNotAllowed(other.to_string())),
        }
    }
}

/// Query parameters of a CRUD request.
///
/// Empty values are treated the same as missing ones; call
/// [`CrudParams::normalized`] before inspecting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CrudParams {
    /// Target table.
    pub table: Option<String>,
    /// Partition key attribute name.
    pub pkey: Option<String>,
    /// Partition key value.
    pub pval: Option<String>,
    /// Asserted owner email.
    pub email: Option<String>,
    /// Bearer token proving the email.
    pub token: Option<String>,
    /// Item id.
    pub id: Option<String>,
}

impl CrudParams {
    /// Drop empty values.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            table: present(self.table),
            pkey: present(self.pkey),
            pval: present(self.pval),
            email: present(self.email),
            token: present(self.token),
            id: present(self.id),
        }
    }

    /// Whether the parameters address a single item.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        (self.id.is_some() && self.email.is_some())
            || (self.pkey.is_some() && self.pval.is_some())
    }

    /// Build a primary key from `pkey`/`pval`, adding the sort key from `id`.
    ///
    /// Returns `None` unless both `pkey` and `pval` are present.
    #[must_use]
    pub fn primary_key(&self) -> Option<PrimaryKey> {
        let (pkey, pval) = (self.pkey.as_ref()?, self.pval.as_ref()?);

        let mut key = PrimaryKey::new();
        key.insert(pkey.clone(), Value::String(pval.clone()));
        if let Some(id) = &self.id {
            key.insert(SORT_KEY.to_string(), Value::String(id.clone()));
        }
        Some(key)
    }
}

/// A CRUD request as received by the HTTP layer.
#[derive(Debug, Clone)]
pub struct CrudRequest {
    /// Request method.
    pub method: Method,
    /// Query parameters.
    pub params: CrudParams,
    /// Raw request body. May be empty.
    pub body: Vec<u8>,
}

impl CrudRequest {
    /// Create a request without a body.
    #[must_use]
    pub fn new(method: Method, params: CrudParams) -> Self {
        Self {
            method,
            params,
            body: Vec::new(),
        }
    }

    /// Attach a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// The successful result of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum CrudOutcome {
    /// Items returned by a read.
    Items(Vec<Item>),
    /// An item was created.
    Created,
    /// An item was updated.
    Updated,
    /// An item was deleted.
    Deleted,
}

impl CrudOutcome {
    /// HTTP status code of the response.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Created => 201,
            Self::Items(_) | Self::Updated | Self::Deleted => 200,
        }
    }

    /// JSON response body: `{"items": [...]}` or `{"message": "..."}`.
    #[must_use]
    pub fn into_body(self) -> Value {
        match self {
            Self::Items(items) => json!({ "items": items }),
            Self::Created => json!({ "message": "Item created successfully" }),
            Self::Updated => json!({ "message": "Item updated successfully" }),
            Self::Deleted => json!({ "message": "Item deleted successfully" }),
        }
    }
}

/// Configuration for request dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Maximum number of items a user may own per table.
    #[serde(default = "ControlConfig::default_max_items")]
    pub max_items_per_user: usize,
    /// Index used to look up items by owner.
    #[serde(default = "ControlConfig::default_owner_index")]
    pub owner_index: String,
    /// Attribute the owner index is keyed on.
    #[serde(default = "ControlConfig::default_owner_attribute")]
    pub owner_attribute: String,
}

impl ControlConfig {
    const fn default_max_items() -> usize {
        10
    }

    fn default_owner_index() -> String {
        IndexQuery::EMAIL_INDEX.to_string()
    }

    fn default_owner_attribute() -> String {
        "email".to_string()
    }

    /// Index query for every item owned by `email`.
    #[must_use]
    pub fn owner_query(&self, email: &str) -> IndexQuery {
        IndexQuery::new(&self.owner_index, &self.owner_attribute, email)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_items_per_user: Self::default_max_items(),
            owner_index: Self::default_owner_index(),
            owner_attribute: Self::default_owner_attribute(),
        }
    }
}
