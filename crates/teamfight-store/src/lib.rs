//! Client for the remote table gateway used by teamfight.
//!
//! The gateway is an HTTP facade over a key-value document store. This crate
//! turns the logical operations of the CRUD service into gateway calls and
//! normalizes the gateway's responses.
//!
//! # Operations
//!
//! | Operation | Method | URL |
//! |-----------|--------|-----|
//! | list all / partition / index | `GET` | `{base}/{resource}/GET?TableName=...` |
//! | create | `POST` | `{base}/{resource}/POST?TableName=...` |
//! | update | `PUT` | `{base}?TableName=...` |
//! | delete | `DELETE` | `{base}?TableName=...` |
//!
//! `{resource}` is derived from the table name (`tft_builds` -> `builds`).
//!
//! # Example
//!
//! ```no_run
//! use teamfight_store::{GatewayClient, HttpGatewayClient, IndexQuery, StoreConfig};
//!
//! # async fn example() -> teamfight_store::Result<()> {
//! let client = HttpGatewayClient::new(&StoreConfig::default())?;
//! let table = "tft_builds".parse().expect("valid table name");
//!
//! let _builds = client
//!     .list_by_index(&table, &IndexQuery::by_email("player@example.com"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod response;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use client::{prepare_item, GatewayClient, HttpGatewayClient, IndexQuery};
pub use error::{Result, StoreError};
pub use response::ListBody;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{GatewayCall, MemoryGateway};

/// Default base URL of the table gateway.
pub const DEFAULT_GATEWAY_URL: &str =
    "https://mga0vgs4zg.execute-api.us-east-1.amazonaws.com/prod";

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the gateway, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}
