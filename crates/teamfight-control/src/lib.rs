//! Request dispatch for the teamfight CRUD gateway.
//!
//! This crate decides, from the HTTP method and a handful of query
//! parameters, which gateway operation a request maps to, and whether the
//! caller may perform it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Gateway (HTTP)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                           │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   Table     │ │   Auth      │ │    Quota            │    │
//! │  │   Catalog   │ │   Gate      │ │    Guard            │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//!        ┌──────────────┐             ┌──────────────┐
//!        │ Table gateway│             │  Identity    │
//!        │   (HTTP)     │             │  provider    │
//!        └──────────────┘             └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamfight_auth::{AuthConfig, UserInfoClient};
//! use teamfight_control::{CrudParams, CrudRequest, CrudService, Dispatcher, Method};
//! use teamfight_store::{HttpGatewayClient, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(HttpGatewayClient::new(&StoreConfig::default())?);
//! let identity = Arc::new(UserInfoClient::new(AuthConfig::default())?);
//! let dispatcher = Dispatcher::with_defaults(gateway, identity);
//!
//! let params = CrudParams {
//!     table: Some("tft_champions".to_string()),
//!     ..CrudParams::default()
//! };
//! let outcome = dispatcher.dispatch(CrudRequest::new(Method::Get, params)).await?;
//! println!("{}", outcome.into_body());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod quota;
pub mod types;

pub use catalog::{TableCatalog, TableClass};
pub use dispatcher::{CrudService, Dispatcher};
pub use error::{ControlError, Result};
pub use quota::QuotaGuard;
pub use types::{ControlConfig, CrudOutcome, CrudParams, CrudRequest, Method};
