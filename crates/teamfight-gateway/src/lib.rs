//! HTTP gateway for the teamfight CRUD service.
//!
//! This crate provides the public-facing API. It handles:
//!
//! - The multiplexed `/api/crud` endpoint
//! - CORS, request body limits and timeouts
//! - Mapping dispatch failures onto a JSON error envelope
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Clients                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    teamfight-gateway                        │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   CORS /    │ │   Router    │ │    Error            │    │
//! │  │   Limits    │ │  + Handlers │ │    Envelope         │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                     ┌──────────────────┐
//!                     │    Dispatcher    │
//!                     └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamfight_auth::{AuthConfig, UserInfoClient};
//! use teamfight_control::Dispatcher;
//! use teamfight_gateway::{create_router, GatewayConfig, GatewayState};
//! use teamfight_store::{HttpGatewayClient, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(HttpGatewayClient::new(&StoreConfig::default())?);
//! let identity = Arc::new(UserInfoClient::new(AuthConfig::default())?);
//! let dispatcher = Arc::new(Dispatcher::with_defaults(gateway, identity));
//!
//! let state = GatewayState::new(dispatcher, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
