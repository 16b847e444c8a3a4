//! Bearer-token authorization for teamfight.
//!
//! This crate answers one question for the dispatcher: does this bearer token
//! belong to the identity the caller claims to be? It provides:
//!
//! - An [`IdentityProvider`] abstraction over the identity provider
//! - [`UserInfoClient`], which resolves tokens via the `/userinfo` endpoint
//! - [`Authorizer`], the fail-closed capability check on top of it
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Dispatcher     │────▶│   Authorizer     │
//! │   (control)      │     │ (email compare)  │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │ IdentityProvider │
//!                          │ (trait)          │
//!                          └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │ UserInfoClient   │
//!                          └────────┬─────────┘
//!                                   │ HTTPS
//!                          ┌────────▼─────────┐
//!                          │ GET /userinfo    │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamfight_auth::{AuthConfig, Authorizer, UserInfoClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_domain("tenant.us.auth0.com");
//! let authorizer = Authorizer::new(Arc::new(UserInfoClient::new(config)?));
//!
//! if authorizer.validate("access-token", "player@example.com").await {
//!     println!("token belongs to player@example.com");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod authorizer;
pub mod client;
pub mod error;

pub use authorizer::{Authorizer, IdentityProvider};
pub use client::{UserInfo, UserInfoClient};
pub use error::{AuthError, Result};

#[cfg(any(test, feature = "test-utils"))]
pub use authorizer::MockIdentityProvider;

/// Default identity provider domain.
pub const DEFAULT_DOMAIN: &str = "dev-a0oi0uq2ah7wnkxf.us.auth0.com";

/// Configuration for the identity provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider (e.g., `https://tenant.us.auth0.com`).
    pub base_url: String,
    /// Timeout for each call to the identity provider, in seconds.
    pub timeout_seconds: u64,
}

impl AuthConfig {
    /// Build a configuration for an identity provider served over HTTPS at `domain`.
    #[must_use]
    pub fn from_domain(domain: &str) -> Self {
        Self {
            base_url: format!("https://{domain}"),
            ..Self::default()
        }
    }

    /// Get the user-info endpoint URL.
    #[must_use]
    pub fn userinfo_url(&self) -> String {
        format!("{}/userinfo", self.base_url.trim_end_matches('/'))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: format!("https://{DEFAULT_DOMAIN}"),
            timeout_seconds: 30,
        }
    }
}
