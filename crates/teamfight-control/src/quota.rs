//! Per-user item ceiling.
//!
//! The count is taken from the owner index on every write and never cached.
//! Two concurrent writes may both observe spare capacity; the ceiling is
//! best-effort.

use std::sync::Arc;

use teamfight_core::TableName;
use teamfight_store::GatewayClient;

use crate::error::{ControlError, Result};
use crate::types::ControlConfig;

/// Enforces the maximum number of items a user may own in a table.
pub struct QuotaGuard<G: GatewayClient> {
    gateway: Arc<G>,
    config: ControlConfig,
}

impl<G: GatewayClient> QuotaGuard<G> {
    /// Create a guard that counts items through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<G>, config: ControlConfig) -> Self {
        Self { gateway, config }
    }

    /// Whether `email` may own one more item in `table`.
    ///
    /// An empty email never has capacity.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Store` if the owner index cannot be queried.
    pub async fn has_capacity(&self, table: &TableName, email: &str) -> Result<bool> {
        if email.is_empty() {
            return Ok(false);
        }

        let owned = self
            .gateway
            .list_by_index(table, &self.config.owner_query(email))
            .await?;

        tracing::debug!(
            table = %table,
            email = %email,
            owned = owned.len(),
            limit = self.config.max_items_per_user,
            "Counted owned items"
        );

        Ok(owned.len() < self.config.max_items_per_user)
    }

    /// Fail with `QuotaExceeded` unless `email` has capacity.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::QuotaExceeded` at the limit, or
    /// `ControlError::Store` if the count fails.
    pub async fn check(&self, table: &TableName, email: &str) -> Result<()> {
        if self.has_capacity(table, email).await? {
            Ok(())
        } else {
            tracing::warn!(table = %table, email = %email, "Item limit reached");
            Err(ControlError::QuotaExceeded {
                limit: self.config.max_items_per_user,
            })
        }
    }
}

impl<G: GatewayClient> Clone for QuotaGuard<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: self.config.clone(),
        }
    }
}
