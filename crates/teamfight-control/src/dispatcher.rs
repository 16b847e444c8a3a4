//! The CRUD routing state machine.
//!
//! Requests are evaluated in a fixed order:
//!
//! 1. the table must be named and part of the catalog;
//! 2. the authorization gate runs when a token is present or the method is
//!    not a read;
//! 3. the quota gate runs for creates and updates on user-owned tables;
//! 4. reads are routed to a lookup, an owner listing or a full scan;
//! 5. writes are decoded and forwarded, on user-owned tables only.
//!
//! Gate failures are terminal and happen before any write reaches the gateway.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use teamfight_auth::{Authorizer, IdentityProvider};
use teamfight_core::{item_from_value, Item, PrimaryKey, TableName, UpdateOperation};
use teamfight_store::GatewayClient;

use crate::catalog::{TableCatalog, TableClass};
use crate::error::{ControlError, Result};
use crate::quota::QuotaGuard;
use crate::types::{ControlConfig, CrudOutcome, CrudParams, CrudRequest, Method};

/// Trait defining the CRUD service.
///
/// The HTTP layer depends on this trait rather than on [`Dispatcher`], so it
/// can be driven by any implementation.
#[async_trait]
pub trait CrudService: Send + Sync {
    /// Dispatch one request to exactly one outcome.
    ///
    /// # Errors
    ///
    /// Returns a `ControlError` carrying the HTTP status of the failure.
    async fn dispatch(&self, request: CrudRequest) -> Result<CrudOutcome>;
}

/// Body of a delete request. The key may be spelled `key` or `Key`.
#[derive(Debug, Default, Deserialize)]
struct DeleteBody {
    #[serde(default, alias = "Key")]
    key: Option<PrimaryKey>,
}

/// The main CRUD dispatcher.
pub struct Dispatcher<G: GatewayClient, P: IdentityProvider> {
    gateway: Arc<G>,
    authorizer: Authorizer<P>,
    quota: QuotaGuard<G>,
    catalog: TableCatalog,
    config: ControlConfig,
}

impl<G: GatewayClient, P: IdentityProvider> Dispatcher<G, P> {
    /// Create a new dispatcher.
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        identity: Arc<P>,
        catalog: TableCatalog,
        config: ControlConfig,
    ) -> Self {
        Self {
            quota: QuotaGuard::new(Arc::clone(&gateway), config.clone()),
            authorizer: Authorizer::new(identity),
            gateway,
            catalog,
            config,
        }
    }

    /// Create with the default catalog and configuration.
    #[must_use]
    pub fn with_defaults(gateway: Arc<G>, identity: Arc<P>) -> Self {
        Self::new(
            gateway,
            identity,
            TableCatalog::default(),
            ControlConfig::default(),
        )
    }

    /// Validate the table parameter and classify it.
    fn classify(&self, table: Option<&str>) -> Result<(TableName, TableClass)> {
        let name = table.ok_or(ControlError::MissingTable)?;
        let table: TableName = name
            .parse()
            .map_err(|_| ControlError::TableNotAllowed(name.to_string()))?;

        match self.catalog.classify(&table) {
            Some(class) => Ok((table, class)),
            None => Err(ControlError::TableNotAllowed(table.to_string())),
        }
    }

    /// Route a read.
    async fn read(
        &self,
        table: &TableName,
        class: TableClass,
        params: &CrudParams,
        authorized: bool,
    ) -> Result<Vec<Item>> {
        if params.is_lookup() {
            if !authorized {
                tracing::debug!(table = %table, "Unauthorized lookup, returning no items");
                return Ok(Vec::new());
            }

            if let (Some(pkey), Some(pval), None) = (&params.pkey, &params.pval, &params.id) {
                return Ok(self.gateway.list_by_partition(table, pkey, pval).await?);
            }

            let email = params.email.as_deref().unwrap_or_default();
            let items = self
                .gateway
                .list_by_index(table, &self.config.owner_query(email))
                .await?;

            return Ok(match &params.id {
                Some(id) => items.into_iter().filter(|item| has_id(item, id)).collect(),
                None => items,
            });
        }

        if let Some(email) = &params.email {
            return Ok(self
                .gateway
                .list_by_index(table, &self.config.owner_query(email))
                .await?);
        }

        match class {
            TableClass::StaticReference => Ok(self.gateway.list_all(table).await?),
            TableClass::UserOwned => Err(ControlError::FullScanNotAllowed(table.to_string())),
        }
    }

    async fn create(&self, table: &TableName, body: &[u8]) -> Result<CrudOutcome> {
        let item = item_from_value(decode::<Value>(body)?)
            .map_err(|e| ControlError::InvalidBody(e.to_string()))?;

        let key = self.gateway.create(table, item).await?;
        tracing::info!(table = %table, key = %key.name, value = %key.value, "Item created");
        Ok(CrudOutcome::Created)
    }

    async fn update(
        &self,
        table: &TableName,
        params: &CrudParams,
        body: &[u8],
    ) -> Result<CrudOutcome> {
        let mut operation: UpdateOperation = decode(body)?;
        if operation.key.is_empty() {
            operation.key = params.primary_key().ok_or(ControlError::MissingKey)?;
        }

        self.gateway.update(table, &operation).await?;
        tracing::info!(table = %table, "Item updated");
        Ok(CrudOutcome::Updated)
    }

    async fn delete(
        &self,
        table: &TableName,
        params: &CrudParams,
        body: &[u8],
    ) -> Result<CrudOutcome> {
        let supplied = if is_blank(body) {
            None
        } else {
            decode::<DeleteBody>(body)?.key.filter(|key| !key.is_empty())
        };
        let key = supplied
            .or_else(|| params.primary_key())
            .ok_or(ControlError::MissingKey)?;

        self.gateway.delete(table, &key).await?;
        tracing::info!(table = %table, "Item deleted");
        Ok(CrudOutcome::Deleted)
    }
}

#[async_trait]
impl<G, P> CrudService for Dispatcher<G, P>
where
    G: GatewayClient + 'static,
    P: IdentityProvider + 'static,
{
    async fn dispatch(&self, request: CrudRequest) -> Result<CrudOutcome> {
        let CrudRequest {
            method,
            params,
            body,
        } = request;
        let params = params.normalized();
        let (table, class) = self.classify(params.table.as_deref())?;

        let email = params.email.as_deref().unwrap_or_default();
        let gated = params.token.is_some() || !method.is_read();
        if gated {
            let token = params.token.as_deref().unwrap_or_default();
            if !self.authorizer.validate(token, email).await {
                return Err(ControlError::Unauthorized);
            }
        }

        if method.is_write() && class == TableClass::UserOwned {
            self.quota.check(&table, email).await?;
        }

        tracing::debug!(method = %method, table = %table, authorized = gated, "Dispatching");

        match method {
            Method::Get => self
                .read(&table, class, &params, gated)
                .await
                .map(CrudOutcome::Items),
            Method::Post | Method::Put | Method::Delete if class != TableClass::UserOwned => {
                Err(ControlError::ReadOnlyTable(table.to_string()))
            }
            Method::Post => self.create(&table, &body).await,
            Method::Put => self.update(&table, &params, &body).await,
            Method::Delete => self.delete(&table, &params, &body).await,
        }
    }
}

impl<G: GatewayClient, P: IdentityProvider> Clone for Dispatcher<G, P> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            authorizer: self.authorizer.clone(),
            quota: self.quota.clone(),
            catalog: self.catalog.clone(),
            config: self.config.clone(),
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ControlError::InvalidBody(e.to_string()))
}

/// Whether the item's `id` field equals `id`. Non-string ids compare by JSON text.
fn has_id(item: &Item, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(other) => other.to_string() == id,
        None => false,
    }
}
