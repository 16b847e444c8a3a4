//! In-memory gateway for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use teamfight_core::{Item, PrimaryKey, ResolvedKey, TableName, UpdateOperation};

use crate::client::{prepare_item, GatewayClient, IndexQuery};
use crate::error::{Result, StoreError};

/// A call received by [`MemoryGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// `list_all`
    ListAll {
        /// Target table.
        table: String,
    },
    /// `list_by_partition`
    ListByPartition {
        /// Target table.
        table: String,
        /// Partition key attribute.
        key: String,
        /// Partition value.
        value: String,
    },
    /// `list_by_index`
    ListByIndex {
        /// Target table.
        table: String,
        /// The index query.
        query: IndexQuery,
    },
    /// `create`
    Create {
        /// Target table.
        table: String,
        /// The item as it would be sent.
        item: Item,
    },
    /// `update`
    Update {
        /// Target table.
        table: String,
        /// The update operation.
        operation: UpdateOperation,
    },
    /// `delete`
    Delete {
        /// Target table.
        table: String,
        /// The key of the deleted item.
        key: PrimaryKey,
    },
}

impl GatewayCall {
    /// Whether this call mutates the store.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: std::collections::HashMap<String, Vec<Item>>,
    calls: Vec<GatewayCall>,
    failure: Option<(u16, String)>,
}

/// Gateway backed by a map of tables, recording every call it receives.
///
/// Creates append to the table; updates and deletes are recorded but do
/// not touch stored items. Use [`MemoryGateway::set_failure`] to make every
/// subsequent call fail with a gateway error.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items to a table.
    pub fn seed(&self, table: &str, items: impl IntoIterator<Item = Item>) {
        self.inner
            .lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(items);
    }

    /// Make every subsequent call fail with the given status and message.
    pub fn set_failure(&self, status: u16, message: impl Into<String>) {
        self.inner.lock().failure = Some((status, message.into()));
    }

    /// All calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of mutating calls received so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.is_write()).count()
    }

    /// Items currently stored in a table.
    #[must_use]
    pub fn items(&self, table: &str) -> Vec<Item> {
        self.inner
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Record a call and fail if a failure is configured.
    fn record(&self, call: GatewayCall) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        match &inner.failure {
            Some((status, message)) => Err(StoreError::Gateway {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn filter(&self, table: &str, attribute: &str, value: &str) -> Vec<Item> {
        self.items(table)
            .into_iter()
            .filter(|item| item.get(attribute).and_then(Value::as_str) == Some(value))
            .collect()
    }
}

#[async_trait]
impl GatewayClient for MemoryGateway {
    async fn list_all(&self, table: &TableName) -> Result<Vec<Item>> {
        self.record(GatewayCall::ListAll {
            table: table.to_string(),
        })?;
        Ok(self.items(table.as_str()))
    }

    async fn list_by_partition(
        &self,
        table: &TableName,
        partition_key: &str,
        partition_value: &str,
    ) -> Result<Vec<Item>> {
        self.record(GatewayCall::ListByPartition {
            table: table.to_string(),
            key: partition_key.to_string(),
            value: partition_value.to_string(),
        })?;
        Ok(self.filter(table.as_str(), partition_key, partition_value))
    }

    async fn list_by_index(&self, table: &TableName, query: &IndexQuery) -> Result<Vec<Item>> {
        self.record(GatewayCall::ListByIndex {
            table: table.to_string(),
            query: query.clone(),
        })?;
        Ok(self.filter(table.as_str(), &query.attribute, &query.value))
    }

    async fn create(&self, table: &TableName, item: Item) -> Result<ResolvedKey> {
        let (key, item) = prepare_item(item)?;
        self.record(GatewayCall::Create {
            table: table.to_string(),
            item: item.clone(),
        })?;
        self.seed(table.as_str(), [item]);
        Ok(key)
    }

    async fn update(&self, table: &TableName, operation: &UpdateOperation) -> Result<()> {
        self.record(GatewayCall::Update {
            table: table.to_string(),
            operation: operation.clone(),
        })
    }

    async fn delete(&self, table: &TableName, key: &PrimaryKey) -> Result<()> {
        self.record(GatewayCall::Delete {
            table: table.to_string(),
            key: key.clone(),
        })
    }
}
