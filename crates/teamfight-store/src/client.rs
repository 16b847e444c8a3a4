//! HTTP client for the remote table gateway.
//!
//! Every logical operation maps to exactly one outbound call. There is no
//! retry; the per-call timeout is the only cancellation mechanism.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use teamfight_core::{resolve_key, Item, PrimaryKey, ResolvedKey, TableName, UpdateOperation};

use crate::error::{Result, StoreError};
use crate::response::{gateway_error, snippet, ListBody};
use crate::StoreConfig;

/// Maximum body length written to the debug log.
const LOG_BODY_LEN: usize = 500;

/// Trait for gateway communication.
///
/// This trait abstracts the gateway interface, allowing for in-memory
/// implementations in tests.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Scan every item of a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn list_all(&self, table: &TableName) -> Result<Vec<Item>>;

    /// List the items stored under one partition key value.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn list_by_partition(
        &self,
        table: &TableName,
        partition_key: &str,
        partition_value: &str,
    ) -> Result<Vec<Item>>;

    /// Query a secondary index.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn list_by_index(&self, table: &TableName, query: &IndexQuery) -> Result<Vec<Item>>;

    /// Create an item, resolving its partition key first.
    ///
    /// Returns the key the item was stored under.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Payload` if no partition key can be resolved
    /// (no request is made), or an error if the gateway rejects the write.
    async fn create(&self, table: &TableName, item: Item) -> Result<ResolvedKey>;

    /// Apply an update operation to a single item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    async fn update(&self, table: &TableName, operation: &UpdateOperation) -> Result<()>;

    /// Delete a single item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    async fn delete(&self, table: &TableName, key: &PrimaryKey) -> Result<()>;
}

/// A secondary-index query: `attribute = value` on `index_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    /// Name of the index, e.g. `email-index`.
    pub index_name: String,
    /// Attribute the index is keyed on.
    pub attribute: String,
    /// Value to look up.
    pub value: String,
}

impl IndexQuery {
    /// Name of the index keyed on the owner's email.
    pub const EMAIL_INDEX: &'static str = "email-index";

    /// Create a query against an arbitrary index.
    #[must_use]
    pub fn new(
        index_name: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// All items owned by `email`.
    #[must_use]
    pub fn by_email(email: impl Into<String>) -> Self {
        Self::new(Self::EMAIL_INDEX, "email", email)
    }
}

/// Resolve an item's partition key and make sure the item carries it.
///
/// The key field is added at the top level when the item does not already
/// have it, so the stored record is addressable by partition queries.
///
/// # Errors
///
/// Returns `StoreError::Payload` if no partition key can be resolved.
pub fn prepare_item(mut item: Item) -> Result<(ResolvedKey, Item)> {
    let key = resolve_key(&item)?;
    if !item.contains_key(&key.name) {
        item.insert(key.name.clone(), key.value.clone().into());
    }
    Ok((key, item))
}

/// HTTP client for the table gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request body for deletions.
#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    #[serde(rename = "Key")]
    key: &'a PrimaryKey,
}

impl HttpGatewayClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL of the gateway.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a per-table operation, e.g. `{base}/builds/GET`.
    fn operation_url(&self, table: &TableName, op: &str) -> String {
        format!("{}/{}/{}", self.base_url, table.resource(), op)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(error_chain(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(format!("error reading response body: {e}")))?;

        tracing::debug!(
            status = %status,
            body = %snippet(&body, LOG_BODY_LEN),
            "Gateway response received"
        );

        if status.is_success() {
            Ok(body)
        } else {
            let err = gateway_error(status.as_u16(), &body);
            tracing::error!(status = %status, error = %err, "Gateway returned an error");
            Err(err)
        }
    }

    /// Issue a list request with the given query parameters.
    async fn list(&self, table: &TableName, query: &[(&str, &str)]) -> Result<Vec<Item>> {
        let url = self.operation_url(table, "GET");
        tracing::debug!(url = %url, query = ?query, "Listing items");

        let body = self.execute(self.client.get(&url).query(query)).await?;
        let items = ListBody::parse(&body)?.into_items();

        tracing::debug!(table = %table, count = items.len(), "Parsed list response");
        Ok(items)
    }
}

/// Render an error with its chain of causes, e.g. `...: connection refused`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn list_all(&self, table: &TableName) -> Result<Vec<Item>> {
        self.list(table, &[("TableName", table.as_str())]).await
    }

    async fn list_by_partition(
        &self,
        table: &TableName,
        partition_key: &str,
        partition_value: &str,
    ) -> Result<Vec<Item>> {
        self.list(
            table,
            &[
                ("TableName", table.as_str()),
                ("PartitionKey", partition_key),
                ("PartitionValue", partition_value),
            ],
        )
        .await
    }

    async fn list_by_index(&self, table: &TableName, query: &IndexQuery) -> Result<Vec<Item>> {
        self.list(
            table,
            &[
                ("TableName", table.as_str()),
                ("IndexName", query.index_name.as_str()),
                (query.attribute.as_str(), query.value.as_str()),
            ],
        )
        .await
    }

    async fn create(&self, table: &TableName, item: Item) -> Result<ResolvedKey> {
        let (key, item) = prepare_item(item)?;
        let url = self.operation_url(table, "POST");

        self.execute(
            self.client
                .post(&url)
                .query(&[("TableName", table.as_str())])
                .json(&item),
        )
        .await?;

        tracing::debug!(table = %table, key = %key.name, value = %key.value, "Created item");
        Ok(key)
    }

    async fn update(&self, table: &TableName, operation: &UpdateOperation) -> Result<()> {
        self.execute(
            self.client
                .put(&self.base_url)
                .query(&[("TableName", table.as_str())])
                .json(operation),
        )
        .await?;

        tracing::debug!(table = %table, "Updated item");
        Ok(())
    }

    async fn delete(&self, table: &TableName, key: &PrimaryKey) -> Result<()> {
        self.execute(
            self.client
                .delete(&self.base_url)
                .query(&[("TableName", table.as_str())])
                .json(&DeleteRequest { key }),
        )
        .await?;

        tracing::debug!(table = %table, "Deleted item");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teamfight_core::{item_from_value, CoreError, KeyShape};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn table(name: &str) -> TableName {
        name.parse().unwrap()
    }

    fn client_for(server: &MockServer) -> HttpGatewayClient {
        HttpGatewayClient::new(&StoreConfig {
            base_url: format!("{}/prod/", server.uri()),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        let client = HttpGatewayClient::new(&StoreConfig {
            base_url: "http://localhost:9000/prod/".to_string(),
            timeout_seconds: 30,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/prod");
    }

    #[test]
    fn prepare_item_adds_missing_key_field() {
        let item = item_from_value(json!({ "pkey": "BUILD#", "pval": "abc" })).unwrap();
        let (key, item) = prepare_item(item).unwrap();
        assert_eq!(key.shape, KeyShape::ExplicitPair);
        assert_eq!(item["BUILD#"], "abc");
        assert_eq!(item["pkey"], "BUILD#");
    }

    #[test]
    fn prepare_item_keeps_existing_key_field() {
        let item = item_from_value(json!({ "BUILD#": "abc", "name": "other" })).unwrap();
        let (_, prepared) = prepare_item(item.clone()).unwrap();
        assert_eq!(prepared, item);
    }

    #[tokio::test]
    async fn list_all_accepts_wrapped_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/champions/GET"))
            .and(query_param("TableName", "tft_champions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [{ "CHAMPION#": "Jinx" }, { "CHAMPION#": "Vi" }],
                "Count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .list_all(&table("tft_champions"))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["CHAMPION#"], "Jinx");
    }

    #[tokio::test]
    async fn list_by_partition_accepts_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/augments/GET"))
            .and(query_param("TableName", "tft_augments"))
            .and(query_param("PartitionKey", "AUGMENT#"))
            .and(query_param("PartitionValue", "Pandoras Bench"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "AUGMENT#": "Pandoras Bench" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .list_by_partition(&table("tft_augments"), "AUGMENT#", "Pandoras Bench")
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn list_by_index_sends_index_and_attribute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prod/builds/GET"))
            .and(query_param("TableName", "tft_builds"))
            .and(query_param("IndexName", "email-index"))
            .and(query_param("email", "a@x.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Items": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .list_by_index(&table("tft_builds"), &IndexQuery::by_email("a@x.com"))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn list_surfaces_gateway_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Requested resource not found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_all(&table("tft_items"))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            StoreError::Gateway { status: 400, message } if message == "Requested resource not found"
        ));
        assert_eq!(err.to_string(), "API error: Requested resource not found");
    }

    #[tokio::test]
    async fn error_status_never_yields_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "Items": [{ "id": "1" }] })))
            .mount(&server)
            .await;

        let result = client_for(&server).list_all(&table("tft_items")).await;
        assert!(matches!(result, Err(StoreError::Gateway { status: 500, .. })));
    }

    #[tokio::test]
    async fn create_posts_key_augmented_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prod/builds/POST"))
            .and(query_param("TableName", "tft_builds"))
            .and(body_json(json!({ "name": "Fast 8", "email": "a@x.com", "BUILD#": "Fast 8" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let item = item_from_value(json!({ "name": "Fast 8", "email": "a@x.com" })).unwrap();
        let key = client_for(&server)
            .create(&table("tft_builds"), item)
            .await
            .unwrap();
        assert_eq!(key.shape, KeyShape::NameFallback);
        assert_eq!(key.value, "Fast 8");
    }

    #[tokio::test]
    async fn create_without_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let item = item_from_value(json!({ "email": "a@x.com" })).unwrap();
        let err = client_for(&server)
            .create(&table("tft_builds"), item)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Payload(CoreError::NoKeyFound)));
    }

    #[tokio::test]
    async fn update_puts_operation_to_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/prod"))
            .and(query_param("TableName", "tft_builds"))
            .and(body_json(json!({
                "Key": { "BUILD#": "abc" },
                "UpdateExpression": "SET notes = :n",
                "ExpressionAttributeValues": { ":n": "updated" }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let operation: UpdateOperation = serde_json::from_value(json!({
            "Key": { "BUILD#": "abc" },
            "UpdateExpression": "SET notes = :n",
            "ExpressionAttributeValues": { ":n": "updated" }
        }))
        .unwrap();

        client_for(&server)
            .update(&table("tft_builds"), &operation)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_wraps_key() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/prod"))
            .and(query_param("TableName", "tft_builds"))
            .and(body_json(json!({ "Key": { "BUILD#": "abc", "METADATA": "1" } })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let key = item_from_value(json!({ "BUILD#": "abc", "METADATA": "1" })).unwrap();
        client_for(&server)
            .delete(&table("tft_builds"), &key)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn write_failure_uses_raw_body_when_not_json() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete(&table("tft_builds"), &PrimaryKey::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Gateway { status: 502, message } if message == "status code 502: Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_transport_error() {
        let client = HttpGatewayClient::new(&StoreConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 2,
        })
        .unwrap();

        let err = client.list_all(&table("tft_items")).await.unwrap_err();
        assert!(matches!(
            &err,
            StoreError::Transport(msg) if msg.to_lowercase().contains("connect")
        ));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_causes() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(error_chain(&err), "error sending request: connection refused");
    }
}
