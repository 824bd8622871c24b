use std::sync::Arc;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;

use crate::store::{DynamoDbBackend, Store};

pub const DEFAULT_TABLE_NAME: &str = "single-table-demo";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// Where the single table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub table_name: String,
    pub region: String,
    /// Overrides the service endpoint, e.g. for DynamoDB Local.
    pub endpoint_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }
}

impl StoreConfig {
    /// Reads `DYNAMODB_TABLE_NAME`, `AWS_REGION` and `DYNAMODB_ENDPOINT_URL`,
    /// falling back to the defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            table_name: var("DYNAMODB_TABLE_NAME").unwrap_or(defaults.table_name),
            region: var("AWS_REGION").unwrap_or(defaults.region),
            endpoint_url: var("DYNAMODB_ENDPOINT_URL"),
        }
    }

    /// DynamoDB running locally at http://localhost:8000
    pub fn local(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            endpoint_url: Some(LOCAL_ENDPOINT.to_string()),
            ..Self::default()
        }
    }

    /// Build a client from the default credential chain with this region and
    /// endpoint.
    pub async fn client(&self) -> Client {
        let shared_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared_config)
            .region(Region::new(self.region.clone()));
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Client::from_conf(builder.build())
    }

    pub fn store(&self, client: Client) -> Store {
        Store::new(Arc::new(DynamoDbBackend::new(client)), self.table_name.clone())
    }
}
