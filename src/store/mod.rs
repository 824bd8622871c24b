//! Generic typed access to the single table.
//!
//! [`Store`] turns [`Item`] envelopes into attribute maps and back, and maps
//! the paging handshake of the underlying [`Backend`] onto [`PageToken`]s.

mod dynamodb;
mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Serialize, de::DeserializeOwned};

use crate::codec::{self, AttributeMap};
use crate::error::{BackendError, Error, Operation, Result};
use crate::item::{Item, PK_ATTRIBUTE, PageToken, QueryOptions, QueryResult, SK_ATTRIBUTE};
use crate::keys::{PartitionKey, SortKey};

pub use dynamodb::DynamoDbBackend;
pub use memory::MemoryBackend;

/// A key condition `PK = partition_key AND begins_with(SK, sort_key_prefix)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuery {
    pub partition_key: String,
    pub sort_key_prefix: String,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<AttributeMap>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub items: Vec<AttributeMap>,
    pub last_evaluated_key: Option<AttributeMap>,
}

/// The operations the store layer needs from a key-value service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Write an item, replacing any item with the same `PK`/`SK`.
    async fn put_item(
        &self,
        table: &str,
        item: AttributeMap,
    ) -> std::result::Result<(), BackendError>;

    /// Fetch the item at an exact key.
    async fn get_item(
        &self,
        table: &str,
        key: AttributeMap,
    ) -> std::result::Result<Option<AttributeMap>, BackendError>;

    /// Fetch one page of items matching the key condition, ascending by `SK`.
    async fn query(
        &self,
        table: &str,
        query: RawQuery,
    ) -> std::result::Result<RawPage, BackendError>;
}

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    table_name: String,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(backend: Arc<dyn Backend>, table_name: impl Into<String>) -> Self {
        Self {
            backend,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Put an item, overwriting whatever was stored at its key pair.
    pub async fn put_item<T: Serialize>(&self, item: &Item<T>) -> Result<()> {
        let attributes = codec::to_item(item)?;

        self.backend
            .put_item(&self.table_name, attributes)
            .await
            .map_err(|e| self.store_error(Operation::PutItem, e))?;

        tracing::debug!(
            table = %self.table_name,
            pk = %item.pk,
            sk = %item.sk,
            entity_type = %item.entity_type,
            "Item stored"
        );
        Ok(())
    }

    /// Get the item at `(pk, sk)`, or [`Error::NotFound`] if there is none.
    pub async fn get_item<T: DeserializeOwned>(
        &self,
        pk: &PartitionKey,
        sk: &SortKey,
    ) -> Result<Item<T>> {
        let key = AttributeMap::from([
            (
                PK_ATTRIBUTE.to_string(),
                AttributeValue::S(pk.as_str().to_string()),
            ),
            (
                SK_ATTRIBUTE.to_string(),
                AttributeValue::S(sk.as_str().to_string()),
            ),
        ]);

        let found = self
            .backend
            .get_item(&self.table_name, key)
            .await
            .map_err(|e| self.store_error(Operation::GetItem, e))?;

        match found {
            Some(attributes) => codec::from_item(&attributes),
            None => {
                tracing::debug!(table = %self.table_name, %pk, %sk, "Item not found");
                Err(Error::NotFound {
                    pk: pk.to_string(),
                    sk: sk.to_string(),
                })
            }
        }
    }

    /// Query one page of items under `pk` whose sort key starts with
    /// `sk_prefix`.
    ///
    /// A page shorter than the limit may still be followed by more items;
    /// only `next_page_token` tells whether the query is exhausted.
    pub async fn query<T: DeserializeOwned>(
        &self,
        pk: &PartitionKey,
        sk_prefix: &str,
        options: &QueryOptions,
    ) -> Result<QueryResult<T>> {
        let query = RawQuery {
            partition_key: pk.as_str().to_string(),
            sort_key_prefix: sk_prefix.to_string(),
            limit: options.effective_limit(),
            exclusive_start_key: options.page_token.as_ref().map(PageToken::to_start_key),
        };

        let page = self
            .backend
            .query(&self.table_name, query)
            .await
            .map_err(|e| self.store_error(Operation::Query, e))?;

        let items = page
            .items
            .iter()
            .map(codec::from_item)
            .collect::<Result<Vec<Item<T>>>>()?;
        let next_page_token = page
            .last_evaluated_key
            .as_ref()
            .map(PageToken::from_last_key)
            .transpose()?;

        tracing::debug!(
            table = %self.table_name,
            %pk,
            prefix = sk_prefix,
            count = items.len(),
            has_more = next_page_token.is_some(),
            "Query page fetched"
        );

        Ok(QueryResult {
            items,
            next_page_token,
        })
    }

    fn store_error(&self, operation: Operation, source: BackendError) -> Error {
        tracing::warn!(table = %self.table_name, %operation, error = %source, "Store call failed");
        Error::Store {
            operation,
            table: self.table_name.clone(),
            source,
        }
    }
}
