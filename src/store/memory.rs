//! In-process backend with DynamoDB key ordering and paging.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use super::{Backend, RawPage, RawQuery};
use crate::codec::AttributeMap;
use crate::error::BackendError;
use crate::item::{PK_ATTRIBUTE, SK_ATTRIBUTE};

const DEFAULT_PAGE_SIZE: usize = 100;

type Table = BTreeMap<(String, String), AttributeMap>;

/// Tables held in memory, lost when the last clone is dropped.
///
/// Items in a partition are ordered by `SK` byte-wise, like DynamoDB string
/// range keys. A query without a limit returns at most `page_size` items,
/// standing in for the service's own page size cap.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: page_size.max(1),
        }
    }

    /// Number of items stored in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }
}

fn key_string(map: &AttributeMap, name: &str) -> Result<String, BackendError> {
    match map.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(format!("key attribute {name} must be a string").into()),
        None => Err(format!("missing key attribute {name}").into()),
    }
}

fn key_of(map: &AttributeMap) -> Result<(String, String), BackendError> {
    Ok((key_string(map, PK_ATTRIBUTE)?, key_string(map, SK_ATTRIBUTE)?))
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn put_item(&self, table: &str, item: AttributeMap) -> Result<(), BackendError> {
        let key = key_of(&item)?;
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key, item);
        Ok(())
    }

    async fn get_item(
        &self,
        table: &str,
        key: AttributeMap,
    ) -> Result<Option<AttributeMap>, BackendError> {
        let key = key_of(&key)?;
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|items| items.get(&key)).cloned())
    }

    async fn query(&self, table: &str, query: RawQuery) -> Result<RawPage, BackendError> {
        let page_size = match query.limit {
            Some(limit) if limit > 0 => usize::try_from(limit)?.min(self.page_size),
            Some(limit) => return Err(format!("limit must be positive, got {limit}").into()),
            None => self.page_size,
        };
        let start_after = query
            .exclusive_start_key
            .as_ref()
            .map(key_of)
            .transpose()?;
        if let Some((pk, _)) = &start_after {
            if *pk != query.partition_key {
                return Err("exclusive start key belongs to another partition".into());
            }
        }

        let tables = self.tables.read().await;
        let Some(items) = tables.get(table) else {
            return Ok(RawPage::default());
        };

        let mut matching = items
            .range((query.partition_key.clone(), String::new())..)
            .take_while(|((pk, _), _)| *pk == query.partition_key)
            .filter(|((_, sk), _)| sk.starts_with(&query.sort_key_prefix))
            .filter(|(key, _)| start_after.as_ref().is_none_or(|start| *key > start));

        let page: Vec<_> = matching.by_ref().take(page_size).collect();
        let last_evaluated_key = match (page.last(), matching.next()) {
            (Some(((pk, sk), _)), Some(_)) => Some(AttributeMap::from([
                (PK_ATTRIBUTE.to_string(), AttributeValue::S(pk.clone())),
                (SK_ATTRIBUTE.to_string(), AttributeValue::S(sk.clone())),
            ])),
            _ => None,
        };

        Ok(RawPage {
            items: page.into_iter().map(|(_, item)| item.clone()).collect(),
            last_evaluated_key,
        })
    }
}
