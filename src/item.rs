//! The storage envelope shared by every entity, and query paging types.

use aws_sdk_dynamodb::types::AttributeValue;
use serde_derive::{Deserialize, Serialize};

use crate::codec::AttributeMap;
use crate::error::{Error, Result};
use crate::keys::{EntityKind, KeyPair, PartitionKey, SortKey};

pub const PK_ATTRIBUTE: &str = "PK";
pub const SK_ATTRIBUTE: &str = "SK";

/// One physical item: the key pair, the entity tag and the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    #[serde(rename = "PK")]
    pub pk: PartitionKey,
    #[serde(rename = "SK")]
    pub sk: SortKey,
    pub entity_type: EntityKind,
    pub data: T,
}

impl<T> Item<T> {
    pub fn new(entity_type: EntityKind, key: KeyPair, data: T) -> Self {
        Self {
            pk: key.pk,
            sk: key.sk,
            entity_type,
            data,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Position of the last item returned in a page.
///
/// Passing it back in [`QueryOptions::page_token`] resumes the query right
/// after that item. It is a plain marker, not a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageToken {
    #[serde(rename = "PK")]
    pub pk: PartitionKey,
    #[serde(rename = "SK")]
    pub sk: SortKey,
}

impl PageToken {
    pub fn new(pk: PartitionKey, sk: SortKey) -> Self {
        Self { pk, sk }
    }

    /// The exclusive start key for the next query.
    pub fn to_start_key(&self) -> AttributeMap {
        AttributeMap::from([
            (
                PK_ATTRIBUTE.to_string(),
                AttributeValue::S(self.pk.as_str().to_string()),
            ),
            (
                SK_ATTRIBUTE.to_string(),
                AttributeValue::S(self.sk.as_str().to_string()),
            ),
        ])
    }

    /// Rebuild a token from the last evaluated key reported by the store.
    pub fn from_last_key(key: &AttributeMap) -> Result<Self> {
        Ok(Self {
            pk: PartitionKey::new(string_attribute(key, PK_ATTRIBUTE)?),
            sk: SortKey::new(string_attribute(key, SK_ATTRIBUTE)?),
        })
    }
}

fn string_attribute(key: &AttributeMap, name: &str) -> Result<String> {
    match key.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(other) => Err(Error::Serialization(format!(
            "last evaluated key attribute {name} is not a string: {other:?}"
        ))),
        None => Err(Error::Serialization(format!(
            "last evaluated key is missing {name}"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of items in the page. `None` or `Some(0)` leaves the
    /// page size to the store.
    pub limit: Option<u32>,
    pub page_token: Option<PageToken>,
}

impl QueryOptions {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            page_token: None,
        }
    }

    pub fn after(mut self, token: Option<PageToken>) -> Self {
        self.page_token = token;
        self
    }

    /// The limit to send to the store, if any.
    pub(crate) fn effective_limit(&self) -> Option<i32> {
        self.limit
            .filter(|limit| *limit > 0)
            .map(|limit| i32::try_from(limit).unwrap_or(i32::MAX))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    /// Items in ascending sort key order.
    pub items: Vec<Item<T>>,
    /// `None` when the store reported no further matching items.
    pub next_page_token: Option<PageToken>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_item, to_item};
    use crate::keys;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_wire_shape() {
        let key = KeyPair::new(keys::user_pk("a@x.com"), keys::order_sk("ORD1"));
        let item = Item::new(
            EntityKind::Order,
            key,
            serde_json::json!({ "order_id": "ORD1", "products": ["PROD1"] }),
        );

        let attrs = to_item(&item).unwrap();
        assert_eq!(attrs["PK"], AttributeValue::S("USER#a@x.com".to_string()));
        assert_eq!(attrs["SK"], AttributeValue::S("ORDER#ORD1".to_string()));
        assert_eq!(attrs["entity_type"], AttributeValue::S("ORDER".to_string()));
        assert!(matches!(attrs["data"], AttributeValue::M(_)));

        let decoded: Item<serde_json::Value> = from_item(&attrs).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_page_token_start_key_round_trip() {
        let token = PageToken::new(keys::user_pk("a@x.com"), keys::order_sk("ORD2"));
        let start_key = token.to_start_key();

        assert_eq!(start_key.len(), 2);
        assert_eq!(PageToken::from_last_key(&start_key).unwrap(), token);
    }

    #[test]
    fn test_page_token_requires_both_keys() {
        let mut key = PageToken::new(keys::product_pk(), keys::product_sk("P1")).to_start_key();
        key.remove(SK_ATTRIBUTE);
        assert!(matches!(
            PageToken::from_last_key(&key),
            Err(Error::Serialization(_))
        ));

        key.insert(SK_ATTRIBUTE.to_string(), AttributeValue::N("1".to_string()));
        assert!(matches!(
            PageToken::from_last_key(&key),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(QueryOptions::default().effective_limit(), None);
        assert_eq!(QueryOptions::with_limit(0).effective_limit(), None);
        assert_eq!(QueryOptions::with_limit(2).effective_limit(), Some(2));
        assert_eq!(
            QueryOptions::with_limit(u32::MAX).effective_limit(),
            Some(i32::MAX)
        );
    }
}
