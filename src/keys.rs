//! Partition and sort key construction for the single table.
//!
//! Every entity lives in one table and is addressed by a `(PK, SK)` pair of
//! `TAG#value` strings. The functions here are pure: same identity in, same
//! key out, on every run.

use std::fmt;

use serde_derive::{Deserialize, Serialize};

use crate::error::ValidationError;

// ============================================================================
// Key prefixes
// ============================================================================

pub const USER_PREFIX: &str = "USER#";
pub const PROFILE_PREFIX: &str = "PROFILE#";
pub const ORDER_PREFIX: &str = "ORDER#";
pub const PRODUCT_PREFIX: &str = "PRODUCT#";

/// Identity of the shared partition holding the whole product catalog.
pub const PRODUCT_CATALOG: &str = "ALL";

/// Sort key prefix selecting every order under a user partition.
pub const ORDER_SK_PREFIX: &str = ORDER_PREFIX;

/// Sort key prefix selecting every product in the catalog partition.
pub const PRODUCT_SK_PREFIX: &str = PRODUCT_PREFIX;

/// The kind of entity an item holds, stored as its `entity_type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    User,
    Order,
    Product,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::User => "USER",
            EntityKind::Order => "ORDER",
            EntityKind::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Value of the `PK` attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionKey(String);

/// Value of the `SK` attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKey(String);

macro_rules! key_newtype {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

key_newtype!(PartitionKey);
key_newtype!(SortKey);

/// The full primary key of one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPair {
    pub pk: PartitionKey,
    pub sk: SortKey,
}

impl KeyPair {
    pub fn new(pk: PartitionKey, sk: SortKey) -> Self {
        Self { pk, sk }
    }
}

/// Generate the partition key for an entity kind.
///
/// Users and orders share the owning user's partition, products share the
/// catalog partition. The identity is used as-is.
pub fn partition_key_for(kind: EntityKind, identity: &str) -> PartitionKey {
    match kind {
        EntityKind::User | EntityKind::Order => PartitionKey(format!("{USER_PREFIX}{identity}")),
        EntityKind::Product => PartitionKey(format!("{PRODUCT_PREFIX}{identity}")),
    }
}

/// Generate the sort key for an entity kind. The identity is used as-is.
pub fn sort_key_for(kind: EntityKind, identity: &str) -> SortKey {
    match kind {
        EntityKind::User => SortKey(format!("{PROFILE_PREFIX}{identity}")),
        EntityKind::Order => SortKey(format!("{ORDER_PREFIX}{identity}")),
        EntityKind::Product => SortKey(format!("{PRODUCT_PREFIX}{identity}")),
    }
}

/// Check that an identity field can take part in a key.
///
/// An empty identity would yield a degenerate key such as `USER#` that every
/// other empty identity collides with.
pub fn identity<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

// ============================================================================
// User keys
// ============================================================================

/// Pattern: `USER#<email>`
pub fn user_pk(email: &str) -> PartitionKey {
    partition_key_for(EntityKind::User, email)
}

/// Pattern: `PROFILE#<email>`
pub fn user_sk(email: &str) -> SortKey {
    sort_key_for(EntityKind::User, email)
}

// ============================================================================
// Order keys
// ============================================================================

/// Pattern: `ORDER#<order_id>`, stored under the owning user's `USER#<email>`.
pub fn order_sk(order_id: &str) -> SortKey {
    sort_key_for(EntityKind::Order, order_id)
}

// ============================================================================
// Product keys
// ============================================================================

/// Pattern: `PRODUCT#ALL`
pub fn product_pk() -> PartitionKey {
    partition_key_for(EntityKind::Product, PRODUCT_CATALOG)
}

/// Pattern: `PRODUCT#<product_id>`
pub fn product_sk(product_id: &str) -> SortKey {
    sort_key_for(EntityKind::Product, product_id)
}
