//! Typed repositories, one per entity, over a shared [`Store`].
//!
//! Repositories validate before they touch the store, so an invalid entity
//! never produces a write.

mod order;
mod product;
mod user;

pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};
use crate::item::{Item, PageToken, QueryOptions};
use crate::keys::{PartitionKey, SortKey};
use crate::model::Entity;
use crate::store::Store;

/// One page of entities in ascending sort key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Pass back in [`QueryOptions::page_token`] to get the next page;
    /// `None` once every matching entity has been returned.
    pub next_page_token: Option<PageToken>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

async fn put_entity<E: Entity + Serialize>(store: &Store, entity: &E) -> Result<()> {
    entity.validate()?;
    let key = entity.key()?;
    store.put_item(&Item::new(E::KIND, key, entity)).await
}

async fn get_entity<E: Entity + DeserializeOwned>(
    store: &Store,
    pk: &PartitionKey,
    sk: &SortKey,
) -> Result<E> {
    let item = store.get_item::<E>(pk, sk).await?;
    ensure_kind::<E>(&item)?;
    Ok(item.into_data())
}

async fn list_entities<E: Entity + DeserializeOwned>(
    store: &Store,
    pk: &PartitionKey,
    sk_prefix: &str,
    options: &QueryOptions,
) -> Result<Page<E>> {
    let result = store.query::<E>(pk, sk_prefix, options).await?;
    let items = result
        .items
        .into_iter()
        .map(|item| ensure_kind::<E>(&item).map(|()| item.into_data()))
        .collect::<Result<Vec<_>>>()?;

    Ok(Page {
        items,
        next_page_token: result.next_page_token,
    })
}

fn ensure_kind<E: Entity>(item: &Item<E>) -> Result<()> {
    if item.entity_type != E::KIND {
        return Err(Error::Serialization(format!(
            "item {}/{} holds {}, expected {}",
            item.pk,
            item.sk,
            item.entity_type,
            E::KIND
        )));
    }
    Ok(())
}
