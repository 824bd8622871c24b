use super::{Page, get_entity, list_entities, put_entity};
use crate::error::Result;
use crate::item::QueryOptions;
use crate::keys::{self, PRODUCT_SK_PREFIX};
use crate::model::Product;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn put(&self, product: &Product) -> Result<()> {
        put_entity(&self.store, product).await
    }

    pub async fn get(&self, product_id: &str) -> Result<Product> {
        let product_id = keys::identity("product_id", product_id)?;
        get_entity(&self.store, &keys::product_pk(), &keys::product_sk(product_id)).await
    }

    /// One page of the catalog, ordered by product id.
    pub async fn list(&self, options: &QueryOptions) -> Result<Page<Product>> {
        list_entities(&self.store, &keys::product_pk(), PRODUCT_SK_PREFIX, options).await
    }
}
