use super::{Page, get_entity, list_entities, put_entity};
use crate::error::Result;
use crate::item::QueryOptions;
use crate::keys::{self, ORDER_SK_PREFIX};
use crate::model::Order;
use crate::store::Store;

/// Orders live next to their user's profile, in the `USER#<email>` partition.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: Store,
}

impl OrderRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn put(&self, order: &Order) -> Result<()> {
        put_entity(&self.store, order).await
    }

    pub async fn get(&self, user_email: &str, order_id: &str) -> Result<Order> {
        let user_email = keys::identity("user_email", user_email)?;
        let order_id = keys::identity("order_id", order_id)?;
        get_entity(
            &self.store,
            &keys::user_pk(user_email),
            &keys::order_sk(order_id),
        )
        .await
    }

    /// One page of a user's orders, ordered by order id.
    ///
    /// A user without orders yields an empty page, not an error.
    pub async fn list_for_user(
        &self,
        user_email: &str,
        options: &QueryOptions,
    ) -> Result<Page<Order>> {
        let user_email = keys::identity("user_email", user_email)?;
        list_entities(
            &self.store,
            &keys::user_pk(user_email),
            ORDER_SK_PREFIX,
            options,
        )
        .await
    }
}
