use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use super::{Entity, check, finite, not_blank};
use crate::error::ValidationError;
use crate::keys::{self, EntityKind, KeyPair};

/// A catalog product. All products share the `PRODUCT#ALL` partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct Product {
    #[validate(custom(function = "not_blank"))]
    pub product_id: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub price: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn validate(&self) -> Result<(), ValidationError> {
        check(self, &["product_id", "category", "name", "price", "stock"])?;
        finite("price", self.price)
    }

    fn key(&self) -> Result<KeyPair, ValidationError> {
        let product_id = keys::identity("product_id", &self.product_id)?;
        Ok(KeyPair::new(keys::product_pk(), keys::product_sk(product_id)))
    }
}
