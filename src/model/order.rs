use std::fmt;

use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use super::{Entity, check, email_address, finite, not_blank, product_ids};
use crate::error::ValidationError;
use crate::keys::{self, EntityKind, KeyPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order, stored in its user's partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct Order {
    #[validate(custom(function = "not_blank"))]
    pub order_id: String,
    #[validate(
        custom(function = "email_address"),
        email(message = "must be a valid email address")
    )]
    pub user_email: String,
    pub status: OrderStatus,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub total: f64,
    /// Product ids, at least one.
    #[validate(
        length(min = 1, message = "must list at least one product"),
        custom(function = "product_ids")
    )]
    pub products: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn validate(&self) -> Result<(), ValidationError> {
        check(self, &["order_id", "user_email", "total", "products"])?;
        finite("total", self.total)
    }

    fn key(&self) -> Result<KeyPair, ValidationError> {
        let email = keys::identity("user_email", &self.user_email)?;
        let order_id = keys::identity("order_id", &self.order_id)?;
        Ok(KeyPair::new(keys::user_pk(email), keys::order_sk(order_id)))
    }
}
