use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};

use super::{Entity, check, email_address, not_blank};
use crate::error::ValidationError;
use crate::keys::{self, EntityKind, KeyPair};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
pub struct User {
    #[validate(
        custom(function = "email_address"),
        email(message = "must be a valid email address")
    )]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn validate(&self) -> Result<(), ValidationError> {
        check(self, &["email", "name"])
    }

    fn key(&self) -> Result<KeyPair, ValidationError> {
        let email = keys::identity("email", &self.email)?;
        Ok(KeyPair::new(keys::user_pk(email), keys::user_sk(email)))
    }
}
