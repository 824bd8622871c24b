use super::{get_entity, put_entity};
use crate::error::Result;
use crate::keys;
use crate::model::User;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Store a user profile, replacing any profile with the same email.
    pub async fn put(&self, user: &User) -> Result<()> {
        put_entity(&self.store, user).await
    }

    /// Get a user profile by email.
    pub async fn get(&self, email: &str) -> Result<User> {
        let email = keys::identity("email", email)?;
        get_entity(&self.store, &keys::user_pk(email), &keys::user_sk(email)).await
    }
}
