//! Single table design on DynamoDB.
//!
//! Users, orders and products share one table. Each entity is stored in an
//! [`Item`] envelope whose `PK`/`SK` strings are derived by [`keys`], so a
//! user's orders sit in the user's partition and the whole catalog sits in
//! `PRODUCT#ALL`. Related entities are read back with prefix queries that
//! page through [`PageToken`]s.
//!
//! ```no_run
//! use chrono::Utc;
//! use singletable::{QueryOptions, StoreConfig, User, UserRepository, OrderRepository};
//!
//! # async fn example() -> singletable::Result<()> {
//! let config = StoreConfig::local("shop");
//! let store = config.store(config.client().await);
//!
//! let users = UserRepository::new(store.clone());
//! users
//!     .put(&User {
//!         email: "a@x.com".into(),
//!         name: "A".into(),
//!         created_at: Utc::now(),
//!     })
//!     .await?;
//!
//! let orders = OrderRepository::new(store);
//! let page = orders
//!     .list_for_user("a@x.com", &QueryOptions::with_limit(10))
//!     .await?;
//! # let _ = page;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod item;
pub mod keys;
pub mod model;
pub mod repository;
pub mod store;
pub mod table;

pub use config::StoreConfig;
pub use error::{Error, Operation, Result, ValidationError};
pub use item::{Item, PageToken, QueryOptions, QueryResult};
pub use keys::{EntityKind, KeyPair, PartitionKey, SortKey};
pub use model::{Entity, Order, OrderStatus, Product, User};
pub use repository::{OrderRepository, Page, ProductRepository, UserRepository};
pub use store::{Backend, DynamoDbBackend, MemoryBackend, Store};
