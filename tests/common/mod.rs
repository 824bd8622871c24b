#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use singletable::codec::AttributeMap;
use singletable::error::BackendError;
use singletable::store::{RawPage, RawQuery};
use singletable::{Backend, MemoryBackend, Order, OrderStatus, Product, Store, User};

pub const TABLE: &str = "single-table-test";

/// Wraps a [`MemoryBackend`] and counts the calls that reach it.
#[derive(Debug, Default)]
pub struct CountingBackend {
    inner: MemoryBackend,
    puts: AtomicUsize,
    gets: AtomicUsize,
    queries: AtomicUsize,
}

impl CountingBackend {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: MemoryBackend::with_page_size(page_size),
            ..Self::default()
        }
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.gets.load(Ordering::SeqCst) + self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for CountingBackend {
    async fn put_item(&self, table: &str, item: AttributeMap) -> Result<(), BackendError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_item(table, item).await
    }

    async fn get_item(
        &self,
        table: &str,
        key: AttributeMap,
    ) -> Result<Option<AttributeMap>, BackendError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(table, key).await
    }

    async fn query(&self, table: &str, query: RawQuery) -> Result<RawPage, BackendError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(table, query).await
    }
}

/// A backend whose every call fails, like an unreachable service.
#[derive(Debug, Default)]
pub struct UnavailableBackend;

#[async_trait]
impl Backend for UnavailableBackend {
    async fn put_item(&self, _table: &str, _item: AttributeMap) -> Result<(), BackendError> {
        Err("connection refused".into())
    }

    async fn get_item(
        &self,
        _table: &str,
        _key: AttributeMap,
    ) -> Result<Option<AttributeMap>, BackendError> {
        Err("connection refused".into())
    }

    async fn query(&self, _table: &str, _query: RawQuery) -> Result<RawPage, BackendError> {
        Err("connection refused".into())
    }
}

pub fn counting_store() -> (Store, Arc<CountingBackend>) {
    counting_store_with_page_size(100)
}

pub fn counting_store_with_page_size(page_size: usize) -> (Store, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend::with_page_size(page_size));
    (Store::new(backend.clone(), TABLE), backend)
}

pub fn user(email: &str, name: &str) -> User {
    User {
        email: email.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
    }
}

pub fn order(order_id: &str, user_email: &str, products: &[&str]) -> Order {
    Order {
        order_id: order_id.to_string(),
        user_email: user_email.to_string(),
        status: OrderStatus::Pending,
        total: 99.99,
        products: products.iter().map(|p| p.to_string()).collect(),
        created_at: Utc::now(),
    }
}

pub fn product(product_id: &str, price: f64) -> Product {
    Product {
        product_id: product_id.to_string(),
        category: "Electronics".to_string(),
        name: format!("Product {product_id}"),
        price,
        stock: 100,
        created_at: Utc::now(),
    }
}
