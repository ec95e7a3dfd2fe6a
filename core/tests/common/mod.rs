// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use cartkeep::{
  CartResult, CartStore, CartStoreOptions, DocumentStore, MemoryDocumentStore, Product, ProductRepo, ShippingQuote,
  SwapOutcome,
};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicU32, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Fixtures ---
pub fn product(id: &str, name: &str, price: i32) -> Product {
  let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
  Product {
    product_id: id.to_string(),
    product_name: name.to_string(),
    seller_id: "seller-1".to_string(),
    price,
    category_id: "cat-1".to_string(),
    summary: format!("{} summary", name),
    product_condition: "new".to_string(),
    geo_id: "geo-1".to_string(),
    regist_day: ts,
    last_update: ts,
  }
}

pub fn standard_shipping() -> ShippingQuote {
  ShippingQuote::new(5.0, "standard", 3)
}

pub fn memory_cart_store(options: CartStoreOptions) -> (Arc<MemoryDocumentStore>, CartStore) {
  let docs = Arc::new(MemoryDocumentStore::new());
  let store = CartStore::new(docs.clone(), options);
  (docs, store)
}

// --- Document stores with scripted behavior ---

/// Rejects every conditional write and counts the attempts.
#[derive(Debug, Default)]
pub struct AlwaysConflictStore {
  pub swaps: AtomicU32,
  pub delay: Option<Duration>,
}

#[async_trait]
impl DocumentStore for AlwaysConflictStore {
  async fn get(&self, _key: &str) -> CartResult<Option<String>> {
    Ok(None)
  }

  async fn compare_and_swap(
    &self,
    _key: &str,
    _expected: Option<&str>,
    _value: &str,
    _ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    self.swaps.fetch_add(1, Ordering::SeqCst);
    Ok(SwapOutcome::Conflict)
  }
}

/// Yields to the scheduler between the read and the write so concurrent tasks
/// interleave even on a single-threaded runtime.
#[derive(Debug, Default)]
pub struct YieldingStore {
  pub inner: MemoryDocumentStore,
  pub conflicts: AtomicU32,
}

#[async_trait]
impl DocumentStore for YieldingStore {
  async fn get(&self, key: &str) -> CartResult<Option<String>> {
    let value = self.inner.get(key).await;
    tokio::task::yield_now().await;
    value
  }

  async fn compare_and_swap(
    &self,
    key: &str,
    expected: Option<&str>,
    value: &str,
    ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    let outcome = self.inner.compare_and_swap(key, expected, value, ttl).await?;
    if outcome == SwapOutcome::Conflict {
      self.conflicts.fetch_add(1, Ordering::SeqCst);
    }
    Ok(outcome)
  }
}

/// Never answers.
#[derive(Debug, Default)]
pub struct HangingStore;

#[async_trait]
impl DocumentStore for HangingStore {
  async fn get(&self, _key: &str) -> CartResult<Option<String>> {
    std::future::pending().await
  }

  async fn compare_and_swap(
    &self,
    _key: &str,
    _expected: Option<&str>,
    _value: &str,
    _ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    std::future::pending().await
  }
}

/// Fails every call with a transport error.
#[derive(Debug, Default)]
pub struct BrokenStore {
  pub calls: AtomicU32,
}

#[async_trait]
impl DocumentStore for BrokenStore {
  async fn get(&self, _key: &str) -> CartResult<Option<String>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(cartkeep::CartError::upstream("cart-store", anyhow::anyhow!("connection refused")))
  }

  async fn compare_and_swap(
    &self,
    _key: &str,
    _expected: Option<&str>,
    _value: &str,
    _ttl: Option<Duration>,
  ) -> CartResult<SwapOutcome> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Err(cartkeep::CartError::upstream("cart-store", anyhow::anyhow!("connection refused")))
  }
}

/// Wraps a product repo and records every batch it receives.
pub struct RecordingRepo<R> {
  pub inner: R,
  pub batches: Mutex<Vec<Vec<String>>>,
}

impl<R> RecordingRepo<R> {
  pub fn new(inner: R) -> Self {
    Self {
      inner,
      batches: Mutex::new(Vec::new()),
    }
  }
}

#[async_trait]
impl<R: ProductRepo> ProductRepo for RecordingRepo<R> {
  async fn fetch_by_ids(&self, ids: &[String]) -> CartResult<Vec<Product>> {
    self.batches.lock().push(ids.to_vec());
    self.inner.fetch_by_ids(ids).await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
