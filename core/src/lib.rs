// src/lib.rs

//! Cartkeep: a per-user shopping-cart document store for Rust services.
//!
//! Cartkeep provides:
//!  - A JSON cart document (one per user, key `cart:{user_id}`) with a tolerant codec.
//!  - `CartStore`: add/set/remove/clear mutations under optimistic concurrency control,
//!    retried without backoff against any keyed store offering compare-and-swap.
//!  - `CatalogLookup`: batched, de-duplicated product fetches.
//!  - `CartViewComposer`: the cart joined with the catalog in stored order, silently
//!    dropping lines whose product has disappeared.
//!  - `CallContext`: deadlines and cancellation honored at every network call.
//!
//! Storage and catalog backends are injected as `Arc<dyn DocumentStore>` and
//! `Arc<dyn ProductRepo>`; in-memory implementations of both ship with the crate.

pub mod catalog;
pub mod codec;
pub mod context;
pub mod error;
pub mod model;
pub mod store;
pub mod view;

// --- Re-exports for the Public API ---

pub use crate::context::{CallContext, CancelHandle};
pub use crate::error::{CancelReason, CartError, CartResult, ConflictError};

pub use crate::model::{line_id, Cart, CartLine, CartView, CartViewItem, Product, ShippingQuote};

pub use crate::store::{CartStore, CartStoreOptions, DocumentStore, MemoryDocumentStore, SwapOutcome};

pub use crate::catalog::{CatalogLookup, MemoryCatalog, ProductRepo};
pub use crate::view::CartViewComposer;

/*
    Typical wiring:
    1. Construct a `DocumentStore` (Redis in production, `MemoryDocumentStore` in tests)
       and a `ProductRepo` once at startup.
    2. `CartStore::new(store, CartStoreOptions::default().with_ttl_seconds(ttl))`.
    3. `CartViewComposer::new(Arc::new(cart_store), CatalogLookup::new(repo))`.
    4. Per request, build a `CallContext` (usually `with_timeout`) and call the store
       for writes or the composer for reads.
*/
