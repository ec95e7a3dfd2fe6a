// service/src/state.rs
use crate::config::AppConfig;
use cartkeep::{CallContext, CartStore, CartViewComposer, CatalogLookup, DocumentStore, ProductRepo};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
  pub carts: Arc<CartStore>,
  pub views: Arc<CartViewComposer>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, documents: Arc<dyn DocumentStore>, products: Arc<dyn ProductRepo>) -> Self {
    let carts = Arc::new(CartStore::new(documents, config.cart_store_options()));
    let views = Arc::new(CartViewComposer::new(carts.clone(), CatalogLookup::new(products)));
    Self { carts, views, config }
  }

  /// Fresh context for one request, bounded by the configured timeout.
  pub fn call_context(&self) -> CallContext {
    match self.config.request_timeout() {
      Some(timeout) => CallContext::with_timeout(timeout),
      None => CallContext::background(),
    }
  }
}
