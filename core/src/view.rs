// cartkeep/src/view.rs

//! Defines `CartViewComposer`, the read side: cart document joined with the catalog.

use crate::catalog::CatalogLookup;
use crate::context::CallContext;
use crate::error::CartResult;
use crate::model::CartView;
use crate::store::CartStore;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct CartViewComposer {
  carts: Arc<CartStore>,
  catalog: CatalogLookup,
}

impl CartViewComposer {
  pub fn new(carts: Arc<CartStore>, catalog: CatalogLookup) -> Self {
    Self { carts, catalog }
  }

  /// Builds the display view of the user's cart.
  ///
  /// A missing cart surfaces as `CartError::NotFound`; whether that renders as an
  /// empty cart is up to the caller. Lines pointing at products that no longer
  /// exist are dropped from the view.
  #[instrument(name = "CartViewComposer::compose", skip(self, ctx), err(Display))]
  pub async fn compose(&self, ctx: &CallContext, user_id: &str) -> CartResult<CartView> {
    let cart = self.carts.get(ctx, user_id).await?;
    let product_ids = cart.distinct_product_ids();
    let products = self.catalog.get_by_ids(ctx, &product_ids).await?;

    let view = CartView::join(&cart, &products);
    debug!(
      lines = cart.items.len(),
      shown = view.items.len(),
      "cart view composed"
    );
    Ok(view)
  }
}
