// cartkeep/src/store/cart_store.rs

//! Defines `CartStore`, the per-user cart document store.
//!
//! Every mutation runs the same optimistic read-modify-write loop against a single key:
//!
//! 1. read the current document (absent means an empty cart),
//! 2. decode, apply a pure mutation, stamp `updated_at`,
//! 3. encode and conditionally write it back, only if the key still holds what was read,
//! 4. on a rejected write, throw the work away and start over, with no backoff,
//!    until the attempt budget runs out.
//!
//! Any other failure (transport, decoding, cancellation) aborts the loop at once.
//! Carts are low-contention, a handful of tabs per user at most, so unconditional
//! retry is enough to guarantee no lost update without a distributed lock.

use super::{DocumentStore, SwapOutcome};
use crate::codec;
use crate::context::CallContext;
use crate::error::{CartError, CartResult, ConflictError};
use crate::model::{Cart, ShippingQuote};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 10;

fn require_id(field: &str, value: &str) -> CartResult<()> {
  if value.trim().is_empty() {
    return Err(CartError::Validation(format!("{} must not be empty", field)));
  }
  Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartStoreOptions {
  /// Expiration refreshed on every successful write. `None` keeps carts forever.
  pub ttl: Option<Duration>,
  /// Total conditional-write attempts per mutation. Always at least 1.
  pub max_retries: u32,
}

impl Default for CartStoreOptions {
  fn default() -> Self {
    Self {
      ttl: None,
      max_retries: DEFAULT_MAX_RETRIES,
    }
  }
}

impl CartStoreOptions {
  /// `0` disables expiration.
  pub fn with_ttl_seconds(mut self, seconds: u64) -> Self {
    self.ttl = (seconds > 0).then(|| Duration::from_secs(seconds));
    self
  }

  pub fn with_max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries.max(1);
    self
  }
}

pub struct CartStore {
  store: Arc<dyn DocumentStore>,
  options: CartStoreOptions,
}

impl std::fmt::Debug for CartStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartStore").field("options", &self.options).finish()
  }
}

impl CartStore {
  pub fn new(store: Arc<dyn DocumentStore>, options: CartStoreOptions) -> Self {
    let options = CartStoreOptions {
      max_retries: options.max_retries.max(1),
      ..options
    };
    Self { store, options }
  }

  pub fn options(&self) -> &CartStoreOptions {
    &self.options
  }

  pub fn key(user_id: &str) -> String {
    format!("cart:{}", user_id)
  }

  /// Reads the user's cart. A missing document is `CartError::NotFound`.
  #[instrument(name = "CartStore::get", skip(self, ctx), err(Display))]
  pub async fn get(&self, ctx: &CallContext, user_id: &str) -> CartResult<Cart> {
    require_id("user_id", user_id)?;
    let key = Self::key(user_id);
    let raw = ctx.run(self.store.get(&key)).await?;
    debug!(found = raw.is_some(), "cart document read");
    match raw {
      Some(raw) => codec::decode(&raw),
      None => Err(CartError::NotFound {
        user_id: user_id.to_string(),
      }),
    }
  }

  #[instrument(name = "CartStore::add_line", skip(self, ctx, shipping), fields(shipping_type = %shipping.kind), err(Display))]
  pub async fn add_line(
    &self,
    ctx: &CallContext,
    user_id: &str,
    product_id: &str,
    quantity: i32,
    shipping: &ShippingQuote,
  ) -> CartResult<Cart> {
    require_id("user_id", user_id)?;
    require_id("product_id", product_id)?;
    let now = Utc::now();
    self
      .update_cart(ctx, user_id, |cart| cart.add_line(product_id, quantity, shipping, now))
      .await
  }

  #[instrument(name = "CartStore::set_line_quantity", skip(self, ctx), err(Display))]
  pub async fn set_line_quantity(&self, ctx: &CallContext, user_id: &str, line_id: &str, quantity: i32) -> CartResult<Cart> {
    require_id("user_id", user_id)?;
    require_id("line_id", line_id)?;
    self
      .update_cart(ctx, user_id, |cart| cart.set_line_quantity(line_id, quantity))
      .await
  }

  #[instrument(name = "CartStore::remove_line", skip(self, ctx), err(Display))]
  pub async fn remove_line(&self, ctx: &CallContext, user_id: &str, line_id: &str) -> CartResult<Cart> {
    require_id("user_id", user_id)?;
    require_id("line_id", line_id)?;
    self.update_cart(ctx, user_id, |cart| cart.remove_line(line_id)).await
  }

  /// Empties the cart but keeps the document.
  #[instrument(name = "CartStore::clear", skip(self, ctx), err(Display))]
  pub async fn clear(&self, ctx: &CallContext, user_id: &str) -> CartResult<Cart> {
    require_id("user_id", user_id)?;
    self.update_cart(ctx, user_id, Cart::clear).await
  }

  async fn update_cart<F>(&self, ctx: &CallContext, user_id: &str, mutate: F) -> CartResult<Cart>
  where
    F: Fn(&mut Cart) + Send,
  {
    let key = Self::key(user_id);
    let mut last_conflict = None;

    for attempt in 1..=self.options.max_retries {
      ctx.check()?;

      let current = ctx.run(self.store.get(&key)).await?;
      let mut cart = match current.as_deref() {
        Some(raw) => codec::decode(raw)?,
        None => Cart::empty(Utc::now()),
      };

      mutate(&mut cart);
      cart.updated_at = Utc::now();
      let encoded = codec::encode(&cart)?;

      let outcome = ctx
        .run(
          self
            .store
            .compare_and_swap(&key, current.as_deref(), &encoded, self.options.ttl),
        )
        .await?;

      match outcome {
        SwapOutcome::Applied => {
          debug!(attempt, lines = cart.items.len(), "cart updated");
          return Ok(cart);
        }
        SwapOutcome::Conflict => {
          debug!(attempt, "cart changed concurrently, retrying");
          last_conflict = Some(ConflictError {
            key: key.clone(),
            attempt,
          });
        }
      }
    }

    let attempts = self.options.max_retries;
    warn!(attempts, key = %key, "cart update retry budget exhausted");
    Err(CartError::ConflictExhausted {
      attempts,
      source: last_conflict.unwrap_or(ConflictError { key, attempt: attempts }),
    })
  }
}
