// cartkeep/src/codec.rs

//! JSON codec for the persisted cart document.
//!
//! ```json
//! { "updated_at": "2024-01-01T00:00:00Z",
//!   "cart": [ { "id": "P1:standard", "product_id": "P1", "quantity": 2,
//!               "added_at": "2024-01-01T00:00:00Z", "shipping_fee": 5.0,
//!               "shipping_type": "standard", "shipping_days": 3 } ] }
//! ```
//!
//! Decoding accepts documents written by older cart versions: `"cart": null`,
//! lines without shipping fields, and lines without an `id`.

use crate::error::{CartError, CartResult};
use crate::model::{line_id, Cart, CartLine};
use serde::{Deserialize, Deserializer};

const CODEC_SERVICE: &str = "cart-codec";

pub fn encode(cart: &Cart) -> CartResult<String> {
  serde_json::to_string(cart).map_err(|e| CartError::upstream(CODEC_SERVICE, e))
}

pub fn decode(raw: &str) -> CartResult<Cart> {
  let mut cart: Cart = serde_json::from_str(raw).map_err(|e| CartError::upstream(CODEC_SERVICE, e))?;
  for line in cart.items.iter_mut().filter(|l| l.line_id.is_empty()) {
    line.line_id = line_id(&line.product_id, &line.shipping_type);
  }
  merge_duplicate_lines(&mut cart);
  Ok(cart)
}

// Older documents were keyed by product only, so backfilled ids can collide.
// Later duplicates fold into the first occurrence, which keeps its position and `added_at`.
fn merge_duplicate_lines(cart: &mut Cart) {
  let mut merged: Vec<CartLine> = Vec::with_capacity(cart.items.len());
  for line in cart.items.drain(..) {
    match merged.iter_mut().find(|m| m.line_id == line.line_id) {
      Some(first) => first.quantity = first.quantity.saturating_add(line.quantity),
      None => merged.push(line),
    }
  }
  cart.items = merged;
}

/// Treats an explicit JSON `null` like a missing sequence.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
