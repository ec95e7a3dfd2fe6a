// cartkeep/src/model/cart.rs

//! The per-user cart document and its pure mutations.
//!
//! Everything here is synchronous and side-effect free: the store applies these
//! functions to a freshly read document inside its OCC loop and may run them
//! several times for a single request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Builds the identity of a cart line. A product may appear once per shipping option.
pub fn line_id(product_id: &str, shipping_type: &str) -> String {
  format!("{}:{}", product_id, shipping_type)
}

/// Shipping quote captured when a line is first added. Never re-validated on read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShippingQuote {
  pub fee: f64,
  pub kind: String,
  pub days: i32,
}

impl ShippingQuote {
  pub fn new(fee: f64, kind: impl Into<String>, days: i32) -> Self {
    Self {
      fee,
      kind: kind.into(),
      days,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  #[serde(rename = "id", default)]
  pub line_id: String,
  pub product_id: String,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  #[serde(default)]
  pub shipping_fee: f64,
  #[serde(default)]
  pub shipping_type: String,
  #[serde(default)]
  pub shipping_days: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  pub updated_at: DateTime<Utc>,
  #[serde(rename = "cart", default, deserialize_with = "crate::codec::null_as_empty")]
  pub items: Vec<CartLine>,
}

impl Cart {
  pub fn empty(now: DateTime<Utc>) -> Self {
    Self {
      updated_at: now,
      items: Vec::new(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn line(&self, line_id: &str) -> Option<&CartLine> {
    self.items.iter().find(|l| l.line_id == line_id)
  }

  fn position(&self, line_id: &str) -> Option<usize> {
    self.items.iter().position(|l| l.line_id == line_id)
  }

  /// Adds `quantity` to the line for (`product_id`, `shipping.kind`), inserting it at the
  /// end if missing. A resulting quantity <= 0 removes the line; a new line is only
  /// created for a positive quantity.
  pub fn add_line(&mut self, product_id: &str, quantity: i32, shipping: &ShippingQuote, now: DateTime<Utc>) {
    let id = line_id(product_id, &shipping.kind);
    match self.position(&id) {
      Some(idx) => {
        let line = &mut self.items[idx];
        line.quantity = line.quantity.saturating_add(quantity);
        if line.quantity <= 0 {
          self.items.remove(idx);
        }
      }
      None if quantity > 0 => self.items.push(CartLine {
        line_id: id,
        product_id: product_id.to_string(),
        quantity,
        added_at: now,
        shipping_fee: shipping.fee,
        shipping_type: shipping.kind.clone(),
        shipping_days: shipping.days,
      }),
      None => {}
    }
  }

  /// Replaces the quantity of an existing line. `quantity <= 0` removes it.
  ///
  /// Setting a positive quantity on an unknown line does nothing: the line id alone
  /// carries neither the shipping quote nor a reliable product reference.
  pub fn set_line_quantity(&mut self, line_id: &str, quantity: i32) {
    let Some(idx) = self.position(line_id) else {
      return;
    };
    if quantity <= 0 {
      self.items.remove(idx);
    } else {
      self.items[idx].quantity = quantity;
    }
  }

  pub fn remove_line(&mut self, line_id: &str) {
    if let Some(idx) = self.position(line_id) {
      self.items.remove(idx);
    }
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Distinct, non-empty product ids in first-occurrence order.
  pub fn distinct_product_ids(&self) -> Vec<String> {
    let mut seen = HashSet::with_capacity(self.items.len());
    self
      .items
      .iter()
      .filter(|l| !l.product_id.is_empty())
      .filter(|l| seen.insert(l.product_id.as_str()))
      .map(|l| l.product_id.clone())
      .collect()
  }
}
