// cartkeep/src/model/view.rs

//! Display-ready cart: each stored line joined with its catalog product.

use super::cart::Cart;
use super::product::Product;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartViewItem {
  pub id: String,
  pub product: Product,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  pub shipping_fee: f64,
  pub shipping_type: String,
  pub shipping_days: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
  pub updated_at: DateTime<Utc>,
  pub items: Vec<CartViewItem>,
}

impl CartView {
  pub fn empty(now: DateTime<Utc>) -> Self {
    Self {
      updated_at: now,
      items: Vec::new(),
    }
  }

  /// Joins `cart` with `products` in the cart's stored order.
  ///
  /// Lines whose product is absent from `products` (deleted or unpublished since it
  /// was added) are left out of the view. This is a filter, not an error.
  pub fn join(cart: &Cart, products: &HashMap<String, Product>) -> Self {
    let items = cart
      .items
      .iter()
      .filter_map(|line| {
        let product = products.get(&line.product_id)?;
        Some(CartViewItem {
          id: line.line_id.clone(),
          product: product.clone(),
          quantity: line.quantity,
          added_at: line.added_at,
          shipping_fee: line.shipping_fee,
          shipping_type: line.shipping_type.clone(),
          shipping_days: line.shipping_days,
        })
      })
      .collect();

    Self {
      updated_at: cart.updated_at,
      items,
    }
  }
}
