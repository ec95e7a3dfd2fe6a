// cartkeep/src/model/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product. Read-only from the cart's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub product_id: String,
  pub product_name: String,
  pub seller_id: String,
  pub price: i32,
  pub category_id: String,
  pub summary: String,
  pub product_condition: String,
  pub geo_id: String,
  pub regist_day: DateTime<Utc>,
  pub last_update: DateTime<Utc>,
}
