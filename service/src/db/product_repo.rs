// service/src/db/product_repo.rs

use async_trait::async_trait;
use cartkeep::{CartError, CartResult, Product, ProductRepo};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, instrument};

#[derive(Debug, FromRow)]
struct ProductRow {
  product_id: String,
  product_name: String,
  seller_id: String,
  price: i32,
  category_id: String,
  summary: Option<String>,
  product_condition: String,
  geo_id: String,
  regist_day: DateTime<Utc>,
  last_update: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      product_id: row.product_id,
      product_name: row.product_name,
      seller_id: row.seller_id,
      price: row.price,
      category_id: row.category_id,
      summary: row.summary.unwrap_or_default(),
      product_condition: row.product_condition,
      geo_id: row.geo_id,
      regist_day: row.regist_day,
      last_update: row.last_update,
    }
  }
}

/// Product catalog backed by the `product` table.
#[derive(Debug, Clone)]
pub struct PgProductRepo {
  pool: PgPool,
}

impl PgProductRepo {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
  #[instrument(name = "PgProductRepo::fetch_by_ids", skip(self, ids), fields(count = ids.len()), err(Display))]
  async fn fetch_by_ids(&self, ids: &[String]) -> CartResult<Vec<Product>> {
    let rows: Vec<ProductRow> = sqlx::query_as(
      "SELECT product_id, product_name, seller_id, price, category_id, summary, \
       product_condition, geo_id, regist_day, last_update \
       FROM product WHERE product_id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to fetch products from database: {}", e);
      CartError::upstream("postgres", e)
    })?;

    Ok(rows.into_iter().map(Product::from).collect())
  }
}
