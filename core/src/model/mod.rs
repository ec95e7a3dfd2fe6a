// cartkeep/src/model/mod.rs

//! Data structures for the cart document, catalog products and the joined view.

pub mod cart;
pub mod product;
pub mod view;

pub use cart::{line_id, Cart, CartLine, ShippingQuote};
pub use product::Product;
pub use view::{CartView, CartViewItem};
