//! Core types for Rocket Cart.

mod cart;
mod id;
mod product;

pub use cart::Cart;
pub use id::ProductId;
pub use product::{Product, ProductRecord, Stock};
