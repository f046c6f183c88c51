//! Rocket Cart Core - Shared cart domain types.
//!
//! This crate provides the types shared by every Rocket Cart component:
//! - `cart` - The state manager library consumed by storefront UIs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage access. This keeps it lightweight and allows it to be used
//! anywhere, including test fakes.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, cart line items, stock records, and the
//!   `Cart` collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
