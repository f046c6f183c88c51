//! Cart line items and remote stock records.
//!
//! The remote catalog owns the descriptive shape of a product (name,
//! price, image, and whatever else it chooses to return). This module
//! carries those fields opaquely: they are captured into a flattened
//! JSON map on deserialization and written back out unchanged, so the
//! cart never has to chase catalog schema changes.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A line item in the cart.
///
/// `amount` is the quantity currently in the cart and is always at
/// least 1 for a line that exists. All descriptive fields from the
/// remote catalog record pass through `details` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub amount: u32,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// A full product record as returned by the remote catalog.
///
/// Identical to [`Product`] except it carries no quantity; the cart
/// assigns one when the record becomes a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl ProductRecord {
    /// Turn this catalog record into a cart line with the given quantity.
    #[must_use]
    pub fn into_line(self, amount: u32) -> Product {
        Product {
            id: self.id,
            amount,
            details: self.details,
        }
    }
}

/// The maximum purchasable quantity for a product at query time.
///
/// Remote-sourced and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
