//! The cart collection type.

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// An ordered sequence of cart lines, unique by product ID.
///
/// Serializes as a plain JSON array so persisted carts stay readable
/// and compatible with the storefront wire shape. Uniqueness is an
/// invariant maintained by the store's mutation operations, not by
/// this container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<Product>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the line for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.0.iter().find(|line| line.id == id)
    }

    /// Mutable lookup of the line for a product, if present.
    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.0.iter_mut().find(|line| line.id == id)
    }

    /// Append a line to the end of the cart.
    pub fn push(&mut self, line: Product) {
        self.0.push(line);
    }

    /// Remove the line for a product, preserving the relative order of
    /// the remaining lines. Returns the removed line, if any.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.0.iter().position(|line| line.id == id)?;
        Some(self.0.remove(index))
    }

    /// Iterate over the lines in cart order.
    pub fn iter(&self) -> core::slice::Iter<'_, Product> {
        self.0.iter()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.0.iter().map(|line| u64::from(line.amount)).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = core::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Product> for Cart {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
