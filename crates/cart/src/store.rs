//! The cart store: authoritative state, validation, persistence.
//!
//! All mutations follow the same sequence: take the mutation lock,
//! clone the current cart, validate against remote stock, apply the
//! change to the clone, persist the clone, then swap it into the watch
//! channel. Failures at any step leave both memory and durable storage
//! exactly as they were, so observers only ever see fully applied
//! updates.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{instrument, warn};

use rocket_cart_core::{Cart, ProductId};

use crate::catalog::{Catalog, CatalogError};
use crate::storage::{Storage, StorageError};

/// Fixed namespaced key under which the serialized cart is persisted.
pub const CART_STORAGE_KEY: &str = "@rocket-cart:cart";

/// Errors returned by cart mutations.
///
/// Each variant is a failure category; the UI layer owns the
/// operation-specific phrasing shown to the user.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds available stock, or the product
    /// has no stock record.
    #[error("requested quantity out of stock for product {0}")]
    OutOfStock(ProductId),

    /// The operation referenced a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Remote catalog/stock lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable storage read or write failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Fixed user-facing message for this failure category.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::OutOfStock(_) => "Requested quantity out of stock",
            Self::NotInCart(_) | Self::Catalog(_) | Self::Storage(_) => {
                "Could not update the cart"
            }
        }
    }
}

/// The shopping cart state manager.
///
/// Owns the authoritative in-process cart, mediates all reads and
/// writes, and keeps durable storage in sync with memory after every
/// successful mutation. Cheaply cloneable via `Arc`; clones share the
/// same state.
pub struct CartStore<C, S> {
    inner: Arc<CartStoreInner<C, S>>,
}

struct CartStoreInner<C, S> {
    catalog: C,
    storage: S,
    cart: watch::Sender<Cart>,
    // Serializes the read-validate-persist-swap sequence so concurrent
    // mutations cannot interleave and clobber each other's writes.
    mutation: Mutex<()>,
}

impl<C, S> Clone for CartStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S> CartStore<C, S>
where
    C: Catalog,
    S: Storage,
{
    /// Create a store with its collaborators injected.
    ///
    /// The cart is loaded once from durable storage under
    /// [`CART_STORAGE_KEY`]; absent or unreadable data falls back to an
    /// empty cart with a warning.
    pub fn new(catalog: C, storage: S) -> Self {
        let cart = load_cart(&storage);
        let (sender, _) = watch::channel(cart);

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                cart: sender,
                mutation: Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.cart.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver yields a fresh snapshot after every successful
    /// mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.cart.subscribe()
    }

    /// Add one unit of a product to the cart.
    ///
    /// A product already in the cart has its amount incremented by 1;
    /// a new product is fetched from the catalog and appended with
    /// amount 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] when the stock record is absent,
    ///   the incremented amount would exceed stock, or stock is zero
    ///   for a new line
    /// - [`CartError::Catalog`] / [`CartError::Storage`] on collaborator
    ///   failures; the cart is left unchanged
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> Result<(), CartError> {
        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        let stock = self.inner.catalog.stock(id).await?;
        let in_cart = cart.get(id).map(|line| line.amount);

        let allowed = match (stock.map(|s| s.amount), in_cart) {
            (None, _) => false,
            (Some(available), Some(amount)) => amount < available,
            (Some(available), None) => available > 0,
        };
        if !allowed {
            return Err(CartError::OutOfStock(id));
        }

        if let Some(line) = cart.get_mut(id) {
            line.amount += 1;
        } else {
            let record = self.inner.catalog.product(id).await?;
            cart.push(record.into_line(1));
        }

        self.persist_and_swap(cart)
    }

    /// Remove a product's line from the cart entirely.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`] when the product has no line
    /// - [`CartError::Storage`] on persistence failure; the cart is
    ///   left unchanged
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), CartError> {
        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        if cart.remove(id).is_none() {
            return Err(CartError::NotInCart(id));
        }

        self.persist_and_swap(cart)
    }

    /// Set a product's cart amount to exactly the requested value.
    ///
    /// A non-positive `amount` is a silent no-op.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`] when the product has no line
    /// - [`CartError::OutOfStock`] when the stock record is absent,
    ///   stock is zero, or the requested amount exceeds stock
    /// - [`CartError::Catalog`] / [`CartError::Storage`] on collaborator
    ///   failures; the cart is left unchanged
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_amount(&self, id: ProductId, amount: i64) -> Result<(), CartError> {
        if amount <= 0 {
            return Ok(());
        }
        // Stock amounts are u32, so anything larger can never be satisfied.
        let Ok(amount) = u32::try_from(amount) else {
            return Err(CartError::OutOfStock(id));
        };

        let _guard = self.inner.mutation.lock().await;
        let mut cart = self.cart();

        if cart.get(id).is_none() {
            return Err(CartError::NotInCart(id));
        }

        let available = self.inner.catalog.stock(id).await?.map_or(0, |s| s.amount);
        if available == 0 || amount > available {
            return Err(CartError::OutOfStock(id));
        }

        if let Some(line) = cart.get_mut(id) {
            line.amount = amount;
        }

        self.persist_and_swap(cart)
    }

    /// Persist the updated cart, then publish it to observers.
    ///
    /// Ordering matters: storage is written before the in-memory swap
    /// so a persistence failure leaves observers on the last
    /// successfully persisted cart.
    fn persist_and_swap(&self, cart: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&cart).map_err(StorageError::Serialize)?;
        self.inner.storage.set(CART_STORAGE_KEY, &serialized)?;
        self.inner.cart.send_replace(cart);
        Ok(())
    }
}

/// Load the persisted cart, falling back to empty on absent or
/// unreadable data.
fn load_cart<S: Storage>(storage: &S) -> Cart {
    match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!("Persisted cart is unreadable, starting empty: {e}");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!("Failed to read persisted cart, starting empty: {e}");
            Cart::new()
        }
    }
}
