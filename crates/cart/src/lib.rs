//! Rocket Cart - client-side shopping cart state manager.
//!
//! Holds the authoritative in-memory cart, validates every mutation
//! against a remote stock-availability service, and keeps a durable
//! key-value store in sync so the cart survives process restarts.
//!
//! # Architecture
//!
//! [`store::CartStore`] is constructed once at process start with its
//! two collaborators injected: a [`catalog::Catalog`] implementation
//! for stock and product lookups, and a [`storage::Storage`]
//! implementation for persistence. UI layers clone the store handle
//! cheaply and observe changes through a watch channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::catalog::HttpCatalog;
//! use rocket_cart::config::CartConfig;
//! use rocket_cart::storage::FileStorage;
//! use rocket_cart::store::CartStore;
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config)?;
//! let storage = FileStorage::new(&config.storage_path);
//! let store = CartStore::new(catalog, storage);
//!
//! store.add_product(product_id).await?;
//! let cart = store.cart();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod storage;
pub mod store;
