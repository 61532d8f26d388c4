//! Cache types for catalog responses.
//!
//! Only the public catalog is cached. Cart and order responses are per-user
//! mutable state and always go to the backend.

use shopcart_core::{Item, ItemId};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Items,
    Item(ItemId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Items(Vec<Item>),
    Item(Box<Item>),
}
