//! Core types for ShopCart.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod catalog;
pub mod credentials;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

mod serde_helpers;

pub use cart::{Cart, CartItem, Quantity};
pub use catalog::{Item, PLACEHOLDER_IMAGE};
pub use credentials::{NewAccount, Password, Username, ValidationError};
pub use id::*;
pub use order::{Order, OrderRecord};
pub use price::Price;
pub use status::*;
