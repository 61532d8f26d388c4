//! ShopCart Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront client library and
//! the command-line driver:
//! - `storefront` - Session, cart, and checkout controllers over the REST backend
//! - `cli` - Command-line driver for the storefront controllers
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Cart totals and credential validation live here so
//! they can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, catalog items, carts, orders, and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
