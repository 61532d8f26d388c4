//! ShopCart Storefront client library.
//!
//! Keeps authentication state, the server-side cart, and navigation intent
//! consistent across requests, failures and redirects:
//!
//! - [`session`] - token and username, set and cleared together
//! - [`intent`] - read-once "where was the user going" before login
//! - [`cart`] - fetch, mutate, then re-fetch the authoritative cart
//! - [`checkout`] - turn the loaded cart into an order snapshot
//! - [`api`] - REST client; every request passes the auth pipeline
//! - [`pages`] - per-view controllers built on all of the above
//!
//! [`state::Storefront`] owns the shared pieces and hands them out.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod intent;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod state;
pub mod storage;

pub use error::{Result, StoreError};
pub use navigation::{Navigator, Route};
pub use state::Storefront;
