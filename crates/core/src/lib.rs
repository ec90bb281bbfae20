//! Kube EC Core - Shared types library.
//!
//! This crate provides the domain types used across the Kube EC storefront:
//! - `storefront` - Stores, API client, and page controllers
//! - `cli` - Terminal front end driving the storefront pages
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
