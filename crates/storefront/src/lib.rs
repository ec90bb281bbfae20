//! Kube EC storefront client library.
//!
//! The session and cart stores, the typed API client for the backend
//! gateway, and the page controllers that tie them together. Front ends
//! (the `kube-ec` CLI, the integration tests) own an [`state::AppState`]
//! and lend it to the controllers in [`pages`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod pages;
pub mod sequencer;
pub mod state;
pub mod storage;
pub mod stores;
