//! JWT Pizza Core - Shared types library.
//!
//! This crate provides common types used across the JWT Pizza storefront:
//! - `storefront` - The customer-facing site and role-gated dashboards
//! - `integration-tests` - End-to-end tests against a mock order API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
