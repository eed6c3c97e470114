//! # petconnect_core
//!
//! Core domain logic for PetConnect: token issuance and validation, credential
//! checks, principal/pet/contact stores and local file storage.

pub mod auth;
pub mod files;
pub mod ids;
pub mod migrate;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
