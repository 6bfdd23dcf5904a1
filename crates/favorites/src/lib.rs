//! # Favorites
//!
//! This crate provides the favorites-list domain for the campsite
//! reservations backend. It owns the mapping from a user to the set of
//! campsites that user has favorited and exposes idempotent
//! list/add/remove/clear operations on top of a document-store contract.

/// Types for favorites records, campsite references, and errors
mod favorite_types;
pub use favorite_types::*;

/// Store contract and the Postgres-backed implementation
mod favorite_store;
pub use favorite_store::*;

/// In-memory store for tests and local development
mod memory_store;
pub use memory_store::*;

/// Service mediating all reads and mutations of favorites lists
mod favorite_service;
pub use favorite_service::*;
