//! # Auth Services
//!
//! Authentication building blocks for the reservations backend: JWT token
//! handling, the route-guard middleware, and the `Owner` extractor that
//! hands the authenticated user id to request handlers.

/// JWT token minting and verification.
pub mod jwt;
/// Middleware guarding routes behind bearer-token authentication.
pub mod middleware;
/// Claims and error types used by the authentication services.
pub mod types;
