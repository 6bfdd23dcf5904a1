//! # Web Handlers for the Campsite Reservations Web Application
//!
//! This crate provides the HTTP handlers and the route registration table
//! for the favorites resource.

/// Handlers for the favorites API endpoints
mod favorite_handlers;
pub use favorite_handlers::*;

/// Route registration table for the favorites resource
mod favorite_routes;
pub use favorite_routes::*;
