//! # Postgres
//!
//! This crate provides the PostgreSQL connection layer for the campsite
//! reservations backend.

/// Database connection pool construction and connectivity check.
pub mod database;
