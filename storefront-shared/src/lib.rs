//! # Storefront Shared Library
//!
//! Domain types, persistence and business logic used by both the Storefront
//! API server and the background worker.
//!
//! ## Module Organization
//!
//! - `config`: Layered configuration (file, then `APP_*` environment)
//! - `db`: Connection pool, database bootstrap and migrations
//! - `models`: Entity models and pagination
//! - `auth`: Password hashing
//! - `repository`: Storage traits and their Postgres implementations
//! - `service`: Business rules and the service error taxonomy
//! - `dto`: Validated request payloads

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the Storefront shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
