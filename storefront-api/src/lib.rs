//! # Storefront API Server Library
//!
//! HTTP surface of the Storefront backend: routing, request extraction,
//! response envelopes and error mapping. Business rules live in
//! `storefront-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validated JSON bodies and path ids
//! - `middleware`: Request logging
//! - `response`: Success envelope and pagination metadata
//! - `routes`: API route handlers

pub mod app;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
