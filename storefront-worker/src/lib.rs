//! # Storefront Worker Library
//!
//! Background process sharing configuration and the database with the API
//! server.
//!
//! ## Modules
//!
//! - `worker`: Worker lifecycle and shutdown signalling

pub mod worker;
