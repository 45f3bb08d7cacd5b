/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness endpoint
/// - `users`: User CRUD and listing
/// - `products`: Product CRUD and listing
/// - `orders`: Order placement and lookup

pub mod health;
pub mod orders;
pub mod products;
pub mod users;
