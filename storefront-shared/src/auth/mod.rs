/// Credential utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification

pub mod password;
