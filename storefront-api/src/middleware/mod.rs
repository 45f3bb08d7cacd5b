/// Middleware modules for the API server
///
/// - `logging`: per-request access log with status-dependent level

pub mod logging;
