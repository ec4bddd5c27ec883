/// Caller identity extraction
pub mod auth;
/// Scheduling error to HTTP response mapping
pub mod error_handling;
