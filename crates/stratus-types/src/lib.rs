pub mod api;
pub mod models;

/// Users are keyed by a sequential integer issued at registration.
pub type UserId = u64;
