pub mod account;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod routes;
pub mod weather;

pub use auth::{AppState, AppStateInner};
pub use routes::router;
