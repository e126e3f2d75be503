//! RateSmart Server
//!
//! REST service where businesses register, list products, and collect
//! customer reviews. Every review is scored for sentiment and checked for
//! signs of fabrication each time it is saved.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{ConfigOverrides, ServerConfig};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
