//! HTTP API handlers for blend-server

pub mod blend;
pub mod buildinfo;
pub mod error;
pub mod health;

pub use blend::{create_blend, get_latest_blend, update_blend};
pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
