//! API module for shared HTTP wire types
//!
//! Used by both sides of the blend API:
//! - blend-server (Persistence Service)
//! - blend-client (Persistence Client)
//!
//! # Design Principle
//!
//! This module contains ONLY plain serde types and route constants; no HTTP
//! framework dependencies. The server wraps them with axum responses, the
//! client decodes them from reqwest bodies.

pub mod types;

pub use types::{ErrorResponse, SaveResponse};

/// Collection route for create requests, relative to the API base
pub const BLEND_PATH: &str = "/blend";

/// Get-latest route, relative to the API base
pub const LATEST_PATH: &str = "/blend/latest";
