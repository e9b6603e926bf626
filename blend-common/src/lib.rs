//! # Blend Common Library
//!
//! Shared code for the coal blend log services including:
//! - Blend data model (rows, snapshots, persisted records)
//! - Lenient numeric coercion used by both the form builder and the server
//! - API request/response types
//! - Data folder resolution
//! - Database initialization

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod model;
pub mod time;

pub use error::{Error, Result};
pub use model::{BlendId, BlendPayload, BlendRecord, BlendRow, BlendSnapshot, MILL_COUNT, ROW_COUNT};
