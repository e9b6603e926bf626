//! Database access layer for blend-server
//!
//! The record store: one `blends` collection keyed by opaque id, supporting
//! insert, replace-by-id and latest-by-creation lookup. Records are never
//! deleted here.

mod blends;

pub use blends::{count_blends, get_blend, insert_blend, latest_blend, replace_blend};
