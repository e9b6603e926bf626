//! Blend data model

mod blend;
pub mod coerce;

pub use blend::{
    BlendId, BlendPayload, BlendRecord, BlendRow, BlendSnapshot, INVALID_PAYLOAD_MESSAGE,
    MILL_COUNT, ROW_COUNT,
};
