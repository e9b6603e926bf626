//! Shared API request/response types
//!
//! Success bodies for create/update and the error envelope used by every
//! failing route.

use serde::{Deserialize, Serialize};

use crate::model::BlendId;

// ========================================
// Success Types
// ========================================

/// Body returned by create (201) and update (200)
///
/// # Examples
///
/// ```
/// use blend_common::api::SaveResponse;
/// use blend_common::BlendId;
///
/// let created = SaveResponse::saved(BlendId::new("abc"));
/// assert_eq!(created.message, "Saved");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// "Saved" or "Updated"
    pub message: String,
    /// Server-confirmed record identifier; tolerated missing on decode
    #[serde(default)]
    pub id: Option<BlendId>,
}

impl SaveResponse {
    /// Response for a freshly created record
    pub fn saved(id: BlendId) -> Self {
        Self {
            message: "Saved".to_string(),
            id: Some(id),
        }
    }

    /// Response for an updated record
    pub fn updated(id: BlendId) -> Self {
        Self {
            message: "Updated".to_string(),
            id: Some(id),
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// Error envelope: `{"error": <message>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ========================================
// Tests
// ========================================
