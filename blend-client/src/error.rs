//! Client error types

use thiserror::Error;

/// Failure of a save attempt; the message is meant for the operator
#[derive(Debug, Error)]
pub enum SaveError {
    /// Server answered with a non-success status
    #[error("Failed to save: {message}")]
    Rejected { status: u16, message: String },

    /// No response at all
    #[error("Network error saving data: {0}")]
    Transport(String),

    /// Latest-record lookup failed under the strict resolve policy
    #[error("Could not determine which blend to update: {0}")]
    Resolve(String),

    /// Success status but an unusable body
    #[error("Unexpected server response: {0}")]
    MalformedResponse(String),

    /// Server URL cannot serve as an API base
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),
}

/// Failure fetching one coal reference endpoint
#[derive(Debug, Error)]
pub enum CoalError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}
