//! blend-client library - operator side of the blend log
//!
//! Save flow: form fields → [`form::build_snapshot`] → [`BlendClient::resolve`]
//! (session cache, else Get-latest) → create or update → session cache
//! refreshed with the confirmed id.
//!
//! The coal reference list is an outside collaborator; [`coal`] adapts its
//! loosely shaped responses into a catalog used to prefill rows.

pub mod client;
pub mod coal;
pub mod error;
pub mod form;
pub mod session;

pub use client::{BlendClient, SaveAction, SaveOutcome};
pub use coal::{CoalCatalog, CoalRef};
pub use error::{CoalError, SaveError};
pub use form::{build_snapshot, FieldMap, FormSource};
pub use session::{ResolvePolicy, SaveSession};
