//! Save session and identifier resolution policy

use blend_common::BlendId;

/// The record this session is editing
///
/// Owned by the caller and passed by `&mut` into every save, so one session
/// can never have two saves in flight. Written only after a definitive
/// server answer.
#[derive(Debug, Clone, Default)]
pub struct SaveSession {
    blend_id: Option<BlendId>,
}

impl SaveSession {
    /// Fresh session; the first save will look up the latest record
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that continues editing a known record
    pub fn resuming(id: BlendId) -> Self {
        Self { blend_id: Some(id) }
    }

    pub fn blend_id(&self) -> Option<&BlendId> {
        self.blend_id.as_ref()
    }

    pub(crate) fn remember(&mut self, id: BlendId) {
        self.blend_id = Some(id);
    }

    pub(crate) fn forget(&mut self) {
        self.blend_id = None;
    }
}

/// How a failed latest-record lookup is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResolvePolicy {
    /// Any failure means "no record yet": the save falls through to create.
    /// A transient network error can therefore duplicate the blend.
    #[default]
    Lenient,
    /// Only 404 means "no record yet"; other failures abort the save
    Strict,
}
