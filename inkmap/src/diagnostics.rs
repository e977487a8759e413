//! Non-fatal problems collected during a render.

/// Best-effort failures of a completed render.
///
/// These never abort rendering: an unknown style override key means the
/// override was skipped, a skipped icon means an earlier icon already
/// occupied its pixel space.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderDiagnostics {
    ignored_style_keys: Vec<String>,
    skipped_icons: Vec<u64>,
}

impl RenderDiagnostics {
    pub(crate) fn record_ignored_key(&mut self, key: String) {
        self.ignored_style_keys.push(key);
    }

    pub(crate) fn record_skipped_icon(&mut self, element_id: u64) {
        self.skipped_icons.push(element_id);
    }

    /// Style override keys that were ignored because their category part is
    /// not recognized.
    pub fn ignored_style_keys(&self) -> &[String] {
        &self.ignored_style_keys
    }

    /// Ids of the elements whose icons were skipped due to overlap.
    pub fn skipped_icons(&self) -> &[u64] {
        &self.skipped_icons
    }

    /// Number of icons skipped due to overlap.
    pub fn skipped_icon_count(&self) -> usize {
        self.skipped_icons.len()
    }

    /// Returns true if the render completed without any warnings.
    pub fn is_clean(&self) -> bool {
        self.ignored_style_keys.is_empty() && self.skipped_icons.is_empty()
    }
}
