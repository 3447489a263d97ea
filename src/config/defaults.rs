//! Default values and presets for exports.

use super::types::ExportConfig;

/// Per-request timeout for the BOM server.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Size of the enrichment worker pool.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Upper bound on the enrichment worker pool.
pub const MAX_CONCURRENT_LIMIT: usize = 64;

// ============================================================================
// Presets
// ============================================================================

/// Named export presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPreset {
    /// Every enrichment kind enabled
    Full,
    /// Skip copyrights, matched files and download locations
    Basic,
}

impl ExportPreset {
    /// Apply this preset's enrichment switches to a config.
    pub fn apply(self, config: &mut ExportConfig) {
        if self == Self::Basic {
            config.enrichment.copyrights = false;
            config.enrichment.files = false;
            config.enrichment.download_locations = false;
        }
    }
}

impl ExportConfig {
    /// Default config with a preset applied.
    #[must_use]
    pub fn from_preset(preset: ExportPreset) -> Self {
        let mut config = Self::default();
        preset.apply(&mut config);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_preset_keeps_defaults() {
        let config = ExportConfig::from_preset(ExportPreset::Full);
        assert!(config.enrichment.copyrights);
        assert!(config.enrichment.files);
        assert!(config.enrichment.comments);
    }

    #[test]
    fn test_basic_preset() {
        let config = ExportConfig::from_preset(ExportPreset::Basic);
        assert!(!config.enrichment.copyrights);
        assert!(!config.enrichment.files);
        assert!(config.enrichment.comments);
    }
}
