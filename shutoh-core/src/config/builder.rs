// ============================================================================
// shutoh-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for DetectorConfig
//
// This module implements the builder pattern for the DetectorConfig
// structure. The CLI starts from defaults, a JSON file or the environment and
// layers individual command-line overrides on top through this builder.

use super::{DetectorConfig, DetectorKind};

/// Builder for creating DetectorConfig instances.
///
/// # Examples
///
/// ```rust
/// use shutoh_core::config::{DetectorConfigBuilder, DetectorKind};
///
/// let config = DetectorConfigBuilder::new()
///     .kind(DetectorKind::Adaptive)
///     .threshold(2.5)
///     .min_scene_len(10)
///     .window_width(3)
///     .build();
/// assert_eq!(config.window_width, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DetectorConfigBuilder {
    config: DetectorConfig,
}

impl DetectorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration instead of the defaults.
    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn kind(mut self, kind: DetectorKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = Some(threshold);
        self
    }

    pub fn min_scene_len(mut self, min_scene_len: i32) -> Self {
        self.config.min_scene_len = min_scene_len;
        self
    }

    pub fn window_width(mut self, window_width: i32) -> Self {
        self.config.window_width = window_width;
        self
    }

    pub fn min_content_val(mut self, min_content_val: f32) -> Self {
        self.config.min_content_val = min_content_val;
        self
    }

    pub fn dct_size(mut self, dct_size: i32) -> Self {
        self.config.dct_size = dct_size;
        self
    }

    pub fn lowpass(mut self, lowpass: i32) -> Self {
        self.config.lowpass = lowpass;
        self
    }

    pub fn bins(mut self, bins: i32) -> Self {
        self.config.bins = bins;
        self
    }

    pub fn fade_bias(mut self, fade_bias: f32) -> Self {
        self.config.fade_bias = fade_bias;
        self
    }

    pub fn build(self) -> DetectorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_only_named_fields() {
        let base = DetectorConfig {
            kind: DetectorKind::Hash,
            dct_size: 8,
            ..DetectorConfig::default()
        };
        let config = DetectorConfigBuilder::from_config(base)
            .threshold(0.3)
            .lowpass(4)
            .build();
        assert_eq!(config.kind, DetectorKind::Hash);
        assert_eq!(config.dct_size, 8);
        assert_eq!(config.lowpass, 4);
        assert_eq!(config.threshold, Some(0.3));
    }
}
