//! Sanitizing of detector parameters
//!
//! Out-of-range parameters are not fatal. Each one is replaced by its default
//! and reported with a warning before a detector is constructed.

use super::*;

impl DetectorConfig {
    /// Returns a copy with every out-of-range parameter reset to its default.
    pub fn sanitized(&self) -> DetectorConfig {
        let mut config = self.clone();

        if let Some(threshold) = config.threshold {
            if threshold < 0.0 || !threshold.is_finite() {
                let default = config.kind.default_threshold();
                log::warn!(
                    "threshold should be positive and is reset to {} (got {})",
                    default,
                    threshold
                );
                config.threshold = Some(default);
            }
        }

        if config.min_scene_len < 0 {
            log::warn!(
                "min_scene_len should be positive and is reset to {} (got {})",
                DEFAULT_MIN_SCENE_LEN,
                config.min_scene_len
            );
            config.min_scene_len = DEFAULT_MIN_SCENE_LEN;
        }

        match config.kind {
            DetectorKind::Content => {}
            DetectorKind::Adaptive => {
                if config.window_width < 1 {
                    log::warn!(
                        "window_width should be at least 1 and is reset to {} (got {})",
                        DEFAULT_WINDOW_WIDTH,
                        config.window_width
                    );
                    config.window_width = DEFAULT_WINDOW_WIDTH;
                }
                if config.min_content_val < 0.0 || !config.min_content_val.is_finite() {
                    log::warn!(
                        "min_content_val should be positive and is reset to {} (got {})",
                        DEFAULT_MIN_CONTENT_VAL,
                        config.min_content_val
                    );
                    config.min_content_val = DEFAULT_MIN_CONTENT_VAL;
                }
            }
            DetectorKind::Hash => {
                if config.dct_size < 1 {
                    log::warn!(
                        "dct_size should be at least 1 and is reset to {} (got {})",
                        DEFAULT_DCT_SIZE,
                        config.dct_size
                    );
                    config.dct_size = DEFAULT_DCT_SIZE;
                }
                if config.lowpass < 1 {
                    log::warn!(
                        "lowpass should be at least 1 and is reset to {} (got {})",
                        DEFAULT_LOWPASS,
                        config.lowpass
                    );
                    config.lowpass = DEFAULT_LOWPASS;
                }
            }
            DetectorKind::Histogram => {
                if !(1..=256).contains(&config.bins) {
                    log::warn!(
                        "bins should be between 1 and 256 and is reset to {} (got {})",
                        DEFAULT_BINS,
                        config.bins
                    );
                    config.bins = DEFAULT_BINS;
                }
            }
            DetectorKind::Threshold => {
                if config.fade_bias.abs() > 1.0 || !config.fade_bias.is_finite() {
                    log::warn!(
                        "fade_bias should be between -1.0 and +1.0 and is reset to {} (got {})",
                        DEFAULT_FADE_BIAS,
                        config.fade_bias
                    );
                    config.fade_bias = DEFAULT_FADE_BIAS;
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_is_unchanged() {
        let config = DetectorConfig {
            kind: DetectorKind::Adaptive,
            threshold: Some(2.5),
            min_scene_len: 0,
            window_width: 3,
            ..DetectorConfig::default()
        };
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_negative_values_reset_to_defaults() {
        let config = DetectorConfig {
            kind: DetectorKind::Content,
            threshold: Some(-1.0),
            min_scene_len: -5,
            ..DetectorConfig::default()
        }
        .sanitized();
        assert_eq!(config.threshold, Some(DEFAULT_CONTENT_THRESHOLD));
        assert_eq!(config.min_scene_len, DEFAULT_MIN_SCENE_LEN);
    }

    #[test]
    fn test_fade_bias_out_of_range_reset() {
        let config = DetectorConfig {
            kind: DetectorKind::Threshold,
            threshold: Some(-3.0),
            fade_bias: 1.5,
            ..DetectorConfig::default()
        }
        .sanitized();
        assert_eq!(config.threshold, Some(DEFAULT_FADE_THRESHOLD));
        assert_eq!(config.fade_bias, DEFAULT_FADE_BIAS);
    }

    #[test]
    fn test_structural_parameters_reset() {
        let hash = DetectorConfig {
            kind: DetectorKind::Hash,
            dct_size: 0,
            lowpass: -1,
            ..DetectorConfig::default()
        }
        .sanitized();
        assert_eq!(hash.dct_size, DEFAULT_DCT_SIZE);
        assert_eq!(hash.lowpass, DEFAULT_LOWPASS);

        let histogram = DetectorConfig {
            kind: DetectorKind::Histogram,
            bins: 1000,
            ..DetectorConfig::default()
        }
        .sanitized();
        assert_eq!(histogram.bins, DEFAULT_BINS);
    }
}
