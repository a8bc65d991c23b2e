//! Detector configuration for the shutoh-core library.
//!
//! A [`DetectorConfig`] names the detection algorithm and carries every
//! tunable parameter of the detector family. Parameters that do not apply to
//! the selected algorithm are ignored. Configurations can be built in code
//! (see [`DetectorConfigBuilder`]), loaded from a JSON file, or layered with
//! `SHUTOH_*` environment variables.

mod builder;
pub mod utils;
mod validation;

pub use builder::DetectorConfigBuilder;

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use utils::*;

// Default constants

/// Default content detector threshold (mean HSV distance).
pub const DEFAULT_CONTENT_THRESHOLD: f32 = 27.0;

/// Default ratio of the center score to its neighbours for the adaptive detector.
pub const DEFAULT_ADAPTIVE_THRESHOLD: f32 = 3.0;

/// Default normalized Hamming distance for the hash detector.
pub const DEFAULT_HASH_THRESHOLD: f32 = 0.395;

/// Default histogram detector threshold. The detector cuts when the
/// correlation with the previous frame drops to `1 - threshold` or below.
pub const DEFAULT_HISTOGRAM_THRESHOLD: f32 = 0.05;

/// Default mean intensity below which the threshold detector considers a
/// frame faded out.
pub const DEFAULT_FADE_THRESHOLD: f32 = 12.0;

/// Default minimum number of frames between two cuts.
pub const DEFAULT_MIN_SCENE_LEN: i32 = 15;

/// Default number of frames on each side of the adaptive detector's center frame.
pub const DEFAULT_WINDOW_WIDTH: i32 = 2;

/// Default minimum content score before the adaptive detector considers a cut.
pub const DEFAULT_MIN_CONTENT_VAL: f32 = 15.0;

/// Default side length of the hash detector's DCT coefficient block.
pub const DEFAULT_DCT_SIZE: i32 = 16;

/// Default resize factor applied before the hash detector's DCT.
pub const DEFAULT_LOWPASS: i32 = 2;

/// Default number of luma histogram bins.
pub const DEFAULT_BINS: i32 = 256;

/// Default fade bias (0 places a fade cut halfway between fade-out and fade-in).
pub const DEFAULT_FADE_BIAS: f32 = 0.0;

/// The available detection algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    #[default]
    Content,
    Adaptive,
    Hash,
    Histogram,
    Threshold,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 5] = [
        DetectorKind::Content,
        DetectorKind::Adaptive,
        DetectorKind::Hash,
        DetectorKind::Histogram,
        DetectorKind::Threshold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Content => "content",
            DetectorKind::Adaptive => "adaptive",
            DetectorKind::Hash => "hash",
            DetectorKind::Histogram => "histogram",
            DetectorKind::Threshold => "threshold",
        }
    }

    /// Threshold used when none is configured.
    pub fn default_threshold(&self) -> f32 {
        match self {
            DetectorKind::Content => DEFAULT_CONTENT_THRESHOLD,
            DetectorKind::Adaptive => DEFAULT_ADAPTIVE_THRESHOLD,
            DetectorKind::Hash => DEFAULT_HASH_THRESHOLD,
            DetectorKind::Histogram => DEFAULT_HISTOGRAM_THRESHOLD,
            DetectorKind::Threshold => DEFAULT_FADE_THRESHOLD,
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DetectorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| {
                CoreError::InvalidConfig(format!(
                    "Unknown detector '{}', expected one of: content, adaptive, hash, histogram, threshold",
                    s
                ))
            })
    }
}

/// Detection algorithm selection and parameters.
///
/// Integer parameters are signed so that out-of-range values coming from
/// files, flags or the environment can be reported and replaced with their
/// defaults by [`DetectorConfig::sanitized`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Algorithm to run
    pub kind: DetectorKind,

    /// Detector threshold. `None` selects the algorithm's default.
    pub threshold: Option<f32>,

    /// Minimum number of frames between cuts
    pub min_scene_len: i32,

    //
    // Adaptive detector
    //
    /// Frames on each side of the center frame in the rolling window
    pub window_width: i32,

    /// Minimum content score of the center frame
    pub min_content_val: f32,

    //
    // Hash detector
    //
    /// Side length of the retained DCT block
    pub dct_size: i32,

    /// Resize factor applied before the DCT
    pub lowpass: i32,

    //
    // Histogram detector
    //
    /// Number of luma bins
    pub bins: i32,

    //
    // Threshold detector
    //
    /// Skews the fade cut toward the fade-out (-1.0) or fade-in (+1.0) frame
    pub fade_bias: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kind: DetectorKind::Content,
            threshold: None,
            min_scene_len: DEFAULT_MIN_SCENE_LEN,
            window_width: DEFAULT_WINDOW_WIDTH,
            min_content_val: DEFAULT_MIN_CONTENT_VAL,
            dct_size: DEFAULT_DCT_SIZE,
            lowpass: DEFAULT_LOWPASS,
            bins: DEFAULT_BINS,
            fade_bias: DEFAULT_FADE_BIAS,
        }
    }
}

impl DetectorConfig {
    /// Default configuration for the given algorithm.
    pub fn for_kind(kind: DetectorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Defaults overridden by any `SHUTOH_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `SHUTOH_*` environment overrides on top of `self`.
    ///
    /// Unparseable values are ignored, except for an unknown
    /// `SHUTOH_DETECTOR` which is logged and ignored.
    pub fn with_env_overrides(self) -> Self {
        let kind = match get_env_opt_string("SHUTOH_DETECTOR") {
            Some(name) => name.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring SHUTOH_DETECTOR: {}", e);
                self.kind
            }),
            None => self.kind,
        };

        Self {
            kind,
            threshold: get_env_opt_f32("SHUTOH_THRESHOLD").or(self.threshold),
            min_scene_len: get_env_i32("SHUTOH_MIN_SCENE_LEN", self.min_scene_len),
            window_width: get_env_i32("SHUTOH_WINDOW_WIDTH", self.window_width),
            min_content_val: get_env_f32("SHUTOH_MIN_CONTENT_VAL", self.min_content_val),
            dct_size: get_env_i32("SHUTOH_DCT_SIZE", self.dct_size),
            lowpass: get_env_i32("SHUTOH_LOWPASS", self.lowpass),
            bins: get_env_i32("SHUTOH_BINS", self.bins),
            fade_bias: get_env_f32("SHUTOH_FADE_BIAS", self.fade_bias),
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::NoSuchFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        log::debug!("Loaded detector configuration from {}", path.display());
        Ok(config)
    }

    /// The configured threshold, or the algorithm's default.
    pub fn effective_threshold(&self) -> f32 {
        self.threshold.unwrap_or_else(|| self.kind.default_threshold())
    }
}
