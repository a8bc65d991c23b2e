//! Command implementations for the CLI.
//!
//! Every command first runs scene detection over the input with the
//! configured detector, then hands the scene list to its output writer.

pub mod list_scenes;
pub mod save_images;
pub mod split_video;

use crate::cli::Cli;
use crate::reporting::TerminalReporter;
use shutoh_core::config::{DetectorConfig, DetectorConfigBuilder};
use shutoh_core::{CoreResult, FfmpegVideoStream, Scene, SceneManager, build_detector};
use std::sync::Arc;

/// Detector settings from, in increasing priority: built-in defaults or the
/// `--config` file, `SHUTOH_*` environment variables, command-line options.
pub fn detector_config(cli: &Cli) -> CoreResult<DetectorConfig> {
    let base = match &cli.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    }
    .with_env_overrides();

    let mut builder = DetectorConfigBuilder::from_config(base);
    if let Some(kind) = cli.detector {
        builder = builder.kind(kind.into());
    }
    if let Some(threshold) = cli.threshold {
        builder = builder.threshold(threshold);
    }
    if let Some(min_scene_len) = cli.min_scene_len {
        builder = builder.min_scene_len(min_scene_len);
    }
    if let Some(window_width) = cli.window_width {
        builder = builder.window_width(window_width);
    }
    if let Some(min_content_val) = cli.min_content_val {
        builder = builder.min_content_val(min_content_val);
    }
    if let Some(dct_size) = cli.dct_size {
        builder = builder.dct_size(dct_size);
    }
    if let Some(lowpass) = cli.lowpass {
        builder = builder.lowpass(lowpass);
    }
    if let Some(bins) = cli.bins {
        builder = builder.bins(bins);
    }
    if let Some(fade_bias) = cli.fade_bias {
        builder = builder.fade_bias(fade_bias);
    }
    Ok(builder.build())
}

/// Opens the input, applies the analysis range and detects scenes.
///
/// The opened stream is returned so that commands can read frames from it.
pub fn detect(cli: &Cli) -> CoreResult<(FfmpegVideoStream, Vec<Scene>)> {
    let config = detector_config(cli)?;
    log::debug!("Detector configuration: {:?}", config);

    let mut video = FfmpegVideoStream::open(&cli.input)?;
    video.set_time(
        cli.start.as_deref(),
        cli.end.as_deref(),
        cli.duration.as_deref(),
    )?;

    let mut manager = SceneManager::new(build_detector(&config));
    if !cli.no_progress {
        manager = manager.with_reporter(Arc::new(TerminalReporter::new()));
    }
    manager.detect_scenes(&mut video)?;
    let scenes = manager.get_scene_list()?;
    log::info!("Detected {} scenes", scenes.len());
    Ok((video, scenes))
}
