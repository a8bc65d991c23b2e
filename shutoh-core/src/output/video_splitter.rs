// ============================================================================
// shutoh-core/src/output/video_splitter.rs
// ============================================================================
//
// VIDEO SPLITTER: One output clip per scene through ffmpeg
//
// Every scene becomes an independent ffmpeg invocation that seeks to the
// scene start and writes `end - start` worth of video. Invocations run in
// parallel on the rayon pool; a failing clip is logged and counted while the
// remaining clips are still produced.
//
// KEY COMPONENTS:
// - SplitOptions: encode settings and output naming
// - build_split_args: ffmpeg argument list for a single scene
// - VideoSplitter: runs the invocations and reports failures
//
// ============================================================================

use super::template::{DEFAULT_SPLIT_TEMPLATE, expand};
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::scene_manager::Scene;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_CRF: u8 = 22;
pub const DEFAULT_PRESET: &str = "veryfast";
pub const DEFAULT_FFMPEG_ARGS: &str = "-c:a aac -map 0:v:0 -map 0:a? -sn";

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Stream copy instead of re-encoding. Cuts then snap to keyframes.
    pub copy: bool,
    pub crf: u8,
    pub preset: String,
    /// Extra arguments placed before the output file, split on whitespace
    pub args: String,
    pub template: String,
    pub ffmpeg_binary: PathBuf,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            copy: false,
            crf: DEFAULT_CRF,
            preset: DEFAULT_PRESET.to_string(),
            args: DEFAULT_FFMPEG_ARGS.to_string(),
            template: DEFAULT_SPLIT_TEMPLATE.to_string(),
            ffmpeg_binary: PathBuf::from("ffmpeg"),
        }
    }
}

/// ffmpeg arguments that cut `scene` out of `input` into `output`.
pub fn build_split_args(
    input: &Path,
    output: &Path,
    scene: &Scene,
    options: &SplitOptions,
) -> CoreResult<Vec<String>> {
    let (start, end) = scene;
    let duration = end.try_sub(start)?;

    let mut args: Vec<String> = vec![
        "-nostdin".into(),
        "-y".into(),
        "-ss".into(),
        start.to_seconds_string(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-t".into(),
        duration.to_seconds_string(),
        "-v".into(),
        "quiet".into(),
    ];

    if options.copy {
        args.extend(["-c".to_string(), "copy".to_string()]);
    } else {
        args.extend([
            "-preset".to_string(),
            options.preset.clone(),
            "-crf".to_string(),
            options.crf.to_string(),
        ]);
        args.extend(options.args.split_whitespace().map(str::to_string));
    }

    args.push(output.to_string_lossy().into_owned());
    Ok(args)
}

#[derive(Debug, Clone)]
pub struct VideoSplitter {
    output_dir: PathBuf,
    options: SplitOptions,
}

impl VideoSplitter {
    pub fn new(output_dir: impl Into<PathBuf>, options: SplitOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    pub fn output_path(&self, video_name: &str, scene_number: usize) -> PathBuf {
        self.output_dir
            .join(expand(&self.options.template, video_name, Some(scene_number), None))
    }

    /// Writes one clip per scene and returns the clip paths in scene order.
    ///
    /// All clips are attempted. If any fail, `SplitFailed` reports how many.
    pub fn split_video(
        &self,
        input: &Path,
        video_name: &str,
        scenes: &[Scene],
    ) -> CoreResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)?;
        log::info!(
            "Splitting {} into {} clips ({})",
            input.display(),
            scenes.len(),
            if self.options.copy { "stream copy" } else { "re-encode" }
        );

        let results: Vec<(PathBuf, CoreResult<()>)> = scenes
            .par_iter()
            .enumerate()
            .map(|(scene_number, scene)| {
                let output = self.output_path(video_name, scene_number);
                let result = build_split_args(input, &output, scene, &self.options)
                    .and_then(|args| self.run_ffmpeg(&args));
                (output, result)
            })
            .collect();

        let mut failed = 0;
        let mut paths = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(()) => {
                    log::debug!("Wrote {}", path.display());
                    paths.push(path);
                }
                Err(e) => {
                    log::error!("Failed to write {}: {}", path.display(), e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(CoreError::SplitFailed {
                count: failed,
                total: scenes.len(),
            });
        }
        Ok(paths)
    }

    fn run_ffmpeg(&self, args: &[String]) -> CoreResult<()> {
        let program = self.options.ffmpeg_binary.to_string_lossy().into_owned();
        log::trace!("Running: {} {}", program, args.join(" "));
        let output = Command::new(&self.options.ffmpeg_binary)
            .args(args)
            .output()
            .map_err(|e| command_start_error(program.clone(), e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(command_failed_error(program, output.status, stderr));
        }
        Ok(())
    }
}
