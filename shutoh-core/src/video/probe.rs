//! Video stream properties gathered through ffprobe.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::timecode::MIN_FPS_DELTA;
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Properties of the first video stream of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub framerate: f64,
    pub total_frames: u64,
    pub codec_name: String,
}

/// Probes `path` and returns the properties needed to decode it frame by frame.
pub fn probe_video(path: &Path) -> CoreResult<VideoInfo> {
    if !path.exists() {
        return Err(CoreError::NoSuchFile(path.to_path_buf()));
    }

    log::debug!("Running ffprobe for video info on: {}", path.display());
    let metadata = ffprobe(path).map_err(|err| {
        log::error!("ffprobe failed on {}: {:?}", path.display(), err);
        match err {
            // ffprobe exits non-zero when the file is not a readable container.
            FfProbeError::Status(output) => CoreError::FailedToOpenFile {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            other => map_ffprobe_error(other, "video info"),
        }
    })?;

    let stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CoreError::NotSupportedCodec(path.to_path_buf()))?;

    let codec_name = stream
        .codec_name
        .clone()
        .ok_or_else(|| CoreError::NotSupportedCodec(path.to_path_buf()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w as u32, h as u32),
        (w, h) => {
            return Err(CoreError::FailedToOpenFile {
                path: path.to_path_buf(),
                message: format!("invalid frame size {:?}x{:?}", w, h),
            });
        }
    };

    let framerate = parse_frame_rate(&stream.avg_frame_rate)
        .filter(|fps| *fps >= MIN_FPS_DELTA)
        .or_else(|| parse_frame_rate(&stream.r_frame_rate))
        .unwrap_or(0.0);
    if framerate < MIN_FPS_DELTA {
        return Err(CoreError::TooSmallFpsValue(framerate));
    }

    let duration = stream
        .duration
        .as_deref()
        .or(metadata.format.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok());

    let total_frames = stream
        .nb_frames
        .as_deref()
        .and_then(|f| f.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .or_else(|| {
            duration
                .filter(|d| *d > 0.0)
                .map(|d| (d * framerate).round() as u64)
        })
        .filter(|&n| n > 0)
        .ok_or_else(|| CoreError::FailedToOpenFile {
            path: path.to_path_buf(),
            message: "unable to determine the number of frames".to_string(),
        })?;

    log::debug!(
        "Probed {}: {}x{} {} @ {:.3} fps, {} frames",
        path.display(),
        width,
        height,
        codec_name,
        framerate,
        total_frames
    );

    Ok(VideoInfo {
        width,
        height,
        framerate,
        total_frames,
        codec_name,
    })
}

/// Parses an ffprobe rate such as `"30000/1001"` or `"25"`.
///
/// Returns `None` for malformed values and for a zero denominator.
pub fn parse_frame_rate(text: &str) -> Option<f64> {
    let text = text.trim();
    let rate = match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.parse().ok()?,
    };
    rate.is_finite().then_some(rate)
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::InvalidConfig(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::InvalidConfig(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate("29.97"), Some(29.97));
        assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn test_probe_missing_file() {
        let err = probe_video(Path::new("/definitely/not/here.mp4")).unwrap_err();
        assert!(matches!(err, CoreError::NoSuchFile(_)));
    }
}
