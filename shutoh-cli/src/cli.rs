// shutoh-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use shutoh_core::config::DetectorKind;
use shutoh_core::output::ImageFormat;
use shutoh_core::output::video_splitter::{DEFAULT_CRF, DEFAULT_FFMPEG_ARGS, DEFAULT_PRESET};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Shutoh: shot boundary detection",
    long_about = "Detects scene cuts in a video and lists them, saves still images \
                  of every scene or splits the video into one clip per scene."
)]
pub struct Cli {
    /// Input video file
    #[arg(short = 'i', long = "input", required = true, value_name = "VIDEO")]
    pub input: PathBuf,

    /// Directory where output files are written
    #[arg(short = 'o', long = "output", default_value = ".", value_name = "DIR")]
    pub output: PathBuf,

    /// Output file name template. Supports $VIDEO_NAME, $SCENE_NUMBER and $IMAGE_NUMBER
    #[arg(long, value_name = "TEMPLATE")]
    pub filename: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not draw a progress bar while detecting
    #[arg(long)]
    pub no_progress: bool,

    // --- Analysis Range ---
    /// Start of the analysis range (frames, seconds such as 12.5 or 12s, or HH:MM:SS.nnn)
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    /// End of the analysis range. Takes precedence over --duration
    #[arg(long, value_name = "TIME")]
    pub end: Option<String>,

    /// Length of the analysis range from --start
    #[arg(long, value_name = "TIME")]
    pub duration: Option<String>,

    // --- Detector ---
    /// Detection algorithm
    #[arg(short, long, value_enum)]
    pub detector: Option<DetectorArg>,

    /// Detector threshold (defaults depend on the detector)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Minimum number of frames between cuts
    #[arg(short, long, value_name = "FRAMES")]
    pub min_scene_len: Option<i32>,

    /// Adaptive: frames on each side of the center frame
    #[arg(long, value_name = "FRAMES")]
    pub window_width: Option<i32>,

    /// Adaptive: minimum content score for a cut
    #[arg(long, value_name = "SCORE")]
    pub min_content_val: Option<f32>,

    /// Hash: side length of the DCT block
    #[arg(long, value_name = "SIZE")]
    pub dct_size: Option<i32>,

    /// Hash: resize factor applied before the DCT
    #[arg(long, value_name = "FACTOR")]
    pub lowpass: Option<i32>,

    /// Histogram: number of luma bins
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<i32>,

    /// Threshold: -1.0 places fade cuts on the fade-out frame, +1.0 on the fade-in frame
    #[arg(long, value_name = "BIAS", allow_negative_numbers = true)]
    pub fade_bias: Option<f32>,

    /// JSON file with detector settings. Command-line options take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the scene list and writes it to a CSV file
    ListScenes(ListScenesArgs),
    /// Writes one video clip per scene using ffmpeg
    SplitVideo(SplitVideoArgs),
    /// Saves still images from every scene
    SaveImages(SaveImagesArgs),
}

#[derive(Args, Debug)]
pub struct ListScenesArgs {
    /// Print the scene table to stdout instead of writing a CSV file
    #[arg(long)]
    pub no_output_file: bool,
}

#[derive(Args, Debug)]
pub struct SplitVideoArgs {
    /// Copy streams instead of re-encoding (fast, cuts snap to keyframes)
    #[arg(long)]
    pub copy: bool,

    /// x264 constant rate factor
    #[arg(long, default_value_t = DEFAULT_CRF, value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: u8,

    /// x264 preset
    #[arg(long, default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// Extra ffmpeg arguments placed before the output file
    #[arg(long, default_value = DEFAULT_FFMPEG_ARGS, allow_hyphen_values = true)]
    pub args: String,
}

#[derive(Args, Debug)]
pub struct SaveImagesArgs {
    /// Images per scene
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub num_images: u64,

    /// Image format
    #[arg(short, long, value_enum, default_value_t = ImageFormatArg::Jpg)]
    pub format: ImageFormatArg,

    /// JPEG quality
    #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// PNG compression level
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression: u8,

    /// Frames kept between the first/last image and the scene boundary
    #[arg(short = 'm', long, default_value_t = 3)]
    pub frame_margin: u64,

    /// Scale factor applied to saved images
    #[arg(short, long, default_value_t = 1.0)]
    pub scale: f32,

    /// Output width in pixels. The height follows the aspect ratio unless set
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in pixels. The width follows the aspect ratio unless set
    #[arg(short = 'H', long)]
    pub height: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorArg {
    Content,
    Adaptive,
    Hash,
    Histogram,
    Threshold,
}

impl From<DetectorArg> for DetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Content => DetectorKind::Content,
            DetectorArg::Adaptive => DetectorKind::Adaptive,
            DetectorArg::Hash => DetectorKind::Hash,
            DetectorArg::Histogram => DetectorKind::Histogram,
            DetectorArg::Threshold => DetectorKind::Threshold,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormatArg {
    Jpg,
    Png,
    Webp,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Jpg => ImageFormat::Jpeg,
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Webp => ImageFormat::Webp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_scenes_defaults() {
        let cli = Cli::parse_from(["shutoh", "-i", "movie.mp4", "list-scenes"]);
        assert_eq!(cli.input, PathBuf::from("movie.mp4"));
        assert_eq!(cli.output, PathBuf::from("."));
        assert!(cli.detector.is_none());
        assert!(!cli.verbose);
        match cli.command {
            Commands::ListScenes(args) => assert!(!args.no_output_file),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_detector_options() {
        let cli = Cli::parse_from([
            "shutoh",
            "-i",
            "movie.mp4",
            "--detector",
            "threshold",
            "--threshold",
            "8",
            "--fade-bias",
            "-0.5",
            "--start",
            "00:00:10",
            "--duration",
            "30s",
            "list-scenes",
            "--no-output-file",
        ]);
        assert_eq!(cli.detector, Some(DetectorArg::Threshold));
        assert_eq!(cli.threshold, Some(8.0));
        assert_eq!(cli.fade_bias, Some(-0.5));
        assert_eq!(cli.start.as_deref(), Some("00:00:10"));
        assert_eq!(cli.duration.as_deref(), Some("30s"));
    }

    #[test]
    fn test_parse_split_video_defaults() {
        let cli = Cli::parse_from(["shutoh", "-i", "a.mkv", "split-video"]);
        match cli.command {
            Commands::SplitVideo(args) => {
                assert!(!args.copy);
                assert_eq!(args.crf, 22);
                assert_eq!(args.preset, "veryfast");
                assert_eq!(args.args, DEFAULT_FFMPEG_ARGS);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_save_images() {
        let cli = Cli::parse_from([
            "shutoh", "-i", "a.mkv", "save-images", "-n", "1", "-f", "webp", "-W", "320",
        ]);
        match cli.command {
            Commands::SaveImages(args) => {
                assert_eq!(args.num_images, 1);
                assert_eq!(args.format, ImageFormatArg::Webp);
                assert_eq!(args.width, Some(320));
                assert_eq!(args.height, None);
                assert_eq!(args.frame_margin, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_crf_out_of_range_is_rejected() {
        let result = Cli::try_parse_from(["shutoh", "-i", "a.mkv", "split-video", "--crf", "60"]);
        assert!(result.is_err());
    }
}
