// ============================================================================
// shutoh-core/src/output/image_extractor.rs
// ============================================================================
//
// IMAGE EXTRACTOR: Representative still images for each scene
//
// Each scene is divided into `num_images` equal chunks and one frame is
// picked per chunk. The first and last picks are pulled `frame_margin`
// frames inward so that they avoid the transition itself.
//
// KEY COMPONENTS:
// - ImageExtractor: seeks the video, resizes and encodes the picked frames
// - frame_indices: frame selection for one scene
// - target_size: output dimensions from scale or explicit width/height
//
// ============================================================================

use super::template::{DEFAULT_IMAGE_TEMPLATE, expand};
use crate::error::{CoreError, CoreResult};
use crate::scene_manager::Scene;
use crate::video::VideoSource;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown image format '{}' (expected jpg, png or webp)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageExtractorOptions {
    pub num_images: usize,
    pub format: ImageFormat,
    /// JPEG quality, 1-100
    pub quality: u8,
    /// PNG compression level, 0-9
    pub compression: u8,
    pub frame_margin: u64,
    pub scale: f32,
    /// Output width in pixels, 0 to derive it
    pub width: u32,
    /// Output height in pixels, 0 to derive it
    pub height: u32,
    pub template: String,
}

impl Default for ImageExtractorOptions {
    fn default() -> Self {
        Self {
            num_images: 3,
            format: ImageFormat::Jpeg,
            quality: 95,
            compression: 3,
            frame_margin: 3,
            scale: 1.0,
            width: 0,
            height: 0,
            template: DEFAULT_IMAGE_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageExtractor {
    output_dir: PathBuf,
    options: ImageExtractorOptions,
}

impl ImageExtractor {
    pub fn new(output_dir: impl Into<PathBuf>, options: ImageExtractorOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    /// Saves the picked frames of every scene and returns the written paths.
    pub fn save_images(
        &self,
        video: &mut dyn VideoSource,
        video_name: &str,
        scenes: &[Scene],
    ) -> CoreResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)?;
        let opts = &self.options;
        let mut written = Vec::new();

        for (scene_number, (start, end)) in scenes.iter().enumerate() {
            let indices = frame_indices(
                start.frame_num(),
                end.frame_num(),
                opts.num_images,
                opts.frame_margin,
            );
            log::debug!("Scene {}: saving frames {:?}", scene_number, indices);

            for (image_number, frame_num) in indices.into_iter().enumerate() {
                let image = read_frame(video, frame_num)?;
                let (width, height) =
                    target_size(image.width(), image.height(), opts.scale, opts.width, opts.height);
                let image = if (width, height) == image.dimensions() {
                    image
                } else {
                    imageops::resize(&image, width, height, FilterType::Triangle)
                };

                let file_name = format!(
                    "{}.{}",
                    expand(&opts.template, video_name, Some(scene_number), Some(image_number)),
                    opts.format.extension()
                );
                let path = self.output_dir.join(file_name);
                self.encode(&image, &path)?;
                written.push(path);
            }
        }

        log::info!(
            "Saved {} images to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    fn encode(&self, image: &RgbImage, path: &Path) -> CoreResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        match self.options.format {
            ImageFormat::Jpeg => {
                let quality = self.options.quality.clamp(1, 100);
                image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
            }
            ImageFormat::Png => {
                let compression = png_compression(self.options.compression);
                image.write_with_encoder(PngEncoder::new_with_quality(
                    &mut writer,
                    compression,
                    PngFilter::Adaptive,
                ))?;
            }
            ImageFormat::Webp => {
                image.write_with_encoder(WebPEncoder::new_lossless(&mut writer))?;
            }
        }
        log::trace!("Wrote {}", path.display());
        Ok(())
    }
}

fn read_frame(video: &mut dyn VideoSource, frame_num: u64) -> CoreResult<RgbImage> {
    video.seek(frame_num as i64)?;
    video
        .read_next_frame()
        .ok_or(CoreError::FailedToSetFramePosition(frame_num))
}

fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Frames to save for the scene `[start, end)`.
///
/// A scene of at most one frame yields `[start]`. Chunks that end up empty
/// because the scene is shorter than `num_images` are skipped.
pub fn frame_indices(start: u64, end: u64, num_images: usize, frame_margin: u64) -> Vec<u64> {
    let num_images = num_images.max(1);
    let len = end.saturating_sub(start).max(1);
    let base = len / num_images as u64;
    let remainder = len % num_images as u64;

    let mut indices = Vec::with_capacity(num_images);
    let mut chunk_start = start;
    for j in 0..num_images {
        let size = base + u64::from((j as u64) < remainder);
        if size == 0 {
            continue;
        }
        let first = chunk_start;
        let last = chunk_start + size - 1;
        chunk_start += size;

        let frame = if num_images == 1 || (j > 0 && j < num_images - 1) {
            first + size / 2
        } else if j == 0 {
            (first + frame_margin).min(last)
        } else {
            last.saturating_sub(frame_margin).max(first)
        };
        indices.push(frame);
    }
    indices
}

/// Output dimensions for a `width` x `height` frame.
///
/// Explicit dimensions win over `scale`; when only one of them is set the
/// other follows the aspect ratio.
pub fn target_size(width: u32, height: u32, scale: f32, out_width: u32, out_height: u32) -> (u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let size = match (out_width, out_height) {
        (0, 0) => {
            let scale = if scale > 0.0 && scale.is_finite() {
                f64::from(scale)
            } else {
                1.0
            };
            ((w * scale).round(), (h * scale).round())
        }
        (ow, 0) => (f64::from(ow), (h * f64::from(ow) / w).round()),
        (0, oh) => ((w * f64::from(oh) / h).round(), f64::from(oh)),
        (ow, oh) => (f64::from(ow), f64::from(oh)),
    };
    ((size.0 as u32).max(1), (size.1 as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::FrameTimecode;
    use crate::video::MemoryVideoSource;
    use image::Rgb;

    #[test]
    fn test_frame_indices_three_chunks() {
        assert_eq!(frame_indices(0, 30, 3, 3), vec![3, 15, 26]);
        assert_eq!(frame_indices(100, 130, 3, 0), vec![100, 115, 129]);
    }

    #[test]
    fn test_frame_indices_single_image_is_midpoint() {
        assert_eq!(frame_indices(0, 30, 1, 3), vec![15]);
    }

    #[test]
    fn test_frame_indices_short_scenes() {
        assert_eq!(frame_indices(5, 5, 3, 3), vec![5]);
        assert_eq!(frame_indices(5, 6, 3, 3), vec![5]);
        // Two frames, three chunks: the third chunk is empty.
        assert_eq!(frame_indices(0, 2, 3, 3), vec![0, 1]);
        // Margin never leaves the chunk.
        assert_eq!(frame_indices(0, 6, 3, 10), vec![1, 3, 4]);
    }

    #[test]
    fn test_target_size() {
        assert_eq!(target_size(1920, 1080, 1.0, 0, 0), (1920, 1080));
        assert_eq!(target_size(1920, 1080, 0.5, 0, 0), (960, 540));
        assert_eq!(target_size(1920, 1080, 1.0, 640, 0), (640, 360));
        assert_eq!(target_size(1920, 1080, 1.0, 0, 540), (960, 540));
        assert_eq!(target_size(1920, 1080, 0.5, 100, 100), (100, 100));
        assert_eq!(target_size(10, 10, 0.01, 0, 0), (1, 1));
    }

    #[test]
    fn test_image_format_parsing() {
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("webp".parse::<ImageFormat>().unwrap().extension(), "webp");
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_save_images_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let frames = (0..20u8)
            .map(|i| RgbImage::from_pixel(8, 6, Rgb([i * 10, 0, 0])))
            .collect();
        let mut video = MemoryVideoSource::new(frames, 10.0).unwrap();
        let tc = |n| FrameTimecode::from_frames(n, 10.0).unwrap();
        let scenes = vec![(tc(0), tc(10)), (tc(10), tc(19))];

        for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Webp] {
            let options = ImageExtractorOptions {
                num_images: 2,
                format,
                scale: 0.5,
                ..ImageExtractorOptions::default()
            };
            let extractor = ImageExtractor::new(dir.path(), options);
            let written = extractor.save_images(&mut video, "clip", &scenes).unwrap();
            assert_eq!(written.len(), 4);
            let expected = dir
                .path()
                .join(format!("clip-scene-001-01.{}", format.extension()));
            assert!(written.contains(&expected));

            let decoded = image::open(&expected).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (4, 3));
        }
    }
}
