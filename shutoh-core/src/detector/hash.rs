//! Hash detector: perceptual hashes compared by Hamming distance.
//!
//! Each frame is reduced to a `size * size` bit fingerprint of its lowest
//! spatial frequencies:
//!
//! 1. convert to luma and resize to a `size * lowpass` square
//! 2. stretch so the brightest pixel is 255
//! 3. take the orthonormal 2-D DCT-II and keep the top-left `size * size` block
//! 4. set each bit where the coefficient is above the block's median
//!
//! A cut is reported when the fraction of differing bits between consecutive
//! frames reaches the threshold.

use super::SceneDetector;
use crate::frame::VideoFrame;
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct HashDetector {
    threshold: f32,
    min_scene_len: u64,
    size: u32,
    lowpass: u32,
    last_hash: Option<Vec<bool>>,
    last_cut: Option<u64>,
}

impl HashDetector {
    pub fn new(threshold: f32, min_scene_len: u64, size: u32, lowpass: u32) -> Self {
        Self {
            threshold,
            min_scene_len,
            size: size.max(1),
            lowpass: lowpass.max(1),
            last_hash: None,
            last_cut: None,
        }
    }

    pub fn hash_frame(&self, image: &RgbImage) -> Vec<bool> {
        let side = self.size * self.lowpass;
        let gray = imageops::grayscale(image);
        let resized = imageops::resize(&gray, side, side, FilterType::Triangle);

        let mut pixels: Vec<f64> = resized.as_raw().iter().map(|&p| f64::from(p)).collect();
        let max = pixels.iter().copied().fold(0.0, f64::max);
        let max = if max == 0.0 { 1.0 } else { max };
        for p in &mut pixels {
            *p = *p / max * 255.0;
        }

        let coefficients = dct_low_frequencies(&pixels, side as usize, self.size as usize);
        let threshold = median(&coefficients);
        coefficients.iter().map(|&c| c > threshold).collect()
    }
}

/// Median of `values`. An even count averages the two middle values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Orthonormal 2-D DCT-II of an `n * n` block, returning only the
/// `keep * keep` lowest-frequency coefficients in row-major order.
fn dct_low_frequencies(block: &[f64], n: usize, keep: usize) -> Vec<f64> {
    let keep = keep.min(n);
    let scale_dc = (1.0 / n as f64).sqrt();
    let scale_ac = (2.0 / n as f64).sqrt();

    // basis[k * n + x] = alpha(k) * cos(pi * (2x + 1) * k / 2n)
    let mut basis = vec![0.0; keep * n];
    for k in 0..keep {
        let alpha = if k == 0 { scale_dc } else { scale_ac };
        for x in 0..n {
            basis[k * n + x] =
                alpha * (PI * (2 * x + 1) as f64 * k as f64 / (2 * n) as f64).cos();
        }
    }

    // Transform rows: rows[y * keep + u]
    let mut rows = vec![0.0; n * keep];
    for y in 0..n {
        for u in 0..keep {
            rows[y * keep + u] = (0..n).map(|x| block[y * n + x] * basis[u * n + x]).sum();
        }
    }

    // Transform columns: out[v * keep + u]
    let mut out = vec![0.0; keep * keep];
    for v in 0..keep {
        for u in 0..keep {
            out[v * keep + u] = (0..n).map(|y| rows[y * keep + u] * basis[v * n + y]).sum();
        }
    }
    out
}

fn hamming_distance(a: &[bool], b: &[bool]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

impl SceneDetector for HashDetector {
    fn process_frame(&mut self, frame: &VideoFrame) -> Option<u64> {
        let frame_num = frame.frame_num();
        let last_cut = *self.last_cut.get_or_insert(frame_num);
        let hash = self.hash_frame(&frame.buffer);

        let mut cut = None;
        if let Some(last_hash) = &self.last_hash {
            let bits = (self.size * self.size) as f32;
            let distance = hamming_distance(last_hash, &hash) as f32 / bits;
            if distance >= self.threshold && frame_num.saturating_sub(last_cut) >= self.min_scene_len
            {
                cut = Some(frame_num);
                self.last_cut = cut;
            }
        }

        self.last_hash = Some(hash);
        cut
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::FPS;
    use super::*;
    use crate::timecode::FrameTimecode;
    use image::Rgb;

    fn noise_image(inverted: bool) -> RgbImage {
        let mut state: u32 = 12345;
        RgbImage::from_fn(64, 64, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let v = ((state >> 16) & 0xff) as u8;
            let v = if inverted { 255 - v } else { v };
            Rgb([v, v, v])
        })
    }

    fn frame(frame_num: u64, buffer: RgbImage) -> VideoFrame {
        VideoFrame::new(buffer, FrameTimecode::from_frames(frame_num, FPS).unwrap(), false)
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[7.0]), 7.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_dct_of_constant_block_is_dc_only() {
        let block = vec![10.0; 16];
        let out = dct_low_frequencies(&block, 4, 2);
        assert_eq!(out.len(), 4);
        // DC of an orthonormal DCT is n * mean for a 2-D n x n block.
        assert!((out[0] - 40.0).abs() < 1e-9);
        for &c in &out[1..] {
            assert!(c.abs() < 1e-9);
        }
    }

    #[test]
    fn test_hash_has_size_squared_bits() {
        let detector = HashDetector::new(0.395, 15, 8, 2);
        assert_eq!(detector.hash_frame(&noise_image(false)).len(), 64);
    }

    #[test]
    fn test_identical_frames_have_no_cut() {
        let mut detector = HashDetector::new(0.395, 0, 16, 2);
        for i in 0..5 {
            assert_eq!(detector.process_frame(&frame(i, noise_image(false))), None);
        }
    }

    #[test]
    fn test_inverted_frame_is_a_cut() {
        let mut detector = HashDetector::new(0.395, 0, 16, 2);
        assert_eq!(detector.process_frame(&frame(0, noise_image(false))), None);
        assert_eq!(detector.process_frame(&frame(1, noise_image(true))), Some(1));
    }

    #[test]
    fn test_cuts_respect_min_scene_len() {
        let mut detector = HashDetector::new(0.395, 10, 16, 2);
        let cuts: Vec<u64> = (0..40)
            .filter_map(|i| detector.process_frame(&frame(i, noise_image(i % 2 == 1))))
            .collect();
        assert_eq!(cuts, vec![10, 20, 30]);
    }
}
