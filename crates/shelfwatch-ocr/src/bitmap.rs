//! Bitmap preparation ahead of text recognition.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{GrayImage, ImageFormat};

use crate::error::OcrError;

/// Deterministic bytes-to-bytes image transform.
pub trait BitmapNormalizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`OcrError::Image`] if `bytes` is not a decodable image.
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, OcrError>;
}

/// Grayscale, contrast stretch, then resize to a fixed width. Output is PNG.
#[derive(Debug, Clone, Copy)]
pub struct GrayscaleNormalizer {
    pub target_width: u32,
}

impl Default for GrayscaleNormalizer {
    fn default() -> Self {
        Self { target_width: 1000 }
    }
}

impl BitmapNormalizer for GrayscaleNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
        let mut gray = image::load_from_memory(bytes)?.to_luma8();
        stretch_contrast(&mut gray);

        let (width, height) = gray.dimensions();
        let target_height = scaled_height(width, height, self.target_width);
        let resized = image::imageops::resize(
            &gray,
            self.target_width,
            target_height,
            FilterType::Lanczos3,
        );

        let mut out = Cursor::new(Vec::new());
        resized.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

/// Height that keeps the aspect ratio at `target_width`, never below 1.
fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2)
        / u64::from(width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Maps the 1st..99th luminance percentiles onto the full 0..255 range.
fn stretch_contrast(img: &mut GrayImage) {
    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[usize::from(pixel.0[0])] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return;
    }

    let clip = total / 100;
    let low = percentile(&histogram, clip);
    let high = percentile(&histogram, total - clip - 1);
    if high <= low {
        return;
    }

    let span = u32::from(high - low);
    for pixel in img.pixels_mut() {
        let v = pixel.0[0].clamp(low, high);
        let stretched = u32::from(v - low) * 255 / span;
        pixel.0[0] = u8::try_from(stretched).unwrap_or(u8::MAX);
    }
}

/// Smallest luminance whose cumulative count exceeds `rank`.
fn percentile(histogram: &[u64; 256], rank: u64) -> u8 {
    let mut seen = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        seen += count;
        if seen > rank {
            return u8::try_from(value).unwrap_or(u8::MAX);
        }
    }
    u8::MAX
}
