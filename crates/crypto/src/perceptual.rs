//! Blockhash-style perceptual descriptors.
//!
//! Pipeline: detect format by magic bytes and a parseable header, decode,
//! flatten alpha over white into luma, resize to a fixed reference width
//! (aspect preserved up to [`MAX_ASPECT_RATIO`], Lanczos3), stretch
//! intensities to the full range, then threshold block means against their
//! band median at three grid sizes.

use cairn_types::PerceptualHashes;
use image::imageops::{self, FilterType};
use image::io::Reader;
use image::{GrayImage, ImageBuffer, ImageError, ImageFormat, Luma};
use std::io::Cursor;
use tracing::debug;

use crate::error::{HashError, Result};

/// Width every image is resized to before hashing.
pub const REFERENCE_WIDTH: u32 = 256;

/// Floor for the resized height so every grid cell covers at least one row.
pub const MIN_REFERENCE_HEIGHT: u32 = 32;

/// Resized height never exceeds this multiple of the reference width.
pub const MAX_ASPECT_RATIO: u32 = 4;

/// Blocks per side for the coarse, medium and fine descriptors.
pub const GRID_SIZES: [u32; 3] = [8, 16, 32];

const BANDS: usize = 4;

/// Detected raster format, or `UnsupportedContentType`.
///
/// Magic bytes alone are not enough (`BM` opens plenty of text), so the
/// header must also parse to non-zero dimensions.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    let format = image::guess_format(bytes)
        .map_err(|_| HashError::UnsupportedContentType { detected: None })?;
    match Reader::with_format(Cursor::new(bytes), format).into_dimensions() {
        Ok((width, height)) if width > 0 && height > 0 => Ok(format),
        _ => {
            debug!(?format, "magic bytes matched but header did not parse");
            Err(HashError::UnsupportedContentType {
                detected: Some(format_name(format)),
            })
        }
    }
}

fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_lowercase()
}

pub fn perceptual_hashes(bytes: &[u8], reference_width: u32) -> Result<PerceptualHashes> {
    let normalized = normalize(bytes, reference_width)?;
    let [coarse, medium, fine] = GRID_SIZES.map(|grid| blockhash(&normalized, grid));
    Ok(PerceptualHashes {
        coarse,
        medium,
        fine,
    })
}

/// Decode and normalize into a fixed-width, contrast-stretched luma raster.
pub fn normalize(bytes: &[u8], reference_width: u32) -> Result<GrayImage> {
    let format = detect_format(bytes)?;
    let decoded = Reader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|err| match err {
            ImageError::Unsupported(_) => HashError::UnsupportedContentType {
                detected: Some(format_name(format)),
            },
            other => HashError::Decode(other.to_string()),
        })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(HashError::Decode("image has no pixels".to_string()));
    }

    let luma: GrayImage = ImageBuffer::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let y_lin = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        let alpha = f64::from(a) / 255.0;
        let over_white = y_lin * alpha + 255.0 * (1.0 - alpha);
        Luma([over_white.round().clamp(0.0, 255.0) as u8])
    });

    let target_height = (u64::from(height) * u64::from(reference_width) + u64::from(width) / 2)
        / u64::from(width);
    let max_height = u64::from(reference_width) * u64::from(MAX_ASPECT_RATIO);
    let target_height = target_height
        .min(max_height)
        .max(u64::from(MIN_REFERENCE_HEIGHT)) as u32;
    let mut resized = imageops::resize(&luma, reference_width, target_height, FilterType::Lanczos3);

    stretch_contrast(&mut resized);
    debug!(
        ?format,
        width, height, target_height, "normalized image for perceptual hashing"
    );
    Ok(resized)
}

/// Linearly map the darkest pixel to 0 and the brightest to 255.
fn stretch_contrast(image: &mut GrayImage) {
    let (min, max) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if max <= min {
        return;
    }
    let span = u32::from(max - min);
    for pixel in image.pixels_mut() {
        let v = u32::from(pixel.0[0] - min);
        pixel.0[0] = ((v * 255 + span / 2) / span) as u8;
    }
}

/// Hex bit vector of `grid * grid` bits, row-major, MSB first.
fn blockhash(image: &GrayImage, grid: u32) -> String {
    let (width, height) = image.dimensions();
    let mut means = Vec::with_capacity((grid * grid) as usize);

    for by in 0..grid {
        let (y0, y1) = (by * height / grid, (by + 1) * height / grid);
        for bx in 0..grid {
            let (x0, x1) = (bx * width / grid, (bx + 1) * width / grid);
            let mut sum = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += u64::from(image.get_pixel(x, y).0[0]);
                }
            }
            let count = u64::from((x1 - x0) * (y1 - y0)).max(1);
            means.push(sum as f64 / count as f64);
        }
    }

    let band_len = means.len() / BANDS;
    let mut bits = Vec::with_capacity(means.len());
    for band in means.chunks(band_len) {
        let m = median(band);
        for &v in band {
            bits.push(v > m || ((v - m).abs() < 1.0 && m > 127.5));
        }
    }

    let bytes: Vec<u8> = bits
        .chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect();
    hex::encode(bytes)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
