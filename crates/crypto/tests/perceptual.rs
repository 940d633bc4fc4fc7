//! Perceptual hash behaviour on synthetic images.

use cairn_crypto::perceptual::normalize;
use cairn_crypto::{ContentHasher, HashError, MAX_ASPECT_RATIO, REFERENCE_WIDTH};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::f64::consts::PI;
use std::io::Cursor;

/// Bit budgets per resolution (coarse, medium, fine).
const BITS: [u32; 3] = [64, 256, 1024];
/// A re-encoded or slightly resized copy stays within 10% of the bits.
const SIMILAR_MAX_PERCENT: u32 = 10;
/// Unrelated images differ in at least 25% of the bits.
const UNRELATED_MIN_PERCENT: u32 = 25;

fn encode(image: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

fn gray(value: f64) -> Rgb<u8> {
    let v = value.round().clamp(0.0, 255.0) as u8;
    Rgb([v, v, v])
}

/// Smooth sinusoidal landscape.
fn waves(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = f64::from(x) * 2.0 * PI / (f64::from(width) / 3.0);
        let fy = f64::from(y) * 2.0 * PI / (f64::from(height) / 2.0);
        gray(128.0 + 100.0 * fx.sin() * fy.cos())
    })
}

/// Tilted checkerboard with a horizontal ramp.
fn checkers(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let cell = ((x / (width / 5)) + (y / (height / 4))) % 2;
        gray(f64::from(cell) * 255.0 * 0.6 + 80.0 * f64::from(x) / f64::from(width))
    })
}

/// Radial falloff from an off-centre point.
fn radial(width: u32, height: u32) -> RgbImage {
    let diag = f64::from(width).hypot(f64::from(height));
    RgbImage::from_fn(width, height, |x, y| {
        let dx = f64::from(x) - f64::from(width) * 0.3;
        let dy = f64::from(y) - f64::from(height) * 0.6;
        gray(255.0 * dx.hypot(dy) / diag)
    })
}

fn percent(distance: [u32; 3]) -> [u32; 3] {
    [
        distance[0] * 100 / BITS[0],
        distance[1] * 100 / BITS[1],
        distance[2] * 100 / BITS[2],
    ]
}

#[test]
fn resized_reencoded_copy_stays_close() {
    let hasher = ContentHasher::default();
    let source = waves(320, 240);
    let original = encode(DynamicImage::ImageRgb8(source.clone()), ImageOutputFormat::Png);

    let mut copy = imageops::resize(&source, 288, 216, FilterType::Triangle);
    for pixel in copy.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (f64::from(*channel) * 0.9 + 10.0).round() as u8;
        }
    }
    let copy = encode(DynamicImage::ImageRgb8(copy), ImageOutputFormat::Jpeg(85));

    let a = hasher.perceptual_hashes(&original).unwrap();
    let b = hasher.perceptual_hashes(&copy).unwrap();
    for p in percent(a.distance(&b).unwrap()) {
        assert!(p <= SIMILAR_MAX_PERCENT, "similar images drifted {p}%");
    }
}

#[test]
fn unrelated_images_are_far_apart() {
    let hasher = ContentHasher::default();
    let images = [waves(320, 240), checkers(320, 240), radial(320, 240)];
    let hashes: Vec<_> = images
        .into_iter()
        .map(|img| {
            let bytes = encode(DynamicImage::ImageRgb8(img), ImageOutputFormat::Png);
            hasher.perceptual_hashes(&bytes).unwrap()
        })
        .collect();

    for i in 0..hashes.len() {
        for j in (i + 1)..hashes.len() {
            for p in percent(hashes[i].distance(&hashes[j]).unwrap()) {
                assert!(p >= UNRELATED_MIN_PERCENT, "images {i} and {j} only {p}% apart");
            }
        }
    }
}

#[test]
fn hashes_are_deterministic_with_expected_widths() {
    let hasher = ContentHasher::default();
    let bytes = encode(DynamicImage::ImageRgb8(radial(200, 150)), ImageOutputFormat::Png);
    let first = hasher.perceptual_hashes(&bytes).unwrap();
    let second = hasher.perceptual_hashes(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.coarse.len() * 4, BITS[0] as usize);
    assert_eq!(first.medium.len() * 4, BITS[1] as usize);
    assert_eq!(first.fine.len() * 4, BITS[2] as usize);
}

#[test]
fn transparent_and_tiny_images_still_hash() {
    let hasher = ContentHasher::default();
    let clear = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 0]));
    let bytes = encode(DynamicImage::ImageRgba8(clear), ImageOutputFormat::Png);
    assert!(hasher.perceptual_hashes(&bytes).is_ok());
}

#[test]
fn non_image_is_unsupported_not_corrupt() {
    let hasher = ContentHasher::default();
    let err = hasher.perceptual_hashes(b"{\"kind\":\"json\"}").unwrap_err();
    assert!(matches!(err, HashError::UnsupportedContentType { .. }));
}

#[test]
fn text_starting_with_bitmap_magic_falls_back_to_hash_only() {
    let hasher = ContentHasher::default();
    assert_eq!(hasher.perceptual_hashes_if_image(b"BMW service notes").unwrap(), None);
    assert_eq!(
        hasher
            .perceptual_hashes_if_image(b"BMW service notes: oil change at 30k")
            .unwrap(),
        None
    );
}

#[test]
fn extreme_aspect_ratio_is_capped_before_resizing() {
    let bytes = encode(DynamicImage::ImageRgb8(waves(1, 4000)), ImageOutputFormat::Png);
    let normalized = normalize(&bytes, REFERENCE_WIDTH).unwrap();
    assert_eq!(
        normalized.dimensions(),
        (REFERENCE_WIDTH, REFERENCE_WIDTH * MAX_ASPECT_RATIO)
    );

    let hashes = ContentHasher::default().perceptual_hashes(&bytes).unwrap();
    assert_eq!(hashes.fine.len() * 4, BITS[2] as usize);
}

#[test]
fn truncated_image_is_a_decode_failure() {
    let hasher = ContentHasher::default();
    let bytes = encode(DynamicImage::ImageRgb8(waves(64, 64)), ImageOutputFormat::Png);
    let err = hasher.perceptual_hashes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, HashError::Decode(_)), "got {err:?}");
}
