//! Environment-driven tunables, read once per process
//!
//! - `FLOOR_SCAN_OVERLAY_FRACTION`: viewfinder side as a fraction of the shorter surface side
//! - `FLOOR_SCAN_MAX_DIM`: longest side still images are downscaled to (`0` disables)
//! - `FLOOR_SCAN_PARALLEL_MIN_PIXELS`: frames at least this large convert to luma with rayon

use std::sync::OnceLock;

/// Default viewfinder fraction of the shorter surface side
pub const DEFAULT_OVERLAY_FRACTION: f32 = 0.7;

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static OVERLAY_FRACTION: OnceLock<f32> = OnceLock::new();

/// Fraction of `min(width, height)` the overlay rectangle occupies
pub fn overlay_fraction() -> f32 {
    *OVERLAY_FRACTION.get_or_init(|| {
        parse_env_f32("FLOOR_SCAN_OVERLAY_FRACTION", DEFAULT_OVERLAY_FRACTION).clamp(0.1, 1.0)
    })
}

static MAX_IMAGE_DIM: OnceLock<Option<u32>> = OnceLock::new();

/// Longest side gallery images are downscaled to before decoding
pub fn max_image_dim() -> Option<u32> {
    *MAX_IMAGE_DIM.get_or_init(|| match parse_env_usize("FLOOR_SCAN_MAX_DIM", 1600) {
        0 => None,
        v => Some(v.min(u32::MAX as usize) as u32),
    })
}

static PARALLEL_MIN_PIXELS: OnceLock<usize> = OnceLock::new();

/// Pixel count above which luminance conversion runs on the rayon pool
pub fn parallel_min_pixels() -> usize {
    *PARALLEL_MIN_PIXELS
        .get_or_init(|| parse_env_usize("FLOOR_SCAN_PARALLEL_MIN_PIXELS", 640 * 480).max(1))
}
