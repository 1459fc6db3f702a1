/// Luminance conversion for camera and gallery frames
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use rayon::prelude::*;

/// Coefficients for luminance conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(px: &[u8]) -> u8 {
    let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32) >> 8;
    lum.min(255) as u8
}

/// Convert a packed buffer with `channels` bytes per pixel into `out`
fn convert_into(src: &[u8], channels: usize, out: &mut [u8]) {
    for (dst, px) in out.iter_mut().zip(src.chunks_exact(channels)) {
        *dst = luma(px);
    }
}

/// Convert RGB image to luminance
pub fn rgb_to_luma(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    convert_into(rgb, 3, &mut gray);
    gray
}

/// Convert RGBA image to luminance (ignores alpha channel)
pub fn rgba_to_luma(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    convert_into(rgba, 4, &mut gray);
    gray
}

/// Convert RGBA into a caller-provided buffer (no allocation)
///
/// # Returns
/// Number of pixels written (width * height)
pub fn rgba_to_luma_into(rgba: &[u8], width: usize, height: usize, output: &mut [u8]) -> usize {
    let pixel_count = width * height;
    assert!(output.len() >= pixel_count, "Output buffer too small");
    convert_into(rgba, 4, &mut output[..pixel_count]);
    pixel_count
}

// ============== Parallel Processing with Rayon ==============

fn convert_parallel(src: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * channels;
        let src_row = &src[row_start..row_start + width * channels];
        convert_into(src_row, channels, row);
    });

    gray
}

/// Convert RGB to luminance, one row per rayon task
pub fn rgb_to_luma_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_parallel(rgb, 3, width, height)
}

/// Convert RGBA to luminance, one row per rayon task
pub fn rgba_to_luma_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_parallel(rgba, 4, width, height)
}
