use crate::config;
use crate::error::ScanError;
use crate::utils::grayscale::{
    rgb_to_luma, rgb_to_luma_parallel, rgba_to_luma, rgba_to_luma_parallel,
};

/// One 8-bit luminance camera frame
///
/// Frames are owned values: whoever holds the frame last releases it, exactly once,
/// when it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    /// Monotonic frame counter assigned by the producer
    pub sequence: u64,
}

impl LumaFrame {
    /// Wrap an existing luminance buffer
    ///
    /// Fails when a dimension is zero or the buffer holds fewer than
    /// `width * height` bytes.
    pub fn from_luma(data: Vec<u8>, width: u32, height: u32) -> Result<Self, ScanError> {
        check_packed(&data, width, height, 1)?;
        Ok(Self {
            data,
            width,
            height,
            sequence: 0,
        })
    }

    /// Convert a packed RGB buffer
    pub fn from_rgb(rgb: &[u8], width: u32, height: u32) -> Result<Self, ScanError> {
        check_packed(rgb, width, height, 3)?;
        let (w, h) = (width as usize, height as usize);
        let luma = if w * h >= config::parallel_min_pixels() {
            rgb_to_luma_parallel(rgb, w, h)
        } else {
            rgb_to_luma(rgb, w, h)
        };
        Self::from_luma(luma, width, height)
    }

    /// Convert a packed RGBA buffer (alpha ignored)
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Result<Self, ScanError> {
        check_packed(rgba, width, height, 4)?;
        let (w, h) = (width as usize, height as usize);
        let luma = if w * h >= config::parallel_min_pixels() {
            rgba_to_luma_parallel(rgba, w, h)
        } else {
            rgba_to_luma(rgba, w, h)
        };
        Self::from_luma(luma, width, height)
    }

    /// Convert a decoded image
    pub fn from_image(img: &image::DynamicImage) -> Result<Self, ScanError> {
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();
        Self::from_luma(luma.into_raw(), width, height)
    }

    /// Builder-style sequence setter
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance samples, row-major
    pub fn data(&self) -> &[u8] {
        &self.data[..self.width as usize * self.height as usize]
    }

    /// Sample at (x, y); callers keep coordinates in bounds
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width as usize + x]
    }

    /// Give the buffer back (used to recycle it into a pool)
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Validate a packed buffer of `channels` bytes per pixel.
///
/// Sizes that overflow `usize` are rejected like short buffers.
pub(crate) fn check_packed(
    buf: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), ScanError> {
    let needed = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels));
    match needed {
        Some(needed) if width != 0 && height != 0 && buf.len() >= needed => Ok(()),
        _ => Err(ScanError::InvalidFrame {
            width,
            height,
            len: buf.len(),
        }),
    }
}
