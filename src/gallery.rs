//! Still-image scanning
//!
//! Picking a photo bypasses the viewfinder: the first barcode the decoder
//! reports wins, wherever it sits in the image.

use std::path::Path;

use image::GenericImageView;

use crate::config;
use crate::decoder::BarcodeDecoder;
use crate::error::ScanError;
use crate::models::{LumaFrame, ScanResult};

/// Load an image file as a luminance frame, downscaled to `config::max_image_dim()`
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<LumaFrame, ScanError> {
    load_frame_with_max_dim(path, config::max_image_dim())
}

/// Load an image file as a luminance frame.
///
/// When the longer side exceeds `max_dim`, the image is shrunk to fit, keeping
/// its aspect ratio. `None` keeps the original size.
pub fn load_frame_with_max_dim<P: AsRef<Path>>(
    path: P,
    max_dim: Option<u32>,
) -> Result<LumaFrame, ScanError> {
    let img = image::open(path)?;
    let img = match max_dim {
        Some(max_dim) if img.width().max(img.height()) > max_dim => {
            let (orig_w, orig_h) = img.dimensions();
            let resized = img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle);
            log::debug!(
                "downscaled {}x{} to {}x{}",
                orig_w,
                orig_h,
                resized.width(),
                resized.height()
            );
            resized
        }
        _ => img,
    };
    LumaFrame::from_image(&img)
}

/// Scan a decoded frame, taking the first detection's value
pub fn scan_frame<D: BarcodeDecoder + ?Sized>(
    frame: &LumaFrame,
    decoder: &mut D,
) -> Result<ScanResult, ScanError> {
    let detections = decoder.decode(frame)?;
    detections
        .first()
        .and_then(|d| d.text())
        .map(ScanResult::new)
        .ok_or(ScanError::NoCodeFound)
}

/// Scan an image file, taking the first detection's value
pub fn scan_image_file<P: AsRef<Path>, D: BarcodeDecoder + ?Sized>(
    path: P,
    decoder: &mut D,
) -> Result<ScanResult, ScanError> {
    let path = path.as_ref();
    let frame = load_frame(path)?;
    log::info!(
        "scanning {} ({}x{})",
        path.display(),
        frame.width(),
        frame.height()
    );
    scan_frame(&frame, decoder)
}
