//! Barcode decoder seam
//!
//! The scanner treats the decoder as an external collaborator: it hands over a
//! luminance frame and receives every barcode found, each with an optional value
//! and an optional bounding box in frame pixels.

use crate::error::ScanError;
use crate::models::{Detection, LumaFrame, PixelRect};

/// Anything that can find barcodes in a luminance frame
pub trait BarcodeDecoder: Send {
    /// Detect and decode all barcodes in `frame`, in decoder order
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError>;
}

impl<D: BarcodeDecoder + ?Sized> BarcodeDecoder for Box<D> {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        (**self).decode(frame)
    }
}

/// QR decoder backed by `rqrr`
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDecoder for RqrrDecoder {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        if w == 0 || h == 0 || frame.data().len() < w * h {
            return Err(ScanError::InvalidFrame {
                width: frame.width(),
                height: frame.height(),
                len: frame.data().len(),
            });
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| frame.get(x, y));
        let grids = prepared.detect_grids();
        log::debug!("frame {}: {} grid(s) located", frame.sequence, grids.len());

        let detections = grids
            .iter()
            .map(|grid| {
                let corners: Vec<(i32, i32)> = grid.bounds.iter().map(|p| (p.x, p.y)).collect();
                let raw_value = match grid.decode() {
                    Ok((_, content)) => Some(content),
                    Err(err) => {
                        log::debug!("frame {}: grid failed to decode: {:?}", frame.sequence, err);
                        None
                    }
                };
                Detection {
                    raw_value,
                    bounding_box: PixelRect::from_corners(&corners),
                }
            })
            .collect();

        Ok(detections)
    }
}
