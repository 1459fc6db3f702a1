//! floor_scan - viewfinder-constrained QR scanning
//!
//! Live camera frames are decoded on a dedicated analysis thread and a barcode is
//! only accepted when its bounding box, mapped into screen space, touches the
//! fixed viewfinder drawn over the preview. Still images skip the viewfinder and
//! take the first code found.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Per-frame scan loop (first accepted detection, then halt)
pub mod analyzer;
/// Environment-driven tunables
pub mod config;
/// Barcode decoder seam and the rqrr-backed implementation
pub mod decoder;
/// Error type
pub mod error;
/// Still-image scanning
pub mod gallery;
/// Core data structures (Rect, PixelRect, Detection, LumaFrame, ScanResult)
pub mod models;
/// Live analysis thread with keep-only-latest backpressure
pub mod pipeline;
/// Utility functions (luminance conversion, frame pools)
pub mod utils;
/// Viewfinder geometry and containment filter
pub mod viewfinder;

pub use analyzer::QrAnalyzer;
pub use decoder::{BarcodeDecoder, RqrrDecoder};
pub use error::ScanError;
pub use models::{Detection, LumaFrame, PixelRect, Rect, ScanResult};
pub use pipeline::ScanPipeline;
pub use viewfinder::{Overlay, SharedOverlay, ViewfinderGeometry, accept};

use std::path::Path;

/// Scanner facade: a decoder plus the viewfinder it answers to
///
/// # Example
/// ```
/// use floor_scan::Scanner;
///
/// let scanner = Scanner::new();
/// scanner.resize_view(1080, 1920);
/// assert!(scanner.overlay().rect().is_some());
/// ```
pub struct Scanner<D = RqrrDecoder> {
    decoder: D,
    overlay: SharedOverlay,
}

impl Scanner<RqrrDecoder> {
    /// Scanner using the rqrr decoder and the configured viewfinder fraction
    pub fn new() -> Self {
        Self::with_decoder(RqrrDecoder::new())
    }
}

impl Default for Scanner<RqrrDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: BarcodeDecoder> Scanner<D> {
    /// Scanner using a custom decoder
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            overlay: SharedOverlay::new(Overlay::new()),
        }
    }

    /// Replace the viewfinder (for example to use a different fraction)
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = SharedOverlay::new(overlay);
        self
    }

    /// Recompute the viewfinder for a new preview surface size
    pub fn resize_view(&self, width: u32, height: u32) {
        self.overlay.resize(width, height);
    }

    /// Viewfinder shared with any live analyzer built from this scanner
    pub fn overlay(&self) -> &SharedOverlay {
        &self.overlay
    }

    /// Scan a single live frame on the calling thread
    pub fn scan_live_frame(&mut self, frame: &LumaFrame) -> Option<ScanResult> {
        let geometry = self.overlay.geometry();
        match self.decoder.decode(frame) {
            Ok(detections) => analyzer::first_accepted(detections, &geometry, frame),
            Err(err) => {
                log::error!("barcode scanning failed: {}", err);
                None
            }
        }
    }

    /// Scan a still image; the viewfinder does not apply
    pub fn scan_image_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ScanResult, ScanError> {
        gallery::scan_image_file(path, &mut self.decoder)
    }

    /// Turn into a single-threaded analyzer
    pub fn into_analyzer(self) -> QrAnalyzer<D> {
        QrAnalyzer::new(self.decoder, self.overlay)
    }
}

impl<D: BarcodeDecoder + 'static> Scanner<D> {
    /// Start a live pipeline on its own analysis thread
    pub fn start_live(self) -> Result<ScanPipeline, ScanError> {
        ScanPipeline::spawn(self.into_analyzer())
    }
}
