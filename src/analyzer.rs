//! Per-frame scan loop for live camera frames
//!
//! Each frame is decoded, then its detections are checked against the
//! viewfinder in decoder order. The first detection that has a value and lies
//! in the viewfinder is forwarded, and the analyzer halts until reset.

use crate::decoder::BarcodeDecoder;
use crate::models::{Detection, LumaFrame, ScanResult};
use crate::viewfinder::{SharedOverlay, ViewfinderGeometry};

/// First detection, in decoder order, that has a value and passes the viewfinder.
///
/// Any present value counts, including an empty one.
pub(crate) fn first_accepted(
    detections: Vec<Detection>,
    geometry: &ViewfinderGeometry,
    frame: &LumaFrame,
) -> Option<ScanResult> {
    detections.into_iter().find_map(|detection| {
        let bounds = detection.bounding_box?;
        let text = detection.raw_value?;
        if geometry.accept(&bounds, frame.width(), frame.height()) {
            Some(ScanResult::new(text))
        } else {
            log::trace!("frame {}: {:?} outside viewfinder", frame.sequence, bounds);
            None
        }
    })
}

/// Live analyzer: decoder plus viewfinder
pub struct QrAnalyzer<D> {
    decoder: D,
    overlay: SharedOverlay,
    halted: bool,
    frames_analyzed: u64,
}

impl<D: BarcodeDecoder> QrAnalyzer<D> {
    /// Create an analyzer reading the viewfinder from `overlay`
    pub fn new(decoder: D, overlay: SharedOverlay) -> Self {
        Self {
            decoder,
            overlay,
            halted: false,
            frames_analyzed: 0,
        }
    }

    /// Analyze one frame.
    ///
    /// Returns the first accepted detection's text. Decoder failures are logged
    /// and treated as "nothing found"; the next frame simply tries again.
    /// The caller keeps ownership of the frame and releases it.
    pub fn analyze(&mut self, frame: &LumaFrame) -> Option<ScanResult> {
        if self.halted {
            return None;
        }
        self.frames_analyzed += 1;

        let detections = match self.decoder.decode(frame) {
            Ok(detections) => detections,
            Err(err) => {
                log::error!("barcode scanning failed on frame {}: {}", frame.sequence, err);
                return None;
            }
        };

        let geometry = self.overlay.geometry();
        let hit = first_accepted(detections, &geometry, frame);

        if let Some(result) = &hit {
            log::info!("frame {}: accepted {:?}", frame.sequence, result.text);
            self.halted = true;
        }
        hit
    }

    /// True once a detection has been accepted
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Re-arm after a result was consumed
    pub fn reset(&mut self) {
        self.halted = false;
    }

    /// Frames decoded so far (halted frames are not counted)
    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    /// Viewfinder this analyzer reads
    pub fn overlay(&self) -> &SharedOverlay {
        &self.overlay
    }

    /// Decoder this analyzer drives
    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::models::PixelRect;
    use crate::viewfinder::Overlay;

    struct Scripted(Vec<Detection>);

    impl BarcodeDecoder for Scripted {
        fn decode(&mut self, _frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl BarcodeDecoder for Failing {
        fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
            Err(ScanError::InvalidFrame {
                width: frame.width(),
                height: frame.height(),
                len: 0,
            })
        }
    }

    fn overlay_100() -> SharedOverlay {
        let shared = SharedOverlay::new(Overlay::with_fraction(0.5));
        shared.resize(100, 100); // rect (25,25)-(75,75)
        shared
    }

    fn frame() -> LumaFrame {
        LumaFrame::from_luma(vec![0; 100 * 100], 100, 100).unwrap()
    }

    #[test]
    fn test_first_inside_wins() {
        let detections = vec![
            Detection::new("outside", PixelRect::new(0, 0, 10, 10)),
            Detection {
                raw_value: None,
                bounding_box: Some(PixelRect::new(40, 40, 60, 60)),
            },
            Detection {
                raw_value: Some("no-box".into()),
                bounding_box: None,
            },
            Detection::new("first", PixelRect::new(30, 30, 40, 40)),
            Detection::new("second", PixelRect::new(50, 50, 60, 60)),
        ];
        let mut analyzer = QrAnalyzer::new(Scripted(detections), overlay_100());
        let result = analyzer.analyze(&frame()).unwrap();
        assert_eq!(result.text, "first");
        assert!(analyzer.is_halted());
    }

    #[test]
    fn test_empty_value_still_accepted() {
        let detections = vec![
            Detection::new("outside", PixelRect::new(0, 0, 10, 10)),
            Detection::new("", PixelRect::new(30, 30, 40, 40)),
        ];
        let mut analyzer = QrAnalyzer::new(Scripted(detections), overlay_100());
        assert_eq!(analyzer.analyze(&frame()).unwrap().text, "");
        assert!(analyzer.is_halted());
    }

    #[test]
    fn test_halts_after_hit() {
        let detections = vec![Detection::new("M-07", PixelRect::new(30, 30, 40, 40))];
        let mut analyzer = QrAnalyzer::new(Scripted(detections), overlay_100());
        assert!(analyzer.analyze(&frame()).is_some());
        assert!(analyzer.analyze(&frame()).is_none());
        assert_eq!(analyzer.frames_analyzed(), 1);

        analyzer.reset();
        assert!(analyzer.analyze(&frame()).is_some());
    }

    #[test]
    fn test_unset_overlay_rejects_all() {
        let detections = vec![Detection::new("M-07", PixelRect::new(30, 30, 40, 40))];
        let overlay = SharedOverlay::new(Overlay::with_fraction(0.5));
        let mut analyzer = QrAnalyzer::new(Scripted(detections), overlay);
        assert!(analyzer.analyze(&frame()).is_none());
        assert!(!analyzer.is_halted());
    }

    #[test]
    fn test_decoder_error_yields_none() {
        let mut analyzer = QrAnalyzer::new(Failing, overlay_100());
        assert!(analyzer.analyze(&frame()).is_none());
        assert!(!analyzer.is_halted());
    }
}
