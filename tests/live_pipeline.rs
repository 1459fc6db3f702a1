//! Integration tests for the live analysis pipeline
//!
//! A gated decoder holds the analysis thread inside `decode` so tests can line up
//! frames behind it deterministically.

use crossbeam_channel::{Receiver, Sender};
use floor_scan::{
    BarcodeDecoder, Detection, LumaFrame, Overlay, PixelRect, QrAnalyzer, ScanError, ScanPipeline,
    SharedOverlay,
};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Reports a code in the middle of every frame except frame 0
struct GatedDecoder {
    started: Sender<u64>,
    gate: Receiver<()>,
}

impl BarcodeDecoder for GatedDecoder {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        let _ = self.started.send(frame.sequence);
        let _ = self.gate.recv_timeout(TIMEOUT);
        if frame.sequence == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![Detection::new(
            format!("frame-{}", frame.sequence),
            PixelRect::new(45, 45, 55, 55),
        )])
    }
}

fn overlay() -> SharedOverlay {
    let shared = SharedOverlay::new(Overlay::with_fraction(0.7));
    shared.resize(100, 100);
    shared
}

fn frame() -> LumaFrame {
    LumaFrame::from_luma(vec![128; 100 * 100], 100, 100).unwrap()
}

#[test]
fn test_keep_only_latest_frame() {
    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let (gate_tx, gate_rx) = crossbeam_channel::unbounded();
    let decoder = GatedDecoder {
        started: started_tx,
        gate: gate_rx,
    };
    let pipeline = ScanPipeline::spawn(QrAnalyzer::new(decoder, overlay())).unwrap();

    // Frame 0 occupies the analysis thread
    assert!(pipeline.submit(frame()));
    assert_eq!(started_rx.recv_timeout(TIMEOUT).unwrap(), 0);

    // Frames 1 and 2 queue up behind it; 1 is replaced by 2
    assert!(pipeline.submit(frame()));
    assert!(pipeline.submit(frame()));
    assert_eq!(pipeline.dropped_frames(), 1);

    gate_tx.send(()).unwrap();
    assert_eq!(started_rx.recv_timeout(TIMEOUT).unwrap(), 2);
    gate_tx.send(()).unwrap();

    let result = pipeline.results().recv_timeout(TIMEOUT).unwrap();
    assert_eq!(result.text, "frame-2");
    assert!(pipeline.is_finished());
    assert_eq!(pipeline.submitted_frames(), 3);

    // Scanning stops after the first accepted hit
    assert!(!pipeline.submit(frame()));
    assert!(pipeline.results().try_recv().is_err());
}

/// Always reports one code at a fixed position
struct FixedDecoder(PixelRect);

impl BarcodeDecoder for FixedDecoder {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        Ok(vec![Detection::new(format!("seq-{}", frame.sequence), self.0)])
    }
}

#[test]
fn test_outside_codes_never_reported() {
    let decoder = FixedDecoder(PixelRect::new(0, 0, 5, 5));
    let pipeline = ScanPipeline::spawn(QrAnalyzer::new(decoder, overlay())).unwrap();

    for _ in 0..5 {
        pipeline.submit(frame());
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(
        pipeline
            .results()
            .recv_timeout(Duration::from_millis(200))
            .is_err()
    );
    assert!(!pipeline.is_finished());
}

#[test]
fn test_resize_reaches_analysis_thread() {
    let decoder = FixedDecoder(PixelRect::new(45, 45, 55, 55));
    let shared = SharedOverlay::new(Overlay::with_fraction(0.7));
    let pipeline = ScanPipeline::spawn(QrAnalyzer::new(decoder, shared)).unwrap();

    // Before layout every detection is rejected
    pipeline.submit(frame());
    assert!(
        pipeline
            .results()
            .recv_timeout(Duration::from_millis(100))
            .is_err()
    );

    pipeline.overlay().resize(100, 100);
    let mut result = None;
    for _ in 0..50 {
        pipeline.submit(frame());
        if let Ok(r) = pipeline.results().recv_timeout(Duration::from_millis(100)) {
            result = Some(r);
            break;
        }
    }
    assert!(result.unwrap().text.starts_with("seq-"));
}

#[test]
fn test_submit_rgba() {
    let decoder = FixedDecoder(PixelRect::new(45, 45, 55, 55));
    let pipeline = ScanPipeline::spawn(QrAnalyzer::new(decoder, overlay())).unwrap();

    assert!(matches!(
        pipeline.submit_rgba(&[0u8; 10], 100, 100),
        Err(ScanError::InvalidFrame { .. })
    ));

    assert!(matches!(
        pipeline.submit_rgba(&[], u32::MAX, u32::MAX),
        Err(ScanError::InvalidFrame { len: 0, .. })
    ));

    let rgba = vec![200u8; 100 * 100 * 4];
    assert!(pipeline.submit_rgba(&rgba, 100, 100).unwrap());
    let result = pipeline.results().recv_timeout(TIMEOUT).unwrap();
    assert_eq!(result.text, "seq-0");
}

#[test]
fn test_shutdown_with_pending_frame() {
    let decoder = FixedDecoder(PixelRect::new(0, 0, 1, 1));
    let mut pipeline = ScanPipeline::spawn(QrAnalyzer::new(decoder, overlay())).unwrap();
    pipeline.submit(frame());
    pipeline.shutdown();
    assert!(!pipeline.submit(frame()));
}

/// Panics on every frame, taking the analysis thread down with it
struct PanickingDecoder;

impl BarcodeDecoder for PanickingDecoder {
    fn decode(&mut self, _frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        panic!("decoder crashed");
    }
}

#[test]
fn test_dead_worker_refuses_frames() {
    let pipeline = ScanPipeline::spawn(QrAnalyzer::new(PanickingDecoder, overlay())).unwrap();
    assert!(pipeline.is_running());
    pipeline.submit(frame());

    let mut refused = false;
    for _ in 0..500 {
        if !pipeline.submit(frame()) {
            refused = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(refused);
    assert!(!pipeline.is_running());
    assert!(!pipeline.is_finished());
}
