//! Integration tests for still-image scanning

use floor_scan::gallery::{load_frame, load_frame_with_max_dim, scan_image_file};
use floor_scan::{BarcodeDecoder, Detection, LumaFrame, PixelRect, RqrrDecoder, ScanError, Scanner};
use image::{GrayImage, Luma};

/// Reports one code in the top-left corner, far from any viewfinder
struct CornerDecoder;

impl BarcodeDecoder for CornerDecoder {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        Ok(vec![Detection::new(
            format!("{}x{}", frame.width(), frame.height()),
            PixelRect::new(0, 0, 4, 4),
        )])
    }
}

fn write_blank(dir: &tempfile::TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.path().join(name);
    GrayImage::from_pixel(width, height, Luma([255u8]))
        .save(&path)
        .expect("Failed to write test image");
    path
}

#[test]
fn test_gallery_ignores_viewfinder() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_blank(&dir, "corner.png", 120, 80);

    let mut scanner = Scanner::with_decoder(CornerDecoder);
    scanner.resize_view(120, 80);
    let result = scanner.scan_image_file(&path).unwrap();
    assert_eq!(result.text, "120x80");
}

#[test]
fn test_blank_image_has_no_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_blank(&dir, "blank.png", 96, 96);

    let mut decoder = RqrrDecoder::new();
    assert!(matches!(
        scan_image_file(&path, &mut decoder),
        Err(ScanError::NoCodeFound)
    ));
}

#[test]
fn test_load_frame_luminance() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_blank(&dir, "white.png", 32, 16);

    let frame = load_frame(&path).unwrap();
    assert_eq!((frame.width(), frame.height()), (32, 16));
    assert!(frame.data().iter().all(|&v| v == 255));
}

#[test]
fn test_large_image_downscaled() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_blank(&dir, "wide.png", 400, 200);

    let frame = load_frame_with_max_dim(&path, Some(100)).unwrap();
    assert_eq!((frame.width(), frame.height()), (100, 50));

    let frame = load_frame_with_max_dim(&path, Some(400)).unwrap();
    assert_eq!((frame.width(), frame.height()), (400, 200));

    let frame = load_frame_with_max_dim(&path, None).unwrap();
    assert_eq!((frame.width(), frame.height()), (400, 200));
}

#[test]
fn test_unreadable_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let mut decoder = CornerDecoder;
    assert!(matches!(
        scan_image_file(&path, &mut decoder),
        Err(ScanError::Image(_))
    ));
}
