use super::PixelRect;

/// One barcode reported by a decoder for a single frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detection {
    /// Decoded text, if the decoder could read the payload
    pub raw_value: Option<String>,
    /// Bounding box in frame pixel coordinates, if reported
    pub bounding_box: Option<PixelRect>,
}

impl Detection {
    /// Detection with both a value and a bounding box
    pub fn new(raw_value: impl Into<String>, bounding_box: PixelRect) -> Self {
        Self {
            raw_value: Some(raw_value.into()),
            bounding_box: Some(bounding_box),
        }
    }

    /// Decoded text, treating an empty payload as missing (still-image rule)
    pub fn text(&self) -> Option<&str> {
        self.raw_value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Result handed back to the screen that launched the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Scanned text
    pub text: String,
}

impl ScanResult {
    /// Primary result key
    pub const KEY_RESULT: &'static str = "SCAN_RESULT";
    /// Duplicate key read by callers expecting the original payload
    pub const KEY_RESULT_ORIGINAL: &'static str = "SCAN_RESULT_ORIGINAL";
    /// Duplicate key read by callers expecting the raw payload
    pub const KEY_RESULT_RAW: &'static str = "SCAN_RESULT_RAW";

    /// Wrap scanned text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Result extras in the ZXing-compatible layout (same text under every key)
    pub fn extras(&self) -> [(&'static str, &str); 3] {
        [
            (Self::KEY_RESULT, self.text.as_str()),
            (Self::KEY_RESULT_ORIGINAL, self.text.as_str()),
            (Self::KEY_RESULT_RAW, self.text.as_str()),
        ]
    }
}
