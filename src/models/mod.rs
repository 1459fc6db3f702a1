/// Decoder detections and the result handed back to the caller
pub mod detection;
/// Owned luminance camera frames
pub mod frame;
/// Overlay-space and pixel-space rectangles
pub mod rect;

pub use detection::{Detection, ScanResult};
pub use frame::LumaFrame;
pub use rect::{PixelRect, Rect};
