//! Utility functions for frame handling
//!
//! This module provides helpers for the scan pipeline:
//! - Luminance conversion (RGB/RGBA to 8-bit luma)
//! - Frame pools (buffer reuse between camera frames)

/// Recycled frame buffers
pub mod frame_pool;
/// RGB/RGBA to luminance conversion
pub mod grayscale;
