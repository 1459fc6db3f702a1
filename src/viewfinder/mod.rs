//! Viewfinder geometry and the containment filter
//!
//! - Overlay rectangle computation (centered square, recomputed on resize)
//! - Mapping of decoder bounding boxes from frame pixels into overlay space
//! - Accept/reject decision for live camera detections

/// Frame-to-overlay containment check
pub mod filter;
/// Overlay rectangle state, sharing and mask rendering
pub mod overlay;

pub use filter::accept;
pub use overlay::{Overlay, SharedOverlay, ViewfinderGeometry};
