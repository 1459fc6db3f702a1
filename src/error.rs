use thiserror::Error;

/// Errors raised around the scanner core
///
/// The viewfinder filter itself never errors; invalid geometry simply rejects.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Still image could not be opened or decoded
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    /// Frame has a zero dimension or too few bytes
    #[error("invalid frame {width}x{height} with {len} bytes")]
    InvalidFrame {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Buffer length actually supplied
        len: usize,
    },

    /// Image decoded but carried no usable code
    #[error("no QR code found in image")]
    NoCodeFound,

    /// Analysis worker could not be started
    #[error("failed to spawn analysis thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
