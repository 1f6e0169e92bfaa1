//! Error types for PCM audio operations.

use thiserror::Error;

/// Error type for PCM audio operations.
///
/// All validation happens where values enter the crate (descriptor
/// construction, buffer wrapping, container decoding). Once a [`PcmAudio`]
/// exists, operations on it do not fail for data-shape reasons.
///
/// [`PcmAudio`]: crate::pcm::PcmAudio
#[derive(Error, Debug)]
pub enum Error {
    /// Channel count, sample width or frame rate out of range.
    #[error("pcm: invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer length is not a whole number of frames.
    #[error("pcm: invalid buffer: {len} bytes is not a multiple of the {frame_size}-byte frame size")]
    InvalidBuffer { len: usize, frame_size: usize },

    /// Container header or payload cannot be represented as raw PCM.
    #[error("wav: unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Stream or sink I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PCM audio operations.
pub type Result<T> = std::result::Result<T, Error>;
