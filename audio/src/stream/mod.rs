//! Boundary to live audio devices.
//!
//! The core never talks to hardware itself. A [`Device`] opens blocking
//! [`Stream`]s that read and write raw frames in the stream's own layout;
//! [`PcmAudio::record`] and [`PcmAudio::play`] adjust clips to and from that
//! layout. Streams are closed on every exit path: [`with_stream`] closes
//! explicitly and reports the result, and implementations also close on
//! drop.
//!
//! # Example
//!
//! ```rust
//! use poordub_audio::pcm::{Params, PcmAudio};
//! use poordub_audio::stream::{Direction, MemoryDevice, with_stream};
//!
//! let device = MemoryDevice::new();
//! let tone = PcmAudio::sine(440.0, 300, Params::MONO_16K);
//!
//! with_stream(&device, Params::MONO_16K, Direction::Output, |out| tone.play(out)).unwrap();
//! let recorded = with_stream(&device, Params::MONO_16K, Direction::Input, |input| {
//!     PcmAudio::record(input, 300)
//! })
//! .unwrap();
//! assert_eq!(recorded, tone);
//! ```

mod memory;

pub use memory::{MemoryDevice, MemoryStream};

use std::io;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::pcm::{Params, PcmAudio};

/// Block length used when recording from and playing to a stream.
pub const BLOCK_DURATION: Duration = Duration::from_millis(100);

/// Which way audio flows through a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Capture only.
    Input,
    /// Playback only.
    Output,
    /// Capture and playback on the same stream.
    Duplex,
}

impl Direction {
    /// Returns true if the stream can be read from.
    pub fn is_input(&self) -> bool {
        matches!(self, Direction::Input | Direction::Duplex)
    }

    /// Returns true if the stream can be written to.
    pub fn is_output(&self) -> bool {
        matches!(self, Direction::Output | Direction::Duplex)
    }
}

/// A blocking audio stream exchanging raw frames in its own layout.
pub trait Stream {
    /// Returns the layout of the frames read from and written to the stream.
    fn params(&self) -> Params;

    /// Blocks until `frames` frames have been captured and returns them.
    fn read(&mut self, frames: usize) -> io::Result<Vec<u8>>;

    /// Blocks until `data` (whole frames) has been accepted for playback.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Releases the stream. Closing twice is a no-op.
    fn close(&mut self) -> io::Result<()>;
}

/// Opens streams on an audio device.
pub trait Device {
    /// The stream type produced by this device.
    type Stream: Stream;

    /// Opens a stream with the given layout and direction.
    fn open(&self, params: Params, direction: Direction) -> Result<Self::Stream>;
}

/// Opens a stream, runs `f` on it and closes it on every exit path.
///
/// An error from `f` takes precedence over an error from closing.
pub fn with_stream<D, T, F>(device: &D, params: Params, direction: Direction, f: F) -> Result<T>
where
    D: Device,
    F: FnOnce(&mut D::Stream) -> Result<T>,
{
    let mut stream = device.open(params, direction)?;
    debug!(%params, ?direction, "stream opened");

    let result = f(&mut stream);
    let closed = stream.close();
    debug!(%params, ?direction, "stream closed");

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(Error::Io(e)),
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "stream close failed after error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
    }
}

impl PcmAudio {
    /// Captures `duration_ms` milliseconds from `stream` in its layout.
    ///
    /// Reads happen in [`BLOCK_DURATION`] blocks. A short or empty read is
    /// reported as an error and not retried.
    pub fn record<S: Stream + ?Sized>(stream: &mut S, duration_ms: u64) -> Result<PcmAudio> {
        let params = stream.params();
        let frame_size = params.frame_size();
        let wanted = params.frames_in(duration_ms);
        let block = (params.bytes_in_duration(BLOCK_DURATION) / frame_size).max(1);

        let mut data = Vec::with_capacity(wanted * frame_size);
        let mut collected = 0;
        while collected < wanted {
            let n = block.min(wanted - collected);
            let chunk = stream.read(n)?;
            if chunk.len() != n * frame_size {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "stream: short read: wanted {} bytes, got {}",
                        n * frame_size,
                        chunk.len()
                    ),
                )));
            }
            data.extend_from_slice(&chunk);
            collected += n;
        }

        debug!(%params, frames = collected, "recorded");
        PcmAudio::new(params, data)
    }

    /// Plays the clip on `stream`, adjusting it to the stream's layout first.
    pub fn play<S: Stream + ?Sized>(&self, stream: &mut S) -> Result<()> {
        let params = stream.params();
        let audio = self.adjust(params);
        let block = params
            .bytes_in_duration(BLOCK_DURATION)
            .max(params.frame_size());

        for chunk in audio.data().chunks(block) {
            stream.write(chunk)?;
        }
        debug!(%params, frames = audio.frames(), "played");
        Ok(())
    }
}
