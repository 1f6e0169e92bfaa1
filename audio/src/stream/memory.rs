//! In-process loopback device.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Device, Direction, Stream};
use crate::error::Result;
use crate::pcm::Params;

#[derive(Default)]
struct Shared {
    buffer: Mutex<VecDeque<u8>>,
    open: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> io::Result<MutexGuard<'_, VecDeque<u8>>> {
        self.buffer
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

/// A loopback device: bytes written to its output streams are queued and
/// handed out, in order, to its input streams.
///
/// Streams do not convert between layouts, so readers should open with the
/// same [`Params`] the writers used.
#[derive(Clone, Default)]
pub struct MemoryDevice {
    shared: Arc<Shared>,
}

impl MemoryDevice {
    /// Creates a device with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued bytes.
    pub fn buffered(&self) -> usize {
        self.shared.lock().map(|b| b.len()).unwrap_or(0)
    }

    /// Returns the number of streams opened and not yet closed.
    pub fn open_streams(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }
}

impl Device for MemoryDevice {
    type Stream = MemoryStream;

    fn open(&self, params: Params, direction: Direction) -> Result<MemoryStream> {
        self.shared.open.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryStream {
            shared: Arc::clone(&self.shared),
            params,
            direction,
            closed: false,
        })
    }
}

/// A stream on a [`MemoryDevice`].
pub struct MemoryStream {
    shared: Arc<Shared>,
    params: Params,
    direction: Direction,
    closed: bool,
}

impl MemoryStream {
    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("stream closed"));
        }
        Ok(())
    }
}

impl Stream for MemoryStream {
    fn params(&self) -> Params {
        self.params
    }

    /// Fails with `UnexpectedEof` when fewer than `frames` frames are queued.
    fn read(&mut self, frames: usize) -> io::Result<Vec<u8>> {
        self.check_open()?;
        if !self.direction.is_input() {
            return Err(io::Error::other("no input channels"));
        }
        let len = frames * self.params.frame_size();
        let mut buffer = self.shared.lock()?;
        if buffer.len() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream: {} bytes queued, {len} requested", buffer.len()),
            ));
        }
        Ok(buffer.drain(..len).collect())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.check_open()?;
        if !self.direction.is_output() {
            return Err(io::Error::other("no output channels"));
        }
        if data.len() % self.params.frame_size() != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "stream: partial frame",
            ));
        }
        self.shared.lock()?.extend(data);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.shared.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::PcmAudio;
    use crate::stream::with_stream;

    #[test]
    fn test_loopback() {
        let device = MemoryDevice::new();
        let tone = PcmAudio::sine(440.0, 250, Params::MONO_16K);

        let mut out = device.open(Params::MONO_16K, Direction::Output).unwrap();
        tone.play(&mut out).unwrap();
        assert_eq!(device.buffered(), tone.data().len());

        let mut input = device.open(Params::MONO_16K, Direction::Input).unwrap();
        let recorded = PcmAudio::record(&mut input, 250).unwrap();
        assert_eq!(recorded, tone);
        assert_eq!(device.buffered(), 0);
    }

    #[test]
    fn test_duplex() {
        let device = MemoryDevice::new();
        let clip = PcmAudio::sine(300.0, 50, Params::MONO_8K);
        let echoed = with_stream(&device, Params::MONO_8K, Direction::Duplex, |s| {
            clip.play(s)?;
            PcmAudio::record(s, 50)
        })
        .unwrap();
        assert_eq!(echoed, clip);
    }

    #[test]
    fn test_direction_enforced() {
        let device = MemoryDevice::new();
        let mut out = device.open(Params::MONO_8K, Direction::Output).unwrap();
        assert!(out.read(1).is_err());

        let mut input = device.open(Params::MONO_8K, Direction::Input).unwrap();
        assert!(input.write(&[0, 0]).is_err());
    }

    #[test]
    fn test_partial_frame_rejected() {
        let device = MemoryDevice::new();
        let mut out = device.open(Params::STEREO_44K, Direction::Output).unwrap();
        let err = out.write(&[0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_close_and_drop_release() {
        let device = MemoryDevice::new();
        let mut a = device.open(Params::MONO_8K, Direction::Output).unwrap();
        let b = device.open(Params::MONO_8K, Direction::Input).unwrap();
        assert_eq!(device.open_streams(), 2);

        a.close().unwrap();
        a.close().unwrap();
        assert_eq!(device.open_streams(), 1);
        assert!(a.write(&[0, 0]).is_err());

        drop(b);
        assert_eq!(device.open_streams(), 0);
    }
}
