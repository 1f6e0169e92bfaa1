//! PCM layout descriptor.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sample widths (in bytes) that a PCM buffer may use.
pub const SAMPLE_WIDTHS: [u16; 3] = [1, 2, 4];

/// Describes the layout of a PCM buffer: channel count, sample width in
/// bytes and frame rate in frames per second.
///
/// A `Params` value is always valid; construct it with [`Params::new`] or
/// use one of the presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct Params {
    channels: u16,
    sample_width: u16,
    frame_rate: u32,
}

/// Unvalidated wire form of [`Params`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawParams {
    channels: u16,
    sample_width: u16,
    frame_rate: u32,
}

impl TryFrom<RawParams> for Params {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self> {
        Params::new(raw.channels, raw.sample_width, raw.frame_rate)
    }
}

impl From<Params> for RawParams {
    fn from(p: Params) -> Self {
        RawParams {
            channels: p.channels,
            sample_width: p.sample_width,
            frame_rate: p.frame_rate,
        }
    }
}

impl Params {
    /// Creates a validated descriptor.
    ///
    /// Fails with [`Error::InvalidParameter`] when `channels` is zero,
    /// `sample_width` is not 1, 2 or 4, or `frame_rate` is zero.
    pub fn new(channels: u16, sample_width: u16, frame_rate: u32) -> Result<Self> {
        if channels < 1 {
            return Err(Error::InvalidParameter(format!(
                "channel count must be at least 1, got {channels}"
            )));
        }
        if !SAMPLE_WIDTHS.contains(&sample_width) {
            return Err(Error::InvalidParameter(format!(
                "sample width must be one of {SAMPLE_WIDTHS:?} bytes, got {sample_width}"
            )));
        }
        if frame_rate < 1 {
            return Err(Error::InvalidParameter(format!(
                "frame rate must be at least 1, got {frame_rate}"
            )));
        }
        Ok(Self::preset(channels, sample_width, frame_rate))
    }

    const fn preset(channels: u16, sample_width: u16, frame_rate: u32) -> Self {
        Self {
            channels,
            sample_width,
            frame_rate,
        }
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Returns the width of one sample in bytes.
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// Returns the frame rate in frames per second.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Returns a copy with a different channel count.
    pub fn with_channels(&self, channels: u16) -> Result<Self> {
        Self::new(channels, self.sample_width, self.frame_rate)
    }

    /// Returns a copy with a different sample width.
    pub fn with_sample_width(&self, sample_width: u16) -> Result<Self> {
        Self::new(self.channels, sample_width, self.frame_rate)
    }

    /// Returns a copy with a different frame rate.
    pub fn with_frame_rate(&self, frame_rate: u32) -> Result<Self> {
        Self::new(self.channels, self.sample_width, frame_rate)
    }

    /// Returns the single-channel variant of this layout.
    pub fn mono(&self) -> Self {
        Self::preset(1, self.sample_width, self.frame_rate)
    }

    /// Returns the two-channel variant of this layout.
    pub fn stereo(&self) -> Self {
        Self::preset(2, self.sample_width, self.frame_rate)
    }

    /// Returns the bit depth of one sample.
    pub fn depth(&self) -> u32 {
        self.sample_width as u32 * 8
    }

    /// Returns the number of bytes per frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.channels as usize * self.sample_width as usize
    }

    /// Returns the number of bytes per second of audio.
    pub fn bytes_rate(&self) -> usize {
        self.frame_size() * self.frame_rate as usize
    }

    /// Returns the magnitude of the most negative sample, which is the
    /// reference for 0 dBFS.
    pub fn full_scale(&self) -> f64 {
        (1u64 << (self.depth() - 1)) as f64
    }

    /// Returns the smallest and largest representable sample values.
    pub fn sample_range(&self) -> (i32, i32) {
        super::sample::range(self.sample_width)
    }

    /// Returns the number of frames closest to `ms` milliseconds, saturating
    /// at `usize::MAX`.
    pub fn frames_in(&self, ms: u64) -> usize {
        let rate = self.frame_rate as u128;
        usize::try_from((ms as u128 * rate + 500) / 1000).unwrap_or(usize::MAX)
    }

    /// Returns the number of bytes needed for the given duration, saturating
    /// at `usize::MAX`.
    pub fn bytes_in_duration(&self, duration: Duration) -> usize {
        let rate = self.frame_rate as u128;
        let frames = duration.as_nanos().saturating_mul(rate).saturating_add(500_000_000)
            / 1_000_000_000;
        usize::try_from(frames)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.frame_size())
    }

    /// Returns the duration of `frames` frames.
    pub fn duration_of(&self, frames: usize) -> Duration {
        let nanos = frames as u128 * 1_000_000_000 / self.frame_rate as u128;
        Duration::from_nanos(nanos as u64)
    }

    /// Returns the duration of `frames` frames, rounded to whole milliseconds.
    pub fn millis_of(&self, frames: usize) -> u64 {
        let rate = self.frame_rate as u128;
        ((frames as u128 * 1000 + rate / 2) / rate) as u64
    }

    /// Returns the descriptor both operands of a binary operation are
    /// adjusted to: the maximum of each field, so neither side loses
    /// fidelity.
    pub fn common(&self, other: &Params) -> Params {
        Params::preset(
            self.channels.max(other.channels),
            self.sample_width.max(other.sample_width),
            self.frame_rate.max(other.frame_rate),
        )
    }
}

// Common presets
impl Params {
    /// 8kHz mono, 16-bit (telephony)
    pub const MONO_8K: Params = Params::preset(1, 2, 8000);
    /// 16kHz mono, 16-bit (speech)
    pub const MONO_16K: Params = Params::preset(1, 2, 16000);
    /// 22.05kHz mono, 16-bit
    pub const MONO_22K: Params = Params::preset(1, 2, 22050);
    /// 44.1kHz mono, 16-bit (CD quality mono)
    pub const MONO_44K: Params = Params::preset(1, 2, 44100);
    /// 48kHz mono, 16-bit
    pub const MONO_48K: Params = Params::preset(1, 2, 48000);
    /// 44.1kHz stereo, 16-bit (CD quality)
    pub const STEREO_44K: Params = Params::preset(2, 2, 44100);
    /// 48kHz stereo, 16-bit
    pub const STEREO_48K: Params = Params::preset(2, 2, 48000);
}

impl Default for Params {
    fn default() -> Self {
        Params::MONO_44K
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ch/{}bit/{}Hz",
            self.channels,
            self.depth(),
            self.frame_rate
        )
    }
}
