//! PCM (Pulse Code Modulation) audio values and their algebra.
//!
//! # Key Types
//!
//! - [`Params`]: layout descriptor (channels, sample width, frame rate)
//! - [`PcmAudio`]: immutable clip of interleaved PCM samples
//!
//! Every operation on a [`PcmAudio`] returns a new clip. Operations that
//! combine two clips first bring both to their common descriptor (the
//! maximum of each field), so mixing a low-fidelity and a high-fidelity clip
//! never discards precision.
//!
//! # Example
//!
//! ```rust
//! use poordub_audio::pcm::{Params, PcmAudio};
//!
//! let beep = PcmAudio::sine(880.0, 200, Params::MONO_16K);
//! let pause = PcmAudio::silence(100, Params::MONO_16K);
//!
//! // Three beeps separated by pauses, 6 dB down, with a soft ending
//! let pattern = (beep.concat(&pause).repeat(3) - 6.0).fade_out(50);
//! assert_eq!(pattern.len_ms(), 900);
//! assert!(pattern.peak_level() < -5.9);
//! ```

mod adjust;
mod audio;
mod envelope;
pub mod level;
mod ops;
mod params;
pub mod sample;

pub use adjust::{convert_channels, convert_width};
pub use audio::PcmAudio;
pub use params::{Params, SAMPLE_WIDTHS};
