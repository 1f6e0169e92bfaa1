//! Immutable PCM audio values.
//!
//! This crate provides a small algebra over uncompressed audio clips:
//!
//! - `pcm`: the [`PcmAudio`] value type, its layout descriptor [`Params`],
//!   concatenation, repetition, gain, mixing, slicing, fades and level
//!   measurement
//! - `resampler`: frame-rate conversion used by layout adjustment
//! - `codec`: RIFF/WAVE container I/O
//! - `stream`: the boundary to live capture and playback devices
//! - `portaudio` (feature `portaudio`): blocking PortAudio device streams
//!
//! # Example
//!
//! ```rust
//! use poordub_audio::{Params, PcmAudio};
//!
//! let a440 = PcmAudio::sine(440.0, 1000, Params::default());
//! let a880 = PcmAudio::sine(880.0, 1000, Params::MONO_16K);
//!
//! // Mixing promotes both sides to the common layout
//! let chord = (&a440 - 6.0) & (&a880 - 6.0);
//! assert_eq!(chord.params(), Params::MONO_44K);
//!
//! // Gentle edges, then back to full scale
//! let shaped = chord.fade_in(50).fade_out(50).normalize();
//! assert!(shaped.peak_level() > -0.01);
//!
//! let wav = shaped.to_wav_bytes().unwrap();
//! assert_eq!(PcmAudio::from_wav(&wav[..]).unwrap(), shaped);
//! ```

pub mod codec;
pub mod error;
pub mod pcm;
#[cfg(feature = "portaudio")]
pub mod portaudio;
pub mod resampler;
pub mod stream;

pub use error::{Error, Result};
pub use pcm::{Params, PcmAudio};
