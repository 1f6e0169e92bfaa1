//! Frame-rate conversion for planar `f64` audio.
//!
//! The primary path uses band-limited FFT resampling from the `rubato`
//! crate. Ratios whose reduced form is too large for a fixed FFT block fall
//! back to linear interpolation.
//!
//! # Example
//!
//! ```rust
//! use poordub_audio::resampler::{resample, target_len};
//!
//! let input = vec![vec![0.0f64; 1600]]; // 100ms mono at 16kHz
//! let output = resample(&input, 16000, 48000);
//! assert_eq!(output[0].len(), target_len(1600, 16000, 48000));
//! assert_eq!(output[0].len(), 4800);
//! ```

mod linear;
mod rubato_impl;

pub use linear::resample_linear;
pub use rubato_impl::{ResamplerError, resample_fft};

use tracing::{trace, warn};

/// Returns the number of output frames for `frames` input frames converted
/// from `from` Hz to `to` Hz: `round(frames * to / from)`.
pub fn target_len(frames: usize, from: u32, to: u32) -> usize {
    let num = frames as u128 * to as u128 * 2 + from as u128;
    (num / (2 * from as u128)) as usize
}

/// Converts planar channels from `from` Hz to `to` Hz.
///
/// Every output channel has exactly [`target_len`] frames. Equal rates
/// return a copy of the input.
pub fn resample(channels: &[Vec<f64>], from: u32, to: u32) -> Vec<Vec<f64>> {
    let frames = channels.first().map_or(0, Vec::len);
    if from == to {
        return channels.to_vec();
    }
    let target = target_len(frames, from, to);
    if frames == 0 || target == 0 {
        return vec![Vec::new(); channels.len()];
    }

    match resample_fft(channels, from, to, target) {
        Ok(out) => {
            trace!(from, to, frames, target, "resampled with fft");
            out
        }
        Err(e) => {
            warn!(from, to, error = %e, "fft resampler unavailable, using linear interpolation");
            resample_linear(channels, target)
        }
    }
}
