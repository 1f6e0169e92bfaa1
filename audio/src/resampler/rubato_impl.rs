//! Rubato-based resampler implementation.
//!
//! Uses the synchronous FFT resampler from the rubato library, a pure Rust
//! implementation without any FFI dependencies. The whole clip is pushed
//! through in fixed-size blocks, then the filter delay is trimmed off the
//! front so output frame `j` lines up with input time `j / to`.

use rubato::{FftFixedInOut, Resampler};
use thiserror::Error;

/// Preferred number of input frames per processing block.
const CHUNK_FRAMES: usize = 1024;

/// Largest block (in frames, on either side) the FFT resampler is built with.
const MAX_CHUNK_FRAMES: usize = 1 << 16;

/// Error type for resampling operations.
#[derive(Error, Debug)]
pub enum ResamplerError {
    /// The reduced rate ratio needs a block larger than [`MAX_CHUNK_FRAMES`].
    #[error("resampler: ratio {from}:{to} is too fine-grained for a fixed block")]
    Ratio { from: u32, to: u32 },

    /// Error from rubato.
    #[error("rubato error: {0}")]
    Rubato(String),
}

impl From<rubato::ResamplerConstructionError> for ResamplerError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        ResamplerError::Rubato(e.to_string())
    }
}

impl From<rubato::ResampleError> for ResamplerError {
    fn from(e: rubato::ResampleError) -> Self {
        ResamplerError::Rubato(e.to_string())
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Picks an input block size that is a whole number of reduced-ratio
/// periods and keeps both sides of the block under [`MAX_CHUNK_FRAMES`].
fn chunk_size(from: u32, to: u32) -> Result<usize, ResamplerError> {
    let g = gcd(from as usize, to as usize);
    let (from_period, to_period) = (from as usize / g, to as usize / g);
    if from_period > MAX_CHUNK_FRAMES || to_period > MAX_CHUNK_FRAMES {
        return Err(ResamplerError::Ratio { from, to });
    }
    let periods = (CHUNK_FRAMES / from_period)
        .min(MAX_CHUNK_FRAMES / to_period)
        .max(1);
    Ok(periods * from_period)
}

/// Resamples planar channels from `from` Hz to `to` Hz, returning exactly
/// `target` frames per channel.
pub fn resample_fft(
    channels: &[Vec<f64>],
    from: u32,
    to: u32,
    target: usize,
) -> Result<Vec<Vec<f64>>, ResamplerError> {
    let num_channels = channels.len();
    let frames = channels.first().map_or(0, Vec::len);
    if num_channels == 0 {
        return Ok(Vec::new());
    }

    let mut resampler = FftFixedInOut::<f64>::new(
        from as usize,
        to as usize,
        chunk_size(from, to)?,
        num_channels,
    )?;

    let delay = resampler.output_delay();
    let wanted = target + delay;
    let mut output: Vec<Vec<f64>> = vec![Vec::with_capacity(wanted); num_channels];
    let mut input_buf: Vec<Vec<f64>> = vec![Vec::new(); num_channels];
    let mut pos = 0;

    while output[0].len() < wanted {
        let needed = resampler.input_frames_next();
        let start = pos.min(frames);
        let end = (pos + needed).min(frames);
        for (buf, ch) in input_buf.iter_mut().zip(channels) {
            buf.clear();
            buf.extend_from_slice(&ch[start..end]);
            // Pad past the end of the clip with silence
            buf.resize(needed, 0.0);
        }
        pos += needed;

        let processed = resampler.process(&input_buf, None)?;
        for (out, block) in output.iter_mut().zip(processed) {
            out.extend(block);
        }
    }

    for out in &mut output {
        out.drain(..delay);
        out.truncate(target);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, rate: u32, frames: usize) -> Vec<f64> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / rate as f64).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(44100, 16000), 100);
        assert_eq!(gcd(48000, 16000), 16000);
        assert_eq!(gcd(7, 5), 1);
    }

    #[test]
    fn test_chunk_size() {
        // 16000:48000 reduces to 1:3
        assert_eq!(chunk_size(16000, 48000).unwrap(), 1024);
        // 44100:16000 reduces to 441:160
        assert_eq!(chunk_size(44100, 16000).unwrap(), 882);
        // 1:44100 is limited by the output side
        assert_eq!(chunk_size(1, 44100).unwrap(), 1);
        assert!(matches!(
            chunk_size(1_000_003, 1_000_033),
            Err(ResamplerError::Ratio { .. })
        ));
    }

    #[test]
    fn test_resample_fft_exact_length() {
        let input = vec![sine(440.0, 16000, 16000)];
        let out = resample_fft(&input, 16000, 44100, 44100).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 44100);
    }

    #[test]
    fn test_resample_fft_keeps_level() {
        let input = vec![sine(440.0, 48000, 48000)];
        let out = resample_fft(&input, 48000, 16000, 16000).unwrap();
        let peak = out[0][1000..15000]
            .iter()
            .fold(0.0f64, |m, s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.02, "peak {peak}");
    }

    #[test]
    fn test_resampler_error_display() {
        let err = ResamplerError::Rubato("test error".to_string());
        assert!(err.to_string().contains("rubato error"));

        let err = ResamplerError::Ratio { from: 7, to: 11 };
        assert!(err.to_string().contains("7:11"));
    }
}
