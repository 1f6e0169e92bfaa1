//! Layout adjustment: converts raw PCM between parameter descriptors.
//!
//! Conversion always runs in the same order (channels, then sample width,
//! then frame rate) so results are reproducible.

use tracing::debug;

use super::params::Params;
use super::sample;
use crate::resampler;

/// Converts `data` laid out as `from` into the layout described by `to`.
pub fn adjust(data: &[u8], from: Params, to: Params) -> Vec<u8> {
    if from == to {
        return data.to_vec();
    }
    debug!(%from, %to, bytes = data.len(), "adjusting pcm layout");

    let mut samples = sample::decode(data, from.sample_width());
    if from.channels() != to.channels() {
        samples = convert_channels(&samples, from.channels() as usize, to.channels() as usize);
    }
    if from.sample_width() != to.sample_width() {
        samples = convert_width(&samples, from.sample_width(), to.sample_width());
    }
    if from.frame_rate() != to.frame_rate() {
        samples = convert_rate(
            &samples,
            to.channels() as usize,
            to.sample_width(),
            from.frame_rate(),
            to.frame_rate(),
        );
    }
    sample::encode(&samples, to.sample_width())
}

/// Maps interleaved frames of `from` channels onto `to` channels.
///
/// Up-mixing copies input channel `c % from` into output channel `c`, so
/// mono is duplicated into every channel. Down-mixing averages the input
/// channels congruent to `c` modulo `to`, so any layout reduces to mono by
/// averaging all of its channels.
pub fn convert_channels(samples: &[i32], from: usize, to: usize) -> Vec<i32> {
    if from == to {
        return samples.to_vec();
    }
    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);

    for frame in samples.chunks_exact(from) {
        if to > from {
            out.extend((0..to).map(|c| frame[c % from]));
        } else {
            for c in 0..to {
                let (sum, n) = frame
                    .iter()
                    .skip(c)
                    .step_by(to)
                    .fold((0i64, 0i64), |(sum, n), &s| (sum + s as i64, n + 1));
                out.push(round_div(sum, n) as i32);
            }
        }
    }
    out
}

/// Divides rounding half away from zero.
fn round_div(sum: i64, n: i64) -> i64 {
    let sign = if sum < 0 { -1 } else { 1 };
    (sum * 2 + sign * n) / (2 * n)
}

/// Rescales samples between widths by shifting 8 bits per byte of
/// difference. Narrowing floors toward negative infinity, then saturates
/// like every other sample operation.
pub fn convert_width(samples: &[i32], from: u16, to: u16) -> Vec<i32> {
    if from == to {
        return samples.to_vec();
    }
    if to > from {
        let shift = 8 * (to - from) as u32;
        samples
            .iter()
            .map(|&s| sample::saturate((s as i64) << shift, to))
            .collect()
    } else {
        let shift = 8 * (from - to) as u32;
        samples
            .iter()
            .map(|&s| sample::saturate((s >> shift) as i64, to))
            .collect()
    }
}

/// Resamples interleaved frames from `from` Hz to `to` Hz.
pub fn convert_rate(samples: &[i32], channels: usize, width: u16, from: u32, to: u32) -> Vec<i32> {
    let planar = deinterleave(samples, channels);
    let resampled = resampler::resample(&planar, from, to);
    let frames = resampled.first().map_or(0, Vec::len);

    let mut out = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        for ch in &resampled {
            out.push(sample::quantize(ch[i], width));
        }
    }
    out
}

fn deinterleave(samples: &[i32], channels: usize) -> Vec<Vec<f64>> {
    let frames = samples.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, &s) in planar.iter_mut().zip(frame) {
            ch.push(s as f64);
        }
    }
    planar
}

/// Interleaves two mono sample streams into stereo frames, stopping at the
/// shorter one.
pub fn interleave(left: &[i32], right: &[i32]) -> Vec<i32> {
    left.iter()
        .zip(right)
        .flat_map(|(&l, &r)| [l, r])
        .collect()
}
