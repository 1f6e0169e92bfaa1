//! The immutable PCM audio value.

use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;

use super::adjust;
use super::level;
use super::params::Params;
use super::sample;
use crate::error::{Error, Result};

/// A clip of uncompressed PCM audio: a layout descriptor plus a buffer of
/// interleaved little-endian signed samples.
///
/// Values are immutable. Every operation returns a new clip and leaves its
/// inputs untouched. Two clips are equal only when their descriptors and
/// bytes are identical; no layout reconciliation happens for equality.
///
/// Binary operations ([`concat`](Self::concat), [`overlay`](Self::overlay))
/// first adjust both operands to the [common](Params::common) descriptor,
/// so they never fail on mismatched layouts.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PcmAudio {
    params: Params,
    data: Vec<u8>,
}

impl PcmAudio {
    /// Wraps a raw buffer.
    ///
    /// Fails with [`Error::InvalidBuffer`] if `data` is not a whole number
    /// of frames.
    pub fn new(params: Params, data: Vec<u8>) -> Result<Self> {
        let frame_size = params.frame_size();
        if data.len() % frame_size != 0 {
            return Err(Error::InvalidBuffer {
                len: data.len(),
                frame_size,
            });
        }
        Ok(Self { params, data })
    }

    /// Builds a clip from interleaved sample values, saturating each one to
    /// the sample width.
    pub fn from_samples(params: Params, samples: &[i32]) -> Result<Self> {
        Self::new(params, sample::encode(samples, params.sample_width()))
    }

    /// Callers guarantee `data` holds whole frames.
    pub(crate) fn from_parts(params: Params, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len() % params.frame_size(), 0);
        Self { params, data }
    }

    /// Returns a zero-length clip.
    pub fn empty(params: Params) -> Self {
        Self::from_parts(params, Vec::new())
    }

    /// Returns `duration_ms` milliseconds of digital silence.
    pub fn silence(duration_ms: u64, params: Params) -> Self {
        let len = params.frames_in(duration_ms) * params.frame_size();
        Self::from_parts(params, vec![0u8; len])
    }

    /// Generates a full-scale sine tone of `frequency` Hz, identical in
    /// every channel.
    pub fn sine(frequency: f64, duration_ms: u64, params: Params) -> Self {
        let frames = params.frames_in(duration_ms);
        let channels = params.channels() as usize;
        let width = params.sample_width();
        let (_, max) = params.sample_range();
        let step = (frequency / params.frame_rate() as f64) as f32;

        // Phase accumulator in [0, 1).
        let mut phase = 0.0f32;
        let mut samples = Vec::with_capacity(frames * channels);
        for _ in 0..frames {
            let value = (2.0 * PI * phase as f64).sin() * max as f64;
            let s = sample::quantize(value, width);
            samples.extend(std::iter::repeat_n(s, channels));
            phase += step;
            phase -= phase.floor();
        }
        Self::from_parts(params, sample::encode(&samples, width))
    }

    /// Returns the layout descriptor.
    pub fn params(&self) -> Params {
        self.params
    }

    /// Returns the raw interleaved buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the clip and returns the raw buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the interleaved samples as `i32` values.
    pub fn samples(&self) -> Vec<i32> {
        sample::decode(&self.data, self.params.sample_width())
    }

    /// Returns the number of frames.
    pub fn frames(&self) -> usize {
        self.data.len() / self.params.frame_size()
    }

    /// Returns the exact duration.
    pub fn duration(&self) -> Duration {
        self.params.duration_of(self.frames())
    }

    /// Returns the duration in whole milliseconds (rounded).
    pub fn len_ms(&self) -> u64 {
        self.params.millis_of(self.frames())
    }

    /// Returns true if the clip holds no frames.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Converts the clip to another layout.
    pub fn adjust(&self, params: Params) -> PcmAudio {
        if params == self.params {
            return self.clone();
        }
        Self::from_parts(params, adjust::adjust(&self.data, self.params, params))
    }

    /// Adjusts both clips to their common descriptor.
    pub fn adjust_both(&self, other: &PcmAudio) -> (PcmAudio, PcmAudio) {
        let common = self.params.common(&other.params);
        (self.adjust(common), other.adjust(common))
    }

    /// Appends `other` after this clip.
    ///
    /// A zero-length operand is the identity: the other clip is returned
    /// unchanged, descriptor included.
    pub fn concat(&self, other: &PcmAudio) -> PcmAudio {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let (mut a, b) = self.adjust_both(other);
        a.data.extend_from_slice(&b.data);
        a
    }

    /// Concatenates the clip with itself `times` times. Zero yields an empty
    /// clip with the same descriptor.
    pub fn repeat(&self, times: usize) -> PcmAudio {
        Self::from_parts(self.params, self.data.repeat(times))
    }

    /// Scales every sample by `db` decibels, saturating on overflow.
    ///
    /// `f64::NEG_INFINITY` mutes the clip. Silence stays silent for any
    /// gain.
    pub fn gain(&self, db: f64) -> PcmAudio {
        if db == 0.0 {
            return self.clone();
        }
        let factor = level::db_to_factor(db);
        let width = self.params.sample_width();
        let data = sample::map(&self.data, width, |s| {
            if s == 0 {
                0
            } else {
                sample::quantize(s as f64 * factor, width)
            }
        });
        Self::from_parts(self.params, data)
    }

    /// Mixes `other` into this clip, sample by sample, saturating on
    /// overflow. The result is as long as the shorter operand.
    pub fn overlay(&self, other: &PcmAudio) -> PcmAudio {
        let (a, b) = self.adjust_both(other);
        let params = a.params;
        let width = params.sample_width();
        let len = a.data.len().min(b.data.len());

        let mixed: Vec<i32> = sample::decode(&a.data[..len], width)
            .into_iter()
            .zip(sample::decode(&b.data[..len], width))
            .map(|(x, y)| sample::saturate(x as i64 + y as i64, width))
            .collect();
        Self::from_parts(params, sample::encode(&mixed, width))
    }

    /// Negates every sample (phase inversion). The most negative code, which
    /// only appears in decoded or recorded data, saturates to the most
    /// positive one.
    pub fn invert(&self) -> PcmAudio {
        let width = self.params.sample_width();
        let data = sample::map(&self.data, width, |s| sample::saturate(-(s as i64), width));
        Self::from_parts(self.params, data)
    }

    /// Down-mixes to a single channel by averaging each frame.
    pub fn to_mono(&self) -> PcmAudio {
        self.adjust(self.params.mono())
    }

    /// Converts to two channels.
    ///
    /// Without `right`, the clip is spread over both channels. With `right`,
    /// both clips are reduced to mono, brought to a shared sample width and
    /// frame rate, and interleaved as left and right; the longer one is
    /// truncated.
    pub fn to_stereo(&self, right: Option<&PcmAudio>) -> PcmAudio {
        let Some(right) = right else {
            return self.adjust(self.params.stereo());
        };

        let (left, right) = self.to_mono().adjust_both(&right.to_mono());
        let params = left.params.stereo();
        let width = params.sample_width();
        let samples = adjust::interleave(&left.samples(), &right.samples());
        Self::from_parts(params, sample::encode(&samples, width))
    }

    /// Returns the largest absolute sample value.
    pub fn max_amplitude(&self) -> u32 {
        level::max_amplitude(&self.samples())
    }

    /// Returns the peak level in dBFS, or `f64::NEG_INFINITY` for silence.
    pub fn peak_level(&self) -> f64 {
        level::to_dbfs(self.max_amplitude() as f64, self.params.full_scale())
    }

    /// Returns the root-mean-square amplitude.
    pub fn rms(&self) -> f64 {
        level::rms(&self.samples())
    }

    /// Returns the RMS level in dBFS, or `f64::NEG_INFINITY` for silence.
    pub fn average_level(&self) -> f64 {
        level::to_dbfs(self.rms(), self.params.full_scale())
    }

    /// Applies the gain that brings the peak to 0 dBFS. Silent and empty
    /// clips are returned unchanged.
    pub fn normalize(&self) -> PcmAudio {
        let peak = self.peak_level();
        if peak == f64::NEG_INFINITY {
            return self.clone();
        }
        self.gain(-peak)
    }
}

impl Default for PcmAudio {
    fn default() -> Self {
        Self::empty(Params::default())
    }
}

impl fmt::Debug for PcmAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcmAudio")
            .field("params", &self.params)
            .field("frames", &self.frames())
            .field("len_ms", &self.len_ms())
            .finish()
    }
}

impl fmt::Display for PcmAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PcmAudio({}, {} ms)", self.params, self.len_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono8k(samples: &[i32]) -> PcmAudio {
        PcmAudio::from_samples(Params::new(1, 2, 8000).unwrap(), samples).unwrap()
    }

    #[test]
    fn test_new_validates_buffer() {
        let err = PcmAudio::new(Params::MONO_16K, vec![0u8; 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidBuffer { len: 3, frame_size: 2 }));

        let err = PcmAudio::new(Params::STEREO_44K, vec![0u8; 6]).unwrap_err();
        assert!(matches!(err, Error::InvalidBuffer { len: 6, frame_size: 4 }));

        assert!(PcmAudio::new(Params::STEREO_44K, vec![0u8; 8]).is_ok());
    }

    #[test]
    fn test_silence() {
        let s = PcmAudio::silence(100, Params::MONO_16K);
        assert_eq!(s.data().len(), 3200);
        assert_eq!(s.len_ms(), 100);
        assert_eq!(s.duration(), Duration::from_millis(100));
        assert!(s.data().iter().all(|&b| b == 0));
        assert!(PcmAudio::silence(0, Params::MONO_16K).is_empty());
    }

    #[test]
    fn test_sine() {
        let tone = PcmAudio::sine(1000.0, 10, Params::STEREO_48K);
        assert_eq!(tone.frames(), 480);
        let samples = tone.samples();
        // both channels carry the same wave
        for frame in samples.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(samples[0], 0);
        // a quarter period in: the crest
        assert!(samples[12 * 2] >= i16::MAX as i32 - 1);
    }

    #[test]
    fn test_concat_same_params() {
        let a = mono8k(&[1, 2]);
        let b = mono8k(&[3]);
        assert_eq!(a.concat(&b).samples(), vec![1, 2, 3]);
    }

    #[test]
    fn test_concat_empty_is_identity() {
        let a = mono8k(&[1, 2]);
        let empty = PcmAudio::default();
        assert_eq!(a.concat(&empty), a);
        assert_eq!(empty.concat(&a), a);
    }

    #[test]
    fn test_concat_promotes() {
        let a = PcmAudio::from_samples(Params::new(1, 1, 8000).unwrap(), &[1]).unwrap();
        let b = PcmAudio::from_samples(Params::new(2, 2, 8000).unwrap(), &[5, 6]).unwrap();
        let c = a.concat(&b);
        assert_eq!(c.params(), Params::new(2, 2, 8000).unwrap());
        assert_eq!(c.samples(), vec![256, 256, 5, 6]);
    }

    #[test]
    fn test_repeat() {
        let a = mono8k(&[1, 2]);
        assert_eq!(a.repeat(2), a.concat(&a));
        assert!(a.repeat(0).is_empty());
        assert_eq!(a.repeat(0).params(), a.params());
    }

    #[test]
    fn test_gain() {
        let a = mono8k(&[1000, -1000, 0]);
        let louder = a.gain(6.0206);
        assert_eq!(louder.samples(), vec![2000, -2000, 0]);
        assert_eq!(a.gain(f64::NEG_INFINITY).samples(), vec![0, 0, 0]);
        assert_eq!(a.gain(0.0), a);
    }

    #[test]
    fn test_gain_saturates() {
        let a = mono8k(&[20000, -20000]);
        assert_eq!(a.gain(12.0).samples(), vec![32767, -32767]);
        assert_eq!(a.gain(f64::INFINITY).samples(), vec![32767, -32767]);
    }

    #[test]
    fn test_overlay() {
        let a = mono8k(&[100, 200, 300]);
        let b = mono8k(&[1, 2]);
        assert_eq!(a.overlay(&b).samples(), vec![101, 202]);
        assert_eq!(a.overlay(&b), b.overlay(&a));
    }

    #[test]
    fn test_overlay_saturates() {
        let a = mono8k(&[30000, -30000]);
        assert_eq!(a.overlay(&a).samples(), vec![32767, -32767]);
    }

    #[test]
    fn test_invert() {
        let a = mono8k(&[5, -7, 0, -32768]);
        assert_eq!(a.invert().samples(), vec![-5, 7, 0, 32767]);
        let cancelled = mono8k(&[5, -7, 32767]).overlay(&mono8k(&[5, -7, 32767]).invert());
        assert_eq!(cancelled.peak_level(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_saturated_results_cancel() {
        let a = mono8k(&[30000, -30000, 20000, -20000]);
        for clip in [a.gain(12.0), a.overlay(&a), a.gain(-6.0).normalize()] {
            assert!(!clip.samples().contains(&(i16::MIN as i32)));
            assert_eq!(clip.overlay(&clip.invert()).peak_level(), f64::NEG_INFINITY);
        }
    }

    #[test]
    fn test_mono_stereo() {
        let a = mono8k(&[1, 2, 3]);
        let stereo = a.to_stereo(None);
        assert_eq!(stereo.params().channels(), 2);
        assert_eq!(stereo.samples(), vec![1, 1, 2, 2, 3, 3]);
        assert_eq!(stereo.to_mono(), a);

        let b = mono8k(&[7, 8]);
        let pair = a.to_stereo(Some(&b));
        assert_eq!(pair.samples(), vec![1, 7, 2, 8]);
    }

    #[test]
    fn test_levels() {
        let silence = PcmAudio::silence(10, Params::MONO_16K);
        assert_eq!(silence.peak_level(), f64::NEG_INFINITY);
        assert_eq!(silence.average_level(), f64::NEG_INFINITY);
        assert_eq!(PcmAudio::default().peak_level(), f64::NEG_INFINITY);

        let half = mono8k(&[16384, -16384]);
        assert!((half.peak_level() + 6.0206).abs() < 1e-3);
        assert!((half.average_level() + 6.0206).abs() < 1e-3);
        assert_eq!(half.max_amplitude(), 16384);
    }

    #[test]
    fn test_normalize() {
        let a = mono8k(&[8192, -4096]);
        let n = a.normalize();
        assert!(n.peak_level().abs() < 0.01);
        assert_eq!(n.samples(), vec![32767, -16384]);

        let silence = PcmAudio::silence(10, Params::MONO_16K);
        assert_eq!(silence.normalize(), silence);
    }

    #[test]
    fn test_display() {
        let s = PcmAudio::silence(250, Params::MONO_16K);
        assert_eq!(s.to_string(), "PcmAudio(1ch/16bit/16000Hz, 250 ms)");
        assert!(format!("{s:?}").contains("frames: 4000"));
    }
}
