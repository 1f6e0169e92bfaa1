//! Time-domain slicing and amplitude envelopes.

use std::ops::{Bound, RangeBounds};

use super::audio::PcmAudio;
use super::sample;

impl PcmAudio {
    /// Returns the part of the clip inside a millisecond range.
    ///
    /// Negative positions count back from the end of the clip. Positions
    /// are clamped to the clip, and an empty or inverted range yields a
    /// zero-length clip. The descriptor never changes.
    ///
    /// ```rust
    /// use poordub_audio::pcm::{Params, PcmAudio};
    ///
    /// let clip = PcmAudio::silence(1000, Params::MONO_16K);
    /// assert_eq!(clip.slice(..500).len_ms(), 500);
    /// assert_eq!(clip.slice(-500..).len_ms(), 500);
    /// assert_eq!(clip.slice(100..600).len_ms(), 500);
    /// assert_eq!(clip.slice(-100..-200).len_ms(), 0);
    /// ```
    pub fn slice(&self, range: impl RangeBounds<i64>) -> PcmAudio {
        let start = match range.start_bound() {
            Bound::Included(&s) => Some(s),
            Bound::Excluded(&s) => Some(s.saturating_add(1)),
            Bound::Unbounded => None,
        };
        let end = match range.end_bound() {
            // `..=-1` reaches the end of the clip
            Bound::Included(&-1) => None,
            Bound::Included(&e) => Some(e.saturating_add(1)),
            Bound::Excluded(&e) => Some(e),
            Bound::Unbounded => None,
        };
        self.slice_ms(start, end)
    }

    /// Same as [`slice`](Self::slice) with optional bounds; `None` means the
    /// start or the end of the clip.
    pub fn slice_ms(&self, start: Option<i64>, end: Option<i64>) -> PcmAudio {
        let frames = self.frames();
        let start = start.map_or(0, |ms| self.resolve_frame(ms));
        let end = end.map_or(frames, |ms| self.resolve_frame(ms));
        if start >= end {
            return PcmAudio::empty(self.params());
        }
        let fs = self.params().frame_size();
        PcmAudio::from_parts(self.params(), self.data()[start * fs..end * fs].to_vec())
    }

    /// Returns the first `ms` milliseconds.
    pub fn head(&self, ms: u64) -> PcmAudio {
        self.slice_ms(None, Some(i64::try_from(ms).unwrap_or(i64::MAX)))
    }

    /// Returns the last `ms` milliseconds.
    pub fn tail(&self, ms: u64) -> PcmAudio {
        if ms == 0 {
            return PcmAudio::empty(self.params());
        }
        self.slice_ms(Some(-i64::try_from(ms).unwrap_or(i64::MAX)), None)
    }

    fn resolve_frame(&self, ms: i64) -> usize {
        let frames = self.frames();
        let offset = self.params().frames_in(ms.unsigned_abs()).min(frames);
        if ms < 0 { frames - offset } else { offset }
    }

    /// Ramps the first `duration_ms` milliseconds up from silence.
    ///
    /// A window longer than the clip covers the whole clip.
    pub fn fade_in(&self, duration_ms: u64) -> PcmAudio {
        let window = self.params().frames_in(duration_ms).min(self.frames());
        self.envelope(|frame| {
            (frame < window).then(|| frame as f64 / window as f64)
        })
    }

    /// Ramps the last `duration_ms` milliseconds down to silence.
    ///
    /// The ramp is the time-reverse of [`fade_in`](Self::fade_in): the last
    /// frame is silent and the first frame of the window is already scaled
    /// by `(window - 1) / window`. A window longer than the clip covers the
    /// whole clip.
    pub fn fade_out(&self, duration_ms: u64) -> PcmAudio {
        let frames = self.frames();
        let window = self.params().frames_in(duration_ms).min(frames);
        let start = frames - window;
        self.envelope(|frame| {
            (frame >= start).then(|| (frames - 1 - frame) as f64 / window as f64)
        })
    }

    /// Blends the last `duration_ms` of this clip into the first
    /// `duration_ms` of `next`, keeping both remainders around it.
    pub fn cross_fade(&self, next: &PcmAudio, duration_ms: u64) -> PcmAudio {
        if duration_ms == 0 {
            return self.concat(next);
        }
        let d = i64::try_from(duration_ms).unwrap_or(i64::MAX);
        let blend = self
            .slice(-d..)
            .fade_out(duration_ms)
            .overlay(&next.slice(..d).fade_in(duration_ms));

        self.slice(..-d)
            .concat(&blend)
            .concat(&next.slice(d..))
    }

    /// Multiplies every sample of frame `i` by `gain(i)`; frames for which
    /// it returns `None` are kept as-is.
    fn envelope(&self, gain: impl Fn(usize) -> Option<f64>) -> PcmAudio {
        let params = self.params();
        let width = params.sample_width();
        let channels = params.channels() as usize;

        let mut samples = self.samples();
        for (i, frame) in samples.chunks_exact_mut(channels).enumerate() {
            if let Some(g) = gain(i) {
                for s in frame {
                    *s = sample::quantize(*s as f64 * g, width);
                }
            }
        }
        PcmAudio::from_parts(params, sample::encode(&samples, width))
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use crate::pcm::{Params, PcmAudio};

    fn ramp(n: i32) -> PcmAudio {
        // 1 frame per millisecond makes the arithmetic obvious
        let params = Params::new(1, 2, 1000).unwrap();
        let samples: Vec<i32> = (0..n).collect();
        PcmAudio::from_samples(params, &samples).unwrap()
    }

    #[test]
    fn test_slice_positive() {
        let a = ramp(10);
        assert_eq!(a.slice(2..5).samples(), vec![2, 3, 4]);
        assert_eq!(a.slice(..3).samples(), vec![0, 1, 2]);
        assert_eq!(a.slice(8..).samples(), vec![8, 9]);
        assert_eq!(a.slice(..), a);
        assert_eq!(a.slice(2..=4).samples(), vec![2, 3, 4]);
    }

    #[test]
    fn test_slice_negative() {
        let a = ramp(10);
        assert_eq!(a.slice(-3..).samples(), vec![7, 8, 9]);
        assert_eq!(a.slice(..-7).samples(), vec![0, 1, 2]);
        assert_eq!(a.slice(-4..-2).samples(), vec![6, 7]);
        assert_eq!(a.slice(-2..=-1).samples(), vec![8, 9]);
    }

    #[test]
    fn test_slice_clamps() {
        let a = ramp(10);
        assert_eq!(a.slice(-100..3).samples(), vec![0, 1, 2]);
        assert_eq!(a.slice(5..100).samples(), vec![5, 6, 7, 8, 9]);
        assert!(a.slice(20..30).is_empty());
    }

    #[test]
    fn test_slice_inverted_is_empty() {
        let a = ramp(10);
        let s = a.slice(-1..-2);
        assert!(s.is_empty());
        assert_eq!(s.params(), a.params());
        assert!(a.slice(4..4).is_empty());
    }

    #[test]
    fn test_slice_extreme_bounds() {
        let a = ramp(10);
        assert_eq!(a.slice(..=i64::MAX), a);
        assert_eq!(a.slice(i64::MIN..=i64::MAX), a);
        assert_eq!(a.slice(i64::MIN..), a);
        assert!(a.slice((Bound::Excluded(i64::MAX), Bound::Unbounded)).is_empty());
        assert_eq!(a.head(u64::MAX), a);
        assert_eq!(a.tail(u64::MAX), a);
    }

    #[test]
    fn test_head_tail() {
        let a = ramp(10);
        assert_eq!(a.head(2).samples(), vec![0, 1]);
        assert_eq!(a.tail(2).samples(), vec![8, 9]);
        assert!(a.tail(0).is_empty());
        assert_eq!(a.tail(50), a);
    }

    #[test]
    fn test_fade_in() {
        let a = PcmAudio::from_samples(Params::new(1, 2, 1000).unwrap(), &[100; 6]).unwrap();
        assert_eq!(a.fade_in(4).samples(), vec![0, 25, 50, 75, 100, 100]);
    }

    #[test]
    fn test_fade_out() {
        let a = PcmAudio::from_samples(Params::new(1, 2, 1000).unwrap(), &[100; 6]).unwrap();
        assert_eq!(a.fade_out(4).samples(), vec![100, 100, 75, 50, 25, 0]);
    }

    #[test]
    fn test_fade_out_mirrors_fade_in() {
        let params = Params::new(1, 2, 1000).unwrap();
        let samples: Vec<i32> = (1..=8).map(|i| i * 100).collect();
        let reversed: Vec<i32> = samples.iter().rev().copied().collect();
        let a = PcmAudio::from_samples(params, &samples).unwrap();
        let b = PcmAudio::from_samples(params, &reversed).unwrap();

        let mut out = a.fade_out(5).samples();
        out.reverse();
        assert_eq!(out, b.fade_in(5).samples());
    }

    #[test]
    fn test_fade_longer_than_clip() {
        let a = PcmAudio::from_samples(Params::new(1, 2, 1000).unwrap(), &[100; 4]).unwrap();
        assert_eq!(a.fade_in(1000).samples(), vec![0, 25, 50, 75]);
        assert_eq!(a.fade_out(1000).samples(), vec![75, 50, 25, 0]);
    }

    #[test]
    fn test_fade_stereo_frames() {
        let a = PcmAudio::from_samples(Params::new(2, 2, 1000).unwrap(), &[100, -100, 100, -100]).unwrap();
        assert_eq!(a.fade_in(2).samples(), vec![0, 0, 50, -50]);
    }

    #[test]
    fn test_cross_fade() {
        let params = Params::new(1, 2, 1000).unwrap();
        let a = PcmAudio::from_samples(params, &[100; 6]).unwrap();
        let b = PcmAudio::from_samples(params, &[200; 6]).unwrap();

        let c = a.cross_fade(&b, 2);
        assert_eq!(c.frames(), 10);
        // 4 untouched frames of a, 2 blended (50+0, 0+100), 4 of b
        assert_eq!(
            c.samples(),
            vec![100, 100, 100, 100, 50, 100, 200, 200, 200, 200]
        );
    }

    #[test]
    fn test_cross_fade_huge_duration_clamps() {
        let params = Params::new(1, 2, 1000).unwrap();
        let a = PcmAudio::from_samples(params, &[100; 6]).unwrap();
        let b = PcmAudio::from_samples(params, &[200; 4]).unwrap();
        assert_eq!(a.cross_fade(&b, u64::MAX), a.cross_fade(&b, 10_000));
        assert_eq!(a.cross_fade(&b, u64::MAX).frames(), 4);
    }

    #[test]
    fn test_cross_fade_zero_is_concat() {
        let a = ramp(3);
        let b = ramp(2);
        assert_eq!(a.cross_fade(&b, 0), a.concat(&b));
    }
}
