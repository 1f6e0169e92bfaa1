//! Signal level measurement on a logarithmic scale.
//!
//! Levels are in dBFS: 0 dB is the magnitude of the most negative sample
//! of the width, so every real signal measures at or below 0 dB. Silence and
//! empty input measure exactly `f64::NEG_INFINITY`.

/// Returns the largest absolute sample value.
pub fn max_amplitude(samples: &[i32]) -> u32 {
    samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
}

/// Returns the root-mean-square amplitude.
pub fn rms(samples: &[i32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt()
}

/// Converts an amplitude to dB relative to `full_scale`.
pub fn to_dbfs(amplitude: f64, full_scale: f64) -> f64 {
    if amplitude <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (amplitude / full_scale).log10()
}

/// Converts a gain in dB to a linear amplitude factor.
pub fn db_to_factor(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}
