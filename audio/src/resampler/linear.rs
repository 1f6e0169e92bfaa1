//! Linear-interpolation resampler.

/// Stretches each channel to `target` frames by linear interpolation
/// between neighbouring input frames.
pub fn resample_linear(channels: &[Vec<f64>], target: usize) -> Vec<Vec<f64>> {
    channels
        .iter()
        .map(|ch| stretch(ch, target))
        .collect()
}

fn stretch(input: &[f64], target: usize) -> Vec<f64> {
    let n = input.len();
    if n == 0 || target == 0 {
        return vec![0.0; target];
    }
    if n == 1 {
        return vec![input[0]; target];
    }

    let step = n as f64 / target as f64;
    (0..target)
        .map(|j| {
            let x = j as f64 * step;
            let i = (x.floor() as usize).min(n - 1);
            let next = (i + 1).min(n - 1);
            let frac = x - i as f64;
            input[i] + (input[next] - input[i]) * frac
        })
        .collect()
}
