//! Analysis windows.
//!
//! Windows are sampled at bin centres (`(i + 0.5) / n`), so neither end is
//! exactly zero and the shape is symmetric.

use std::f64::consts::PI;

/// Hanning (raised cosine) window of length `n`.
pub fn hanning(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * (i as f64 + 0.5) / n as f64).cos())
        .collect()
}

/// Gaussian window of length `n`, normalised to 0 at the edges and 1 in the
/// middle. Its effective length is about half of `n`.
pub fn gaussian(n: usize) -> Vec<f64> {
    let edge = (-12.0f64).exp();
    (0..n)
        .map(|i| {
            let x = (i as f64 + 0.5) / n as f64 - 0.5;
            ((-48.0 * x * x).exp() - edge) / (1.0 - edge)
        })
        .collect()
}

/// Applies `window` to `frame` in place.
pub fn apply(frame: &mut [f64], window: &[f64]) {
    for (s, w) in frame.iter_mut().zip(window) {
        *s *= w;
    }
}
