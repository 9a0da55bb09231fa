//! Radix-2 FFT and the spectra built on it.

use std::f64::consts::PI;

/// Returns the smallest power of two that is `>= n` (and at least 1).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// In-place forward FFT. `real` and `imag` must share a power-of-2 length.
pub fn fft(real: &mut [f64], imag: &mut [f64]) {
    transform(real, imag, false);
}

/// In-place inverse FFT, scaled by `1/n`.
pub fn ifft(real: &mut [f64], imag: &mut [f64]) {
    transform(real, imag, true);
    let scale = 1.0 / real.len().max(1) as f64;
    for v in real.iter_mut().chain(imag.iter_mut()) {
        *v *= scale;
    }
}

/// Power spectrum `|X_k|^2` for `k = 0..=nfft/2` of a zero-padded frame.
pub fn power_spectrum(frame: &[f64], nfft: usize) -> Vec<f64> {
    let (real, imag) = padded_spectrum(frame, nfft);
    (0..nfft / 2 + 1)
        .map(|k| real[k] * real[k] + imag[k] * imag[k])
        .collect()
}

/// Autocorrelation `r[0..max_lag]` (inclusive) of a frame, computed through
/// the power spectrum. `nfft` must be at least `frame.len() + max_lag` to
/// avoid circular wrap-around.
pub fn autocorrelation(frame: &[f64], nfft: usize, max_lag: usize) -> Vec<f64> {
    let (mut real, mut imag) = padded_spectrum(frame, nfft);
    for k in 0..nfft {
        real[k] = real[k] * real[k] + imag[k] * imag[k];
        imag[k] = 0.0;
    }
    ifft(&mut real, &mut imag);
    real.truncate((max_lag + 1).min(nfft));
    real
}

fn padded_spectrum(frame: &[f64], nfft: usize) -> (Vec<f64>, Vec<f64>) {
    debug_assert!(nfft.is_power_of_two(), "nfft must be a power of two");
    let mut real = vec![0.0f64; nfft];
    let n = frame.len().min(nfft);
    real[..n].copy_from_slice(&frame[..n]);
    let mut imag = vec![0.0f64; nfft];
    fft(&mut real, &mut imag);
    (real, imag)
}

fn transform(real: &mut [f64], imag: &mut [f64], inverse: bool) {
    let n = real.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 0..n - 1 {
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
        let mut k = n >> 1;
        while k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut size = 2;
    while size <= n {
        let half = size >> 1;
        let angle = sign * 2.0 * PI / size as f64;
        let (w_i, w_r) = angle.sin_cos();

        for start in (0..n).step_by(size) {
            let (mut t_r, mut t_i) = (1.0, 0.0);
            for k in 0..half {
                let u = start + k;
                let v = u + half;

                let tmp_r = t_r * real[v] - t_i * imag[v];
                let tmp_i = t_r * imag[v] + t_i * real[v];

                real[v] = real[u] - tmp_r;
                imag[v] = imag[u] - tmp_i;
                real[u] += tmp_r;
                imag[u] += tmp_i;

                (t_r, t_i) = (t_r * w_r - t_i * w_i, t_r * w_i + t_i * w_r);
            }
        }
        size <<= 1;
    }
}
