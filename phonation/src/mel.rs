//! Mel scale and triangular filterbank.
//!
//! Uses the `550 ln(1 + f / 550)` mel scale. Filters are triangles in the mel
//! domain whose half-width equals the spacing between filter centres.

/// Converts frequency in Hz to mel.
pub fn hz_to_mel(hz: f64) -> f64 {
    550.0 * (1.0 + hz / 550.0).ln()
}

/// Converts mel back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    550.0 * ((mel / 550.0).exp() - 1.0)
}

/// Creates the filterbank matrix `[num_filters][fft_size / 2 + 1]`.
///
/// Filter centres start at `first_mel` and step by `spacing_mel`; the last
/// filter's upper edge stays at or below `max_mel`, which is itself clamped to
/// the Nyquist frequency.
pub fn mel_filter_bank(
    first_mel: f64,
    spacing_mel: f64,
    max_mel: f64,
    fft_size: usize,
    sample_rate: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let top = max_mel.min(hz_to_mel(sample_rate / 2.0));
    if spacing_mel <= 0.0 || first_mel + spacing_mel > top {
        return Vec::new();
    }
    let num_filters = ((top - spacing_mel - first_mel) / spacing_mel).floor() as usize + 1;

    let bin_mels: Vec<f64> = (0..half_fft)
        .map(|k| hz_to_mel(k as f64 * sample_rate / fft_size as f64))
        .collect();

    (0..num_filters)
        .map(|j| {
            let centre = first_mel + j as f64 * spacing_mel;
            bin_mels
                .iter()
                .map(|&m| (1.0 - (m - centre).abs() / spacing_mel).max(0.0))
                .collect()
        })
        .collect()
}
