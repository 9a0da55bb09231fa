//! Mel-frequency cepstral coefficients.
//!
//! Per frame: Gaussian window, power spectrum, mel filterbank energies in dB,
//! then a DCT over the filter outputs. Coefficient 0 is not reported; the
//! returned coefficients are `c_1 ..= c_n`.

use std::f64::consts::PI;

use parkvoice_audio::{Sound, fft, window};
use serde::{Deserialize, Serialize};

use crate::frames::FrameGrid;
use crate::mel;

/// Reference power for the dB conversion of filter outputs.
const DB_REFERENCE: f64 = 4e-10;

/// Lowest filter output in dB.
const DB_FLOOR: f64 = -100.0;

/// Configures MFCC extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Number of cepstral coefficients (default: 13).
    pub num_coefficients: usize,
    /// Effective window length in seconds; the Gaussian spans twice this (default: 0.025).
    pub window_length: f64,
    /// Seconds between frames (default: 0.01).
    pub time_step: f64,
    /// Centre of the first filter in mel (default: 100).
    pub first_filter_mel: f64,
    /// Distance between filter centres in mel (default: 50).
    pub filter_spacing_mel: f64,
    /// Upper frequency limit in mel, clamped to Nyquist (default: 8000).
    pub max_mel: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            num_coefficients: 13,
            window_length: 0.025,
            time_step: 0.01,
            first_filter_mel: 100.0,
            filter_spacing_mel: 50.0,
            max_mel: 8000.0,
        }
    }
}

/// Cepstral coefficients per frame, `[num_frames][num_coefficients]`.
#[derive(Debug, Clone)]
pub struct Mfcc {
    frames: Vec<Vec<f64>>,
    num_coefficients: usize,
}

impl Mfcc {
    pub fn from_sound(sound: &Sound, cfg: &MfccConfig) -> Self {
        let fs = sound.sample_rate() as f64;
        let samples = sound.samples();
        let span = (2.0 * cfg.window_length * fs).round() as usize;
        let grid = FrameGrid::new(samples.len(), span, cfg.time_step * fs);

        let nfft = fft::next_pow2(span);
        let bank = mel::mel_filter_bank(
            cfg.first_filter_mel,
            cfg.filter_spacing_mel,
            cfg.max_mel,
            nfft,
            fs,
        );
        if bank.is_empty() {
            return Self {
                frames: Vec::new(),
                num_coefficients: cfg.num_coefficients,
            };
        }

        let gauss = window::gaussian(span);
        let dx2 = 1.0 / (fs * fs);
        let mut frame = vec![0.0f64; span];
        let mut frames = Vec::with_capacity(grid.count());
        let mut energies = vec![0.0f64; bank.len()];

        for i in 0..grid.count() {
            let start = grid.start(i);
            frame.copy_from_slice(&samples[start..start + span]);
            window::apply(&mut frame, &gauss);
            let power = fft::power_spectrum(&frame, nfft);

            for (e, filter) in energies.iter_mut().zip(&bank) {
                let p: f64 = filter.iter().zip(&power).map(|(w, p)| w * p * dx2).sum();
                *e = to_db(p);
            }
            frames.push(dct(&energies, cfg.num_coefficients));
        }

        Self {
            frames,
            num_coefficients: cfg.num_coefficients,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    /// Mean of each coefficient over all frames; empty when there are no frames.
    pub fn means(&self) -> Vec<f64> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        let n = self.frames.len() as f64;
        (0..self.num_coefficients)
            .map(|k| self.frames.iter().map(|f| f[k]).sum::<f64>() / n)
            .collect()
    }
}

fn to_db(power: f64) -> f64 {
    if power <= 0.0 {
        return DB_FLOOR;
    }
    (10.0 * (power / DB_REFERENCE).log10()).max(DB_FLOOR)
}

/// `c_k = sum_j P_j cos(pi k (j + 0.5) / N)` for `k = 1..=n`.
fn dct(energies: &[f64], n: usize) -> Vec<f64> {
    let num_filters = energies.len() as f64;
    (1..=n)
        .map(|k| {
            energies
                .iter()
                .enumerate()
                .map(|(j, &p)| p * (PI * k as f64 * (j as f64 + 0.5) / num_filters).cos())
                .sum()
        })
        .collect()
}
