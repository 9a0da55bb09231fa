//! Harmonics-to-noise ratio by the forward cross-correlation method.

use parkvoice_audio::Sound;
use serde::{Deserialize, Serialize};

use crate::periodicity::{self, Method, Params};

/// Value assigned to frames without a usable period.
pub const UNDEFINED_DB: f64 = -200.0;

/// Upper bound of the per-frame ratio, reached when correlation saturates.
const MAX_DB: f64 = 150.0;

/// Configures harmonicity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicityConfig {
    /// Seconds between frames (default: 0.01).
    pub time_step: f64,
    /// Lowest periodicity considered, in Hz (default: 75).
    pub min_pitch: f64,
    /// Frames quieter than this fraction of the global peak are undefined (default: 0.1).
    pub silence_threshold: f64,
    /// Window length in periods of `min_pitch` (default: 1.0).
    pub periods_per_window: f64,
}

impl Default for HarmonicityConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            min_pitch: 75.0,
            silence_threshold: 0.1,
            periods_per_window: 1.0,
        }
    }
}

/// Per-frame harmonics-to-noise ratio in dB.
#[derive(Debug, Clone)]
pub struct Harmonicity {
    values: Vec<f64>,
}

impl Harmonicity {
    pub fn from_sound(sound: &Sound, cfg: &HarmonicityConfig) -> Self {
        let params = Params {
            method: Method::CrossCorrelation,
            time_step: cfg.time_step,
            min_pitch: cfg.min_pitch,
            max_pitch: sound.sample_rate() as f64 / 2.0,
            periods_per_window: cfg.periods_per_window,
            max_candidates: 15,
            silence_threshold: cfg.silence_threshold,
            voicing_threshold: 0.0,
            octave_cost: 0.0,
            octave_jump_cost: 0.0,
            voiced_unvoiced_cost: 0.0,
        };
        let track = periodicity::analyze(sound, &params);
        let values = track
            .path
            .iter()
            .map(|c| if c.is_voiced() { ratio_db(c.strength) } else { UNDEFINED_DB })
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean over frames that are not [`UNDEFINED_DB`].
    pub fn mean(&self) -> Option<f64> {
        let defined: Vec<f64> = self
            .values
            .iter()
            .copied()
            .filter(|&v| v != UNDEFINED_DB)
            .collect();
        if defined.is_empty() {
            return None;
        }
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Converts a normalized correlation into a harmonics-to-noise ratio.
fn ratio_db(r: f64) -> f64 {
    if r <= 1e-15 {
        UNDEFINED_DB
    } else if r > 1.0 - 1e-15 {
        MAX_DB
    } else {
        10.0 * (r / (1.0 - r)).log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{harmonic_tone, silence, with_noise};

    #[test]
    fn test_ratio_db() {
        assert!((ratio_db(0.5) - 0.0).abs() < 1e-12);
        assert!((ratio_db(0.99) - 19.956).abs() < 1e-3);
        assert_eq!(ratio_db(0.0), UNDEFINED_DB);
        assert_eq!(ratio_db(1.0), MAX_DB);
    }

    #[test]
    fn test_clean_tone_beats_noisy_tone() {
        let clean = harmonic_tone(160.0, 1.0, 16000);
        let noisy = with_noise(&clean, 0.3);
        let cfg = HarmonicityConfig::default();

        let clean_hnr = Harmonicity::from_sound(&clean, &cfg).mean().unwrap();
        let noisy_hnr = Harmonicity::from_sound(&noisy, &cfg).mean().unwrap();
        assert!(clean_hnr > 20.0, "clean {}", clean_hnr);
        assert!(noisy_hnr < clean_hnr, "noisy {} clean {}", noisy_hnr, clean_hnr);
    }

    #[test]
    fn test_silence_is_undefined() {
        let h = Harmonicity::from_sound(&silence(1.0, 16000), &HarmonicityConfig::default());
        assert!(!h.values().is_empty());
        assert!(h.values().iter().all(|&v| v == UNDEFINED_DB));
        assert_eq!(h.mean(), None);
    }

    #[test]
    fn test_mean_skips_undefined_frames() {
        let h = Harmonicity {
            values: vec![UNDEFINED_DB, 10.0, 20.0, UNDEFINED_DB],
        };
        assert_eq!(h.mean(), Some(15.0));
    }
}
