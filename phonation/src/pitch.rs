//! Pitch contour by the autocorrelation method.

use parkvoice_audio::Sound;
use serde::{Deserialize, Serialize};

use crate::periodicity::{self, Method, Params};

/// Configures pitch analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Seconds between frames; 0 picks `0.75 / floor` (default: 0).
    pub time_step: f64,
    /// Lowest detectable pitch in Hz (default: 75).
    pub floor: f64,
    /// Highest detectable pitch in Hz (default: 600).
    pub ceiling: f64,
    /// Candidates kept per frame, including the unvoiced one (default: 15).
    pub max_candidates: usize,
    /// Window length in periods of the floor pitch (default: 3).
    pub periods_per_window: f64,
    /// Frames quieter than this fraction of the global peak lean unvoiced (default: 0.03).
    pub silence_threshold: f64,
    /// Minimum correlation for a frame to count as voiced (default: 0.45).
    pub voicing_threshold: f64,
    /// Preference for higher frequencies, per octave (default: 0.01).
    pub octave_cost: f64,
    /// Path cost of an octave jump between frames (default: 0.35).
    pub octave_jump_cost: f64,
    /// Path cost of a voiced/unvoiced switch (default: 0.14).
    pub voiced_unvoiced_cost: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            time_step: 0.0,
            floor: 75.0,
            ceiling: 600.0,
            max_candidates: 15,
            periods_per_window: 3.0,
            silence_threshold: 0.03,
            voicing_threshold: 0.45,
            octave_cost: 0.01,
            octave_jump_cost: 0.35,
            voiced_unvoiced_cost: 0.14,
        }
    }
}

impl PitchConfig {
    fn params(&self) -> Params {
        Params {
            method: Method::Autocorrelation,
            time_step: if self.time_step > 0.0 {
                self.time_step
            } else {
                0.75 / self.floor
            },
            min_pitch: self.floor,
            max_pitch: self.ceiling,
            periods_per_window: self.periods_per_window,
            max_candidates: self.max_candidates,
            silence_threshold: self.silence_threshold,
            voicing_threshold: self.voicing_threshold,
            octave_cost: self.octave_cost,
            octave_jump_cost: self.octave_jump_cost,
            voiced_unvoiced_cost: self.voiced_unvoiced_cost,
        }
    }
}

/// A pitch contour: one frequency per frame, 0 where the frame is unvoiced.
#[derive(Debug, Clone)]
pub struct Pitch {
    times: Vec<f64>,
    frequencies: Vec<f64>,
}

impl Pitch {
    /// Tracks the pitch of `sound`.
    pub fn from_sound(sound: &Sound, cfg: &PitchConfig) -> Self {
        let track = periodicity::analyze(sound, &cfg.params());
        Self {
            times: track.times,
            frequencies: track.path.iter().map(|c| c.frequency).collect(),
        }
    }

    /// Frame centre times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Per-frame frequency in Hz (0 = unvoiced).
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn num_frames(&self) -> usize {
        self.frequencies.len()
    }

    pub fn count_voiced_frames(&self) -> usize {
        self.voiced().count()
    }

    /// Mean frequency over voiced frames, in Hz.
    pub fn mean(&self) -> Option<f64> {
        let n = self.count_voiced_frames();
        if n == 0 {
            return None;
        }
        Some(self.voiced().sum::<f64>() / n as f64)
    }

    /// Lowest frequency, refined by parabolic interpolation around local minima.
    pub fn minimum(&self) -> Option<f64> {
        self.extremum(-1.0)
    }

    /// Highest frequency, refined by parabolic interpolation around local maxima.
    pub fn maximum(&self) -> Option<f64> {
        self.extremum(1.0)
    }

    fn voiced(&self) -> impl Iterator<Item = f64> + '_ {
        self.frequencies.iter().copied().filter(|&f| f > 0.0)
    }

    /// Maximum of `sign * f`; interior peaks whose neighbours are both voiced
    /// are replaced by the vertex of the parabola through the three frames.
    fn extremum(&self, sign: f64) -> Option<f64> {
        let f = &self.frequencies;
        let mut best: Option<f64> = None;
        for i in 0..f.len() {
            if f[i] <= 0.0 {
                continue;
            }
            let mut value = sign * f[i];
            if i > 0 && i + 1 < f.len() && f[i - 1] > 0.0 && f[i + 1] > 0.0 {
                let (l, c, r) = (sign * f[i - 1], value, sign * f[i + 1]);
                let curvature = l + r - 2.0 * c;
                if c > l && c >= r && curvature < 0.0 {
                    value = c - (r - l) * (r - l) / (8.0 * curvature);
                }
            }
            best = Some(best.map_or(value, |b| b.max(value)));
        }
        best.map(|v| sign * v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{harmonic_tone, silence};

    fn contour(frequencies: Vec<f64>) -> Pitch {
        Pitch {
            times: (0..frequencies.len()).map(|i| i as f64 * 0.01).collect(),
            frequencies,
        }
    }

    #[test]
    fn test_tracks_harmonic_tone() {
        let sound = harmonic_tone(160.0, 1.0, 16000);
        let pitch = Pitch::from_sound(&sound, &PitchConfig::default());

        // (16000 - 640) / 160 + 1
        assert_eq!(pitch.num_frames(), 97);
        assert!(pitch.count_voiced_frames() > 90, "{}", pitch.count_voiced_frames());

        let mean = pitch.mean().unwrap();
        assert!((mean - 160.0).abs() < 2.0, "mean {}", mean);
        let min = pitch.minimum().unwrap();
        let max = pitch.maximum().unwrap();
        assert!(min <= mean && mean <= max);
        assert!((min - 160.0).abs() < 3.0 && (max - 160.0).abs() < 3.0, "{} {}", min, max);
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let pitch = Pitch::from_sound(&silence(1.0, 16000), &PitchConfig::default());
        assert!(pitch.num_frames() > 0);
        assert_eq!(pitch.count_voiced_frames(), 0);
        assert_eq!(pitch.mean(), None);
        assert_eq!(pitch.minimum(), None);
        assert_eq!(pitch.maximum(), None);
    }

    #[test]
    fn test_time_step_defaults_to_three_quarters_of_floor_period() {
        let params = PitchConfig::default().params();
        assert!((params.time_step - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_parabolic_extrema() {
        let pitch = contour(vec![0.0, 100.0, 110.0, 100.0, 0.0, 90.0]);
        // Symmetric peak: vertex sits on the middle sample.
        assert!((pitch.maximum().unwrap() - 110.0).abs() < 1e-9);
        // 90 is isolated, so no interpolation.
        assert!((pitch.minimum().unwrap() - 90.0).abs() < 1e-9);

        let skewed = contour(vec![100.0, 120.0, 110.0]);
        let max = skewed.maximum().unwrap();
        assert!(max > 120.0 && max < 121.0, "{}", max);
        assert!((skewed.mean().unwrap() - 110.0).abs() < 1e-9);
    }
}
