//! The 17-value voice feature vector and its extractor.

use std::fmt;
use std::path::Path;

use parkvoice_audio::Sound;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::FeatureError;
use crate::harmonicity::{Harmonicity, HarmonicityConfig};
use crate::mfcc::{Mfcc, MfccConfig};
use crate::pitch::{Pitch, PitchConfig};

/// Number of values in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 17;

/// Feature names in vector order. Classifier artifacts are trained on this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "mfcc_1", "mfcc_2", "mfcc_3", "mfcc_4", "mfcc_5", "mfcc_6", "mfcc_7", "mfcc_8", "mfcc_9",
    "mfcc_10", "mfcc_11", "mfcc_12", "mfcc_13", "hnr", "pitch_mean", "pitch_min", "pitch_max",
];

const NUM_MFCC: usize = 13;
const HNR: usize = 13;
const PITCH_MEAN: usize = 14;
const PITCH_MIN: usize = 15;
const PITCH_MAX: usize = 16;

/// An ordered, finite feature vector: 13 mean MFCCs, mean HNR (dB) and
/// mean/min/max pitch (Hz).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wraps `values`, rejecting NaN and infinities.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self, FeatureError> {
        for (name, &value) in FEATURE_NAMES.iter().zip(&values) {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite { name, value });
            }
        }
        Ok(Self(values))
    }

    /// Builds a vector from a slice that must hold exactly [`FEATURE_COUNT`] values.
    pub fn from_slice(values: &[f64]) -> Result<Self, FeatureError> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| FeatureError::Length {
                expected: FEATURE_COUNT,
                got: values.len(),
            })?;
        Self::new(array)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.0[i])
    }

    /// `(name, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn mfcc(&self) -> &[f64] {
        &self.0[..NUM_MFCC]
    }

    pub fn hnr(&self) -> f64 {
        self.0[HNR]
    }

    pub fn pitch_mean(&self) -> f64 {
        self.0[PITCH_MEAN]
    }

    pub fn pitch_min(&self) -> f64 {
        self.0[PITCH_MIN]
    }

    pub fn pitch_max(&self) -> f64 {
        self.0[PITCH_MAX]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.named() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.named().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name:>10}: {value:.4}")?;
        }
        Ok(())
    }
}

/// Analysis parameters. The defaults reproduce the parameters the shipped
/// classifiers were trained with; change them only together with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Shortest accepted recording in seconds (default: 0.5).
    pub min_duration: f64,
    pub pitch: PitchConfig,
    pub harmonicity: HarmonicityConfig,
    pub mfcc: MfccConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_duration: 0.5,
            pitch: PitchConfig::default(),
            harmonicity: HarmonicityConfig::default(),
            mfcc: MfccConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Rejects parameters the analyses cannot run with.
    pub fn validate(&self) -> Result<(), FeatureError> {
        let (pitch, hnr, mfcc) = (&self.pitch, &self.harmonicity, &self.mfcc);
        let checks = [
            (self.min_duration >= 0.0, "min_duration must be >= 0"),
            (pitch.floor > 0.0, "pitch.floor must be > 0"),
            (pitch.ceiling > pitch.floor, "pitch.ceiling must exceed pitch.floor"),
            (pitch.periods_per_window > 0.0, "pitch.periods_per_window must be > 0"),
            (pitch.time_step >= 0.0, "pitch.time_step must be >= 0"),
            (pitch.max_candidates >= 2, "pitch.max_candidates must be >= 2"),
            (hnr.min_pitch > 0.0, "harmonicity.min_pitch must be > 0"),
            (hnr.time_step > 0.0, "harmonicity.time_step must be > 0"),
            (hnr.periods_per_window > 0.0, "harmonicity.periods_per_window must be > 0"),
            (mfcc.window_length > 0.0, "mfcc.window_length must be > 0"),
            (mfcc.time_step > 0.0, "mfcc.time_step must be > 0"),
            (mfcc.filter_spacing_mel > 0.0, "mfcc.filter_spacing_mel must be > 0"),
            (mfcc.num_coefficients == NUM_MFCC, "mfcc.num_coefficients must be 13"),
        ];
        // NaN fails every comparison above, so it is rejected too.
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, msg)) => Err(FeatureError::InvalidConfig((*msg).to_string())),
            None => Ok(()),
        }
    }
}

/// Turns a recording into a [`FeatureVector`].
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    cfg: AnalysisConfig,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl FeatureExtractor {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Decodes a WAV file and extracts its features.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<FeatureVector, FeatureError> {
        let sound = Sound::from_wav_file(path)?;
        self.extract(&sound)
    }

    /// Extracts features from decoded audio.
    ///
    /// Checks, in order: minimum duration, at least one voiced pitch frame,
    /// at least one MFCC frame.
    pub fn extract(&self, sound: &Sound) -> Result<FeatureVector, FeatureError> {
        let cfg = &self.cfg;
        cfg.validate()?;
        let duration = sound.duration();
        if duration < cfg.min_duration {
            return Err(FeatureError::TooShort {
                duration,
                min: cfg.min_duration,
            });
        }

        let pitch = Pitch::from_sound(sound, &cfg.pitch);
        let voiced = pitch.count_voiced_frames();
        if voiced == 0 {
            return Err(FeatureError::NoVoicedFrames);
        }

        let harmonicity = Harmonicity::from_sound(sound, &cfg.harmonicity);

        let mfcc = Mfcc::from_sound(sound, &cfg.mfcc);
        if mfcc.num_frames() == 0 {
            return Err(FeatureError::NoMfccFrames);
        }
        let means = mfcc.means();
        if means.len() != NUM_MFCC {
            return Err(FeatureError::Length {
                expected: NUM_MFCC,
                got: means.len(),
            });
        }

        debug!(
            duration,
            sample_rate = sound.sample_rate(),
            pitch_frames = pitch.num_frames(),
            voiced,
            mfcc_frames = mfcc.num_frames(),
            "analysed recording"
        );

        let mut values = [0.0f64; FEATURE_COUNT];
        values[..NUM_MFCC].copy_from_slice(&means);
        values[HNR] = harmonicity.mean().ok_or(FeatureError::Undefined("hnr"))?;
        values[PITCH_MEAN] = pitch.mean().ok_or(FeatureError::Undefined("pitch_mean"))?;
        values[PITCH_MIN] = pitch.minimum().ok_or(FeatureError::Undefined("pitch_min"))?;
        values[PITCH_MAX] = pitch.maximum().ok_or(FeatureError::Undefined("pitch_max"))?;
        FeatureVector::new(values)
    }
}
