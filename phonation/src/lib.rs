//! Acoustic voice features for sustained-vowel recordings.
//!
//! # Pipeline
//!
//! [`FeatureExtractor::extract`] runs three analyses over a [`Sound`]:
//!
//! 1. [`Pitch`]: autocorrelation pitch tracking with a Viterbi path over
//!    per-frame candidates -> mean, minimum and maximum pitch
//! 2. [`Harmonicity`]: cross-correlation harmonics-to-noise ratio -> mean HNR
//! 3. [`Mfcc`]: 13 mel-frequency cepstral coefficients -> per-coefficient mean
//!
//! and packs the results into a [`FeatureVector`] ordered as [`FEATURE_NAMES`].
//!
//! # Example
//!
//! ```no_run
//! use parkvoice_phonation::FeatureExtractor;
//!
//! let features = FeatureExtractor::default().extract_file("ahhh.wav").unwrap();
//! println!("mean pitch: {:.1} Hz", features.pitch_mean());
//! ```
//!
//! [`Sound`]: parkvoice_audio::Sound

mod error;
mod features;
mod frames;
pub mod harmonicity;
pub mod mel;
pub mod mfcc;
mod periodicity;
pub mod pitch;
#[cfg(test)]
mod testutil;

pub use error::FeatureError;
pub use features::{AnalysisConfig, FEATURE_COUNT, FEATURE_NAMES, FeatureExtractor, FeatureVector};
pub use harmonicity::{Harmonicity, HarmonicityConfig};
pub use mfcc::{Mfcc, MfccConfig};
pub use pitch::{Pitch, PitchConfig};
