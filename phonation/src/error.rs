use parkvoice_audio::AudioError;
use thiserror::Error;

/// Errors returned by feature extraction.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Audio too short: {duration:.2}s, need at least {min:.2}s")]
    TooShort { duration: f64, min: f64 },

    #[error("No voiced frames found")]
    NoVoicedFrames,

    #[error("No MFCC frames extracted")]
    NoMfccFrames,

    #[error("{0} is undefined for this recording")]
    Undefined(&'static str),

    #[error("{name} is not finite: {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("feature vector needs {expected} values, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl FeatureError {
    /// True for problems with the recording itself (too short, unvoiced,
    /// no analysis frames), as opposed to decoding or numeric failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TooShort { .. } | Self::NoVoicedFrames | Self::NoMfccFrames
        )
    }
}
