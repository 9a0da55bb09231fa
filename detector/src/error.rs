use parkvoice_audio::AudioError;
use parkvoice_phonation::FeatureError;
use thiserror::Error;

/// Why a prediction could not be made.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("classifier returned unknown class {0}")]
    UnknownClass(i64),
}

impl PredictError {
    /// True when the recording itself is unusable (too short, unvoiced, no frames).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Features(e) if e.is_validation())
    }
}
