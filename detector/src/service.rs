use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use parkvoice_audio::Sound;
use parkvoice_model::ModelStore;
use parkvoice_phonation::{FeatureExtractor, FeatureVector};
use tracing::{debug, info, warn};

use crate::diagnosis::{Diagnosis, Label};
use crate::error::PredictError;

/// Runs recordings through feature extraction, scaling and classification.
///
/// Holds no mutable state, so one instance can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct PredictionService {
    store: Arc<ModelStore>,
    extractor: FeatureExtractor,
}

impl PredictionService {
    pub fn new(store: Arc<ModelStore>, extractor: FeatureExtractor) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Predicts from a WAV file on disk.
    pub fn predict_file(&self, path: impl AsRef<Path>) -> Result<Diagnosis, PredictError> {
        let path = path.as_ref();
        let outcome = Sound::from_wav_file(path)
            .map_err(PredictError::from)
            .and_then(|sound| self.predict_sound(&sound));
        log_outcome(&path.display().to_string(), &outcome);
        outcome
    }

    /// Predicts from the bytes of an uploaded WAV file.
    pub fn predict_wav_bytes(&self, data: &[u8]) -> Result<Diagnosis, PredictError> {
        let outcome = Sound::from_wav_bytes(data)
            .map_err(PredictError::from)
            .and_then(|sound| self.predict_sound(&sound));
        log_outcome("upload", &outcome);
        outcome
    }

    /// Predicts from decoded audio.
    pub fn predict_sound(&self, sound: &Sound) -> Result<Diagnosis, PredictError> {
        let start = Instant::now();
        let features = self.extractor.extract(sound)?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "extracted features");
        self.predict_features(&features)
    }

    /// Classifies an already extracted feature vector.
    pub fn predict_features(&self, features: &FeatureVector) -> Result<Diagnosis, PredictError> {
        let prediction = self.store.classify(features);
        let label =
            Label::from_class(prediction.class).ok_or(PredictError::UnknownClass(prediction.class))?;
        Ok(Diagnosis {
            label,
            confidence: prediction.probability,
            features: *features,
        })
    }
}

fn log_outcome(source: &str, outcome: &Result<Diagnosis, PredictError>) {
    match outcome {
        Ok(d) => info!(source, label = ?d.label, confidence = d.confidence, "prediction"),
        Err(e) if e.is_validation() => info!(source, error = %e, "rejected recording"),
        Err(e) => warn!(source, error = %e, "prediction failed"),
    }
}
