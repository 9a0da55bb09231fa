//! Load-once holder of the classifier and its scaler.

use std::fs;
use std::path::Path;

use parkvoice_phonation::FeatureVector;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::classifier::{Classifier, Prediction};
use crate::error::ModelError;
use crate::scaler::StandardScaler;

/// The classifier and scaler, validated against the feature layout.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ModelStore {
    classifier: Classifier,
    scaler: StandardScaler,
}

impl ModelStore {
    /// Reads both artifacts from JSON files.
    ///
    /// Missing, unreadable or inconsistent artifacts are errors; callers are
    /// expected to treat them as fatal.
    pub fn load(
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<Self, ModelError> {
        let (model_path, scaler_path) = (model_path.as_ref(), scaler_path.as_ref());
        let classifier: Classifier = read_json(model_path)?;
        let scaler: StandardScaler = read_json(scaler_path)?;
        let store = Self::from_parts(classifier, scaler)?;
        info!(
            model = %model_path.display(),
            scaler = %scaler_path.display(),
            kind = store.classifier.kind(),
            "loaded model artifacts"
        );
        Ok(store)
    }

    /// Validates and wraps already-parsed artifacts.
    pub fn from_parts(classifier: Classifier, scaler: StandardScaler) -> Result<Self, ModelError> {
        scaler.validate()?;
        classifier.validate()?;
        Ok(Self { classifier, scaler })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Standardizes `features` and classifies them.
    pub fn classify(&self, features: &FeatureVector) -> Prediction {
        let scaled = self.scaler.transform(features);
        self.classifier.predict(&scaled)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let data = fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
