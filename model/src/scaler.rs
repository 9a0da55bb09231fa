//! Feature standardization.

use parkvoice_phonation::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Per-feature standardization `(x - mean) / scale`, exported from a fitted
/// scikit-learn `StandardScaler` (`mean_`, `scale_`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names the scaler was fitted on (`feature_names_in_`), if exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// An identity transform over all features.
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
            feature_names: None,
        }
    }

    /// Checks the scaler against the feature layout.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (what, values) in [("scaler mean", &self.mean), ("scaler scale", &self.scale)] {
            if values.len() != FEATURE_COUNT {
                return Err(ModelError::DimensionMismatch {
                    what,
                    expected: FEATURE_COUNT,
                    got: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::Invalid(format!("{what} contains non-finite values")));
            }
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelError::Invalid(format!(
                    "scaler was fitted on features {names:?}, expected {FEATURE_NAMES:?}"
                )));
            }
        }
        Ok(())
    }

    /// Standardizes a feature vector. A zero scale leaves the centred value unscaled.
    pub fn transform(&self, features: &FeatureVector) -> Vec<f64> {
        features
            .as_slice()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(value: f64) -> FeatureVector {
        FeatureVector::new([value; FEATURE_COUNT]).unwrap()
    }

    #[test]
    fn test_transform() {
        let mut scaler = StandardScaler::identity();
        scaler.mean[0] = 2.0;
        scaler.scale[0] = 4.0;
        scaler.scale[1] = 0.0;
        scaler.mean[1] = 1.0;

        let out = scaler.transform(&features(10.0));
        assert_eq!(out.len(), FEATURE_COUNT);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 9.0);
        assert_eq!(out[16], 10.0);
    }

    #[test]
    fn test_validate_length() {
        let scaler = StandardScaler {
            mean: vec![0.0; 16],
            scale: vec![1.0; FEATURE_COUNT],
            feature_names: None,
        };
        assert!(matches!(
            scaler.validate(),
            Err(ModelError::DimensionMismatch { what: "scaler mean", expected: 17, got: 16 })
        ));
    }

    #[test]
    fn test_validate_feature_names() {
        let mut scaler = StandardScaler::identity();
        scaler.feature_names = Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect());
        assert!(scaler.validate().is_ok());

        let mut swapped: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        swapped.swap(14, 15);
        scaler.feature_names = Some(swapped);
        assert!(matches!(scaler.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_parse() {
        let json = format!(
            r#"{{"mean": {:?}, "scale": {:?}}}"#,
            vec![0.5; FEATURE_COUNT],
            vec![2.0; FEATURE_COUNT]
        );
        let scaler: StandardScaler = serde_json::from_str(&json).unwrap();
        scaler.validate().unwrap();
        assert_eq!(scaler.transform(&features(4.5))[3], 2.0);
    }
}
