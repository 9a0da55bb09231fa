//! User-facing text for prediction outcomes.

use serde::Serialize;

use crate::diagnosis::{Diagnosis, Label};
use crate::error::PredictError;

/// Prefix of every error message shown to users.
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

/// Renders either branch of a prediction as display text.
///
/// ```text
/// 🧠 Parkinson's Detected
/// Confidence: 87.34%
/// ```
pub fn render(outcome: &Result<Diagnosis, PredictError>) -> String {
    match outcome {
        Ok(d) => format!("{}\nConfidence: {:.2}%", d.label, d.confidence * 100.0),
        Err(e) => format!("{ERROR_PREFIX}{e}"),
    }
}

/// Machine-readable form of a prediction outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub ok: bool,
    /// Same text as [`render`].
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn new(outcome: &Result<Diagnosis, PredictError>) -> Self {
        let text = render(outcome);
        match outcome {
            Ok(d) => Self {
                ok: true,
                text,
                label: Some(d.label),
                confidence: Some(d.confidence),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                text,
                label: None,
                confidence: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// A failure that happened before the pipeline could run (e.g. a missing upload).
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            ok: false,
            text: format!("{ERROR_PREFIX}{message}"),
            label: None,
            confidence: None,
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkvoice_phonation::{FEATURE_COUNT, FeatureError, FeatureVector};

    fn diagnosis(label: Label, confidence: f64) -> Diagnosis {
        Diagnosis {
            label,
            confidence,
            features: FeatureVector::new([0.0; FEATURE_COUNT]).unwrap(),
        }
    }

    #[test]
    fn test_render_success() {
        let text = render(&Ok(diagnosis(Label::Parkinsons, 0.87339)));
        assert_eq!(text, "🧠 Parkinson's Detected\nConfidence: 87.34%");

        let text = render(&Ok(diagnosis(Label::Healthy, 1.0)));
        assert_eq!(text, "✅ Healthy\nConfidence: 100.00%");
    }

    #[test]
    fn test_render_error() {
        let text = render(&Err(PredictError::Features(FeatureError::NoVoicedFrames)));
        assert_eq!(text, "⚠️ Error: No voiced frames found");
    }

    #[test]
    fn test_report_json() {
        let report = Report::new(&Ok(diagnosis(Label::Healthy, 0.5)));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["label"], "healthy");
        assert_eq!(json["confidence"], 0.5);
        assert!(json.get("error").is_none());

        let report = Report::failure("missing audio");
        assert_eq!(report.text, "⚠️ Error: missing audio");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json.get("label").is_none());
    }
}
