use std::fmt;

use parkvoice_phonation::FeatureVector;
use serde::Serialize;

/// Binary outcome of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Healthy,
    Parkinsons,
}

impl Label {
    /// Maps a classifier class label (0 healthy, 1 Parkinson's-indicated).
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Self::Healthy),
            1 => Some(Self::Parkinsons),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Healthy => "✅",
            Self::Parkinsons => "🧠",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Parkinsons => "Parkinson's Detected",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.title())
    }
}

/// A successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub label: Label,
    /// Probability of `label`, in [0, 1].
    pub confidence: f64,
    /// The features the decision was made on.
    pub features: FeatureVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_class() {
        assert_eq!(Label::from_class(0), Some(Label::Healthy));
        assert_eq!(Label::from_class(1), Some(Label::Parkinsons));
        assert_eq!(Label::from_class(2), None);
    }

    #[test]
    fn label_display() {
        assert_eq!(Label::Healthy.to_string(), "✅ Healthy");
        assert_eq!(Label::Parkinsons.to_string(), "🧠 Parkinson's Detected");
    }
}
