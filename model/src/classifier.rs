//! Pretrained binary classifiers.
//!
//! Artifacts are JSON exports of fitted scikit-learn estimators, tagged by
//! `"kind"`:
//!
//! ```json
//! {"kind": "logistic_regression", "classes": [0, 1], "coef": [...], "intercept": -0.3}
//! {"kind": "random_forest", "classes": [0, 1], "n_features": 17, "trees": [{...}]}
//! {"kind": "decision_tree", "classes": [0, 1], "n_features": 17, "children_left": [...], ...}
//! ```
//!
//! Trees use scikit-learn's parallel-array layout (`tree_.children_left`,
//! `children_right`, `feature`, `threshold`, `value[:, 0, :]`).

use parkvoice_phonation::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Class labels every artifact must declare, in order.
pub const CLASSES: [i64; 2] = [0, 1];

/// Marks a leaf in `children_left` / `children_right`.
const LEAF: i64 = -1;

/// A loaded classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
}

/// Class decision for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Winning class label.
    pub class: i64,
    /// Probability of the winning class.
    pub probability: f64,
    /// Probability per entry of [`CLASSES`].
    pub probabilities: Vec<f64>,
}

impl Classifier {
    /// Short name of the model family, as written in the artifact.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::RandomForest(_) => "random_forest",
            Self::DecisionTree(_) => "decision_tree",
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            Self::LogisticRegression(m) => &m.classes,
            Self::RandomForest(m) => &m.classes,
            Self::DecisionTree(m) => &m.classes,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.coef.len(),
            Self::RandomForest(m) => m.n_features,
            Self::DecisionTree(m) => m.n_features,
        }
    }

    /// Checks the artifact's internal consistency and its fit to the feature layout.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes() != CLASSES {
            return Err(ModelError::Invalid(format!(
                "classes must be {:?}, got {:?}",
                CLASSES,
                self.classes()
            )));
        }
        if self.n_features() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                what: "classifier input",
                expected: FEATURE_COUNT,
                got: self.n_features(),
            });
        }
        match self {
            Self::LogisticRegression(m) => {
                if m.coef.iter().chain([&m.intercept]).any(|v| !v.is_finite()) {
                    return Err(ModelError::Invalid(
                        "logistic regression has non-finite weights".into(),
                    ));
                }
                Ok(())
            }
            Self::RandomForest(m) => {
                if m.trees.is_empty() {
                    return Err(ModelError::Invalid("random forest has no trees".into()));
                }
                for (i, tree) in m.trees.iter().enumerate() {
                    tree.validate(m.n_features, CLASSES.len())
                        .map_err(|e| ModelError::Invalid(format!("tree {i}: {e}")))?;
                }
                Ok(())
            }
            Self::DecisionTree(m) => m
                .tree
                .validate(m.n_features, CLASSES.len())
                .map_err(ModelError::Invalid),
        }
    }

    /// Class probabilities for a standardized sample, ordered as [`CLASSES`].
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Self::LogisticRegression(m) => m.predict_proba(x),
            Self::RandomForest(m) => {
                let mut sum = vec![0.0; m.classes.len()];
                for tree in &m.trees {
                    for (s, p) in sum.iter_mut().zip(tree.predict_proba(x)) {
                        *s += p;
                    }
                }
                let n = m.trees.len() as f64;
                sum.into_iter().map(|s| s / n).collect()
            }
            Self::DecisionTree(m) => m.tree.predict_proba(x),
        }
    }

    /// Most probable class; ties go to the first class.
    pub fn predict(&self, x: &[f64]) -> Prediction {
        let probabilities = self.predict_proba(x);
        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[best] {
                best = i;
            }
        }
        Prediction {
            class: self.classes()[best],
            probability: probabilities[best],
            probabilities,
        }
    }
}

/// Binary logistic regression: `P(classes[1]) = sigmoid(coef . x + intercept)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<i64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let z: f64 = self.coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.intercept;
        let p = sigmoid(z);
        vec![1.0 - p, p]
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Averaged ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<i64>,
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

/// A single decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<i64>,
    pub n_features: usize,
    #[serde(flatten)]
    pub tree: Tree,
}

/// Binary tree in parallel-array form; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions); only leaves are read.
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays differ in length".into());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {node} has exactly one child"));
                }
                let value = &self.value[node];
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        value.len()
                    ));
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {node} has invalid class weights"));
                }
                continue;
            }
            // Children always follow their parent, so traversal cannot loop.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has out-of-order child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let value = &self.value[self.leaf(x)];
        let total: f64 = value.iter().sum();
        value.iter().map(|v| v / total).collect()
    }
}
