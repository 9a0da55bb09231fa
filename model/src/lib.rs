//! Pretrained scaler and classifier for voice feature vectors.
//!
//! Both artifacts are loaded once into a [`ModelStore`] and validated against
//! the 17-value feature layout of [`parkvoice_phonation::FeatureVector`]; a
//! mismatch is a load error rather than a per-request failure.
//!
//! # Usage
//!
//! ```no_run
//! use parkvoice_model::ModelStore;
//! use parkvoice_phonation::FeatureExtractor;
//!
//! let store = ModelStore::load("parkinsons_model.json", "scaler.json").unwrap();
//! let features = FeatureExtractor::default().extract_file("ahhh.wav").unwrap();
//! let prediction = store.classify(&features);
//! println!("class {} ({:.2})", prediction.class, prediction.probability);
//! ```

pub mod classifier;
mod error;
mod scaler;
mod store;

pub use classifier::{CLASSES, Classifier, Prediction};
pub use error::ModelError;
pub use scaler::StandardScaler;
pub use store::ModelStore;
