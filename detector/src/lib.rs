//! Healthy / Parkinson's-indicated prediction from a sustained-vowel recording.
//!
//! [`PredictionService`] chains feature extraction
//! ([`parkvoice_phonation`]) and the pretrained model
//! ([`parkvoice_model::ModelStore`]). Every failure along the way comes back
//! as a [`PredictError`]; [`render`] turns either branch into the text shown
//! to users.

mod diagnosis;
mod error;
mod render;
mod service;

pub use diagnosis::{Diagnosis, Label};
pub use error::PredictError;
pub use render::{ERROR_PREFIX, Report, render};
pub use service::PredictionService;
