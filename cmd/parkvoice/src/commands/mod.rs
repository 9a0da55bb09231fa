//! CLI commands module.

mod features;
mod predict;
mod serve;
mod util;

pub use features::FeaturesCommand;
pub use predict::PredictCommand;
pub use serve::ServeCommand;

pub(crate) use util::*;
