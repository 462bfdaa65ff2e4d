//! JSON configuration of the command-line tools.
pub mod measure;

pub use measure::{load_config, MeasureOutputConfig, MeasureToolConfig, ScaleSource};
