//! Physical measurements from paired edges.
//!
//! - [`line_widths`]: pairs the i-th leading edge with the i-th trailing edge,
//!   reports `(trailing - leading) * scale` and a per-line spread estimated
//!   from row-to-row deviations around the mean profile.
//! - [`translation`]: difference between alternating gap widths, measured on
//!   every second line pair of the test pattern.
//! - [`rotation`]: experimental estimate from the translation at the top and
//!   bottom of the image.
//! - [`dominant_angle`]: tilt of the pattern from a Radon projection sweep,
//!   independent of the edge bookkeeping.
//!
//! Standard deviations are population deviations (divide by N).
mod line_width;
mod radon;
mod rotation;
mod stats;
mod translation;

pub use line_width::{line_widths, single_line_width, LineMeasurement, LineWidthParams};
pub use radon::dominant_angle;
pub use rotation::{rotation, RotationEstimate};
pub use stats::{mean, std_dev};
pub use translation::{
    translation, translation_count, translation_from_edges, TranslationMeasurement,
    TranslationParams,
};
