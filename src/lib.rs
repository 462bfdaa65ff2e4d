#![doc = include_str!("../README.md")]

// Pipeline stages
pub mod analysis;
pub mod edges;
pub mod filter;
pub mod metrics;
pub mod profile;
pub mod scale;

// Supporting modules
pub mod angle;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

pub use crate::analysis::{AnalysisParams, LineAnalyzer, MeasurementReport};
pub use crate::error::{MetrologyError, Result};
pub use crate::scale::{Scale, ScaleProvider, ScaleResolver};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sem_metrology::prelude::*;
///
/// # fn main() -> Result<(), MetrologyError> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::new(w, h, &gray);
///
/// let fixed = Scale { um_per_px: 0.01, uncertainty: 0.0 };
/// let report = LineAnalyzer::new(fixed, AnalysisParams::default()).analyze(&img)?;
/// println!("{} lines in {:.3} ms", report.lines.len(), report.timing.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::scale::{FixedText, InfoBarLayout, SegmentLineDetector};
    pub use crate::{
        AnalysisParams, LineAnalyzer, MeasurementReport, MetrologyError, Scale, ScaleResolver,
    };
}
