//! Lightweight LSD-like segment extractor.
//!
//! Used to measure the rendered scale bar in the SEM info bar. The algorithm:
//!
//! - Sobel gradients (`edges::sobel_gradients`) on a `[0, 1]` float image.
//! - Region growing from seeds: neighbours whose gradient orientation is
//!   within a tolerance of the seed orientation, and whose magnitude clears a
//!   threshold, join the region.
//! - PCA line fit: the 2×2 covariance of the region's pixel coordinates is
//!   eigendecomposed; the principal eigenvector is the segment tangent.
//! - Endpoints: region pixels projected onto the tangent give `p0` and `p1`.
//! - Significance: minimum region size, minimum length and minimum fraction
//!   of pixels aligned with the seed orientation.
//!
//! Orientation is taken modulo π, so both borders of a bar grow the same way.
//! Each region visits a pixel at most once, giving O(W·H) behaviour.

mod extractor;
mod options;
mod region_accumulator;
mod segment;

pub use options::LsdOptions;
pub use segment::Segment;

use crate::image::ImageF32;

/// Extract line segments from `l`, in seed (raster) order.
pub fn lsd_extract_segments(l: &ImageF32, options: LsdOptions) -> Vec<Segment> {
    extractor::LsdExtractor::new(l, options).extract()
}

/// Longest segment of `segments`, if any.
pub fn longest_segment(segments: &[Segment]) -> Option<&Segment> {
    segments.iter().max_by(|a, b| a.len.total_cmp(&b.len))
}
