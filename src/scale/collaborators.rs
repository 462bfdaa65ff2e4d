//! Boundary collaborators of the scale resolver.
//!
//! Reading the label text (OCR) and measuring the rendered bar are delegated
//! to implementations of [`TextReader`] and [`LineLengthDetector`]. A reader
//! backed by a heavyweight model is constructed once by the caller, owned by
//! the [`super::ScaleResolver`] and dropped with it.
use crate::error::{MetrologyError, Result};
use crate::image::{ImageF32, ImageU8};
use crate::segments::{longest_segment, lsd_extract_segments, LsdOptions};
use log::debug;

/// Reads the text rendered in an image region.
pub trait TextReader {
    fn read_text(&self, image: &ImageU8<'_>) -> Result<String>;
}

/// Measures the pixel length of the dominant line in an image region.
pub trait LineLengthDetector {
    fn detect_line_length(&self, image: &ImageU8<'_>) -> Result<usize>;
}

/// Returns a preset label, e.g. taken from acquisition metadata.
#[derive(Clone, Debug)]
pub struct FixedText {
    text: String,
}

impl FixedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextReader for FixedText {
    fn read_text(&self, _image: &ImageU8<'_>) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Line length from the longest segment found by the LSD-like extractor.
///
/// The length is the horizontal span of the segment, rounded to whole pixels.
#[derive(Clone, Debug, Default)]
pub struct SegmentLineDetector {
    pub options: LsdOptions,
}

impl SegmentLineDetector {
    pub fn new(options: LsdOptions) -> Self {
        Self { options }
    }
}

impl LineLengthDetector for SegmentLineDetector {
    fn detect_line_length(&self, image: &ImageU8<'_>) -> Result<usize> {
        let gray = ImageF32::from_u8(image);
        let segments = lsd_extract_segments(&gray, self.options);
        let longest = longest_segment(&segments).ok_or_else(|| {
            MetrologyError::Collaborator("no line segment found in scale-bar region".to_string())
        })?;
        debug!(
            "SegmentLineDetector: {} segments, longest p0={:?} p1={:?}",
            segments.len(),
            longest.p0,
            longest.p1
        );
        Ok(longest.horizontal_span().round() as usize)
    }
}
