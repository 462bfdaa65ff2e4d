use serde::Serialize;

/// Line segment produced by the LSD-like extractor.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    /// Unit tangent from `p0` to `p1`.
    pub dir: [f32; 2],
    pub len: f32,
    pub avg_mag: f32,
    /// `len * avg_mag`, a saliency weight.
    pub strength: f32,
}

impl Segment {
    /// Absolute extent along the image x axis.
    pub fn horizontal_span(&self) -> f32 {
        (self.p1[0] - self.p0[0]).abs()
    }
}
