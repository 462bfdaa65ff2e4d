use std::ops::Range;

/// Read-only row access over a single-channel image.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Samples of row `y` restricted to `cols`, widened to `f64`.
    fn row_values(&self, y: usize, cols: Range<usize>) -> Vec<f64>
    where
        Self::Pixel: Into<f64>,
    {
        self.row(y)[cols].iter().map(|&px| px.into()).collect()
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
