//! Borrowed 8-bit grayscale view with crop and sub-region support.
//!
//! Sub-views keep the parent stride and borrow the parent buffer, so cropping
//! the info bar or the measurement area never copies pixels.
use crate::error::{MetrologyError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // elements between rows
    pub data: &'a [u8],
}

/// Axis-aligned rectangle in pixel coordinates (`x`, `y` top-left).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Pixels to discard from each side of an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropMargins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view over `data` (`stride == w`).
    ///
    /// # Panics
    ///
    /// If `data` holds fewer than `w * h` pixels.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Self {
        assert!(data.len() >= w * h, "buffer smaller than w*h");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Borrow `region`, clipped to the image. A region starting outside the
    /// image yields an empty view.
    pub fn sub_view(&self, region: Region) -> ImageU8<'a> {
        let x0 = region.x.min(self.w);
        let y0 = region.y.min(self.h);
        let w = region.width.min(self.w - x0);
        let h = region.height.min(self.h - y0);
        if w == 0 || h == 0 {
            return ImageU8 {
                w: 0,
                h: 0,
                stride: self.stride,
                data: &[],
            };
        }
        let start = y0 * self.stride + x0;
        ImageU8 {
            w,
            h,
            stride: self.stride,
            data: &self.data[start..],
        }
    }

    /// Remove `margins` from the borders. Fails when nothing would remain.
    pub fn crop(&self, margins: CropMargins) -> Result<ImageU8<'a>> {
        if margins.left + margins.right >= self.w {
            return Err(MetrologyError::WindowBounds {
                start: margins.left as i64,
                end: self.w as i64 - margins.right as i64,
                limit: self.w,
            });
        }
        if margins.top + margins.bottom >= self.h {
            return Err(MetrologyError::WindowBounds {
                start: margins.top as i64,
                end: self.h as i64 - margins.bottom as i64,
                limit: self.h,
            });
        }
        Ok(self.sub_view(Region::new(
            margins.left,
            margins.top,
            self.w - margins.left - margins.right,
            self.h - margins.top - margins.bottom,
        )))
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    fn ramp(w: usize, h: usize) -> Vec<u8> {
        (0..w * h).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    #[should_panic(expected = "buffer smaller than w*h")]
    fn short_buffer_is_rejected() {
        let buf = ramp(10, 5);
        let _ = ImageU8::new(10, 6, &buf);
    }

    #[test]
    fn crop_shares_parent_buffer() {
        let buf = ramp(10, 6);
        let img = ImageU8::new(10, 6, &buf);
        let cropped = img
            .crop(CropMargins {
                top: 1,
                bottom: 2,
                left: 3,
                right: 1,
            })
            .unwrap();
        assert_eq!((cropped.width(), cropped.height()), (6, 3));
        assert_eq!(cropped.get(0, 0), img.get(3, 1));
        assert_eq!(cropped.row(2), &buf[3 * 10 + 3..3 * 10 + 9]);
    }

    #[test]
    fn crop_rejects_margins_covering_image() {
        let buf = ramp(8, 8);
        let img = ImageU8::new(8, 8, &buf);
        let err = img
            .crop(CropMargins {
                top: 4,
                bottom: 4,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, MetrologyError::WindowBounds { .. }));
    }

    #[test]
    fn sub_view_is_clipped() {
        let buf = ramp(20, 10);
        let img = ImageU8::new(20, 10, &buf);
        let view = img.sub_view(Region::new(15, 4, 100, 100));
        assert_eq!((view.w, view.h), (5, 6));
        assert_eq!(view.get(4, 5), img.get(19, 9));

        let outside = img.sub_view(Region::new(25, 0, 4, 4));
        assert_eq!((outside.w, outside.h), (0, 0));
    }
}
