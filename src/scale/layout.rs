use crate::error::{MetrologyError, Result};
use crate::image::{ImageU8, Region};
use serde::{Deserialize, Serialize};

/// Placement of the calibration data in the SEM info bar.
///
/// The info bar is a fixed-height strip at the bottom of the image. The label
/// and scale-bar regions are relative to the info bar's top-left corner and
/// are clipped to it. The defaults match the vendor layout the crate was
/// calibrated on; other instruments need their own values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoBarLayout {
    /// Height of the info bar in pixels.
    pub bar_height: usize,
    /// Region holding the numeric scale label (micrometers).
    pub label_region: Region,
    /// Region searched for the rendered scale bar.
    pub scale_bar_region: Region,
    /// Pixels removed from the detected bar length for the end ticks
    /// (two ticks, 3 px each, counted by the line detector).
    pub tick_correction_px: usize,
}

impl Default for InfoBarLayout {
    fn default() -> Self {
        Self {
            bar_height: 95,
            label_region: Region::new(0, 0, 95, 95),
            scale_bar_region: Region::new(200, 0, 1050, 125),
            tick_correction_px: 6,
        }
    }
}

impl InfoBarLayout {
    /// The bottom `bar_height` rows of `image`, full width.
    pub fn info_bar<'a>(&self, image: &ImageU8<'a>) -> Result<ImageU8<'a>> {
        if self.bar_height == 0 || image.h < self.bar_height {
            return Err(MetrologyError::Calibration(format!(
                "image height {} cannot hold an info bar of {} rows",
                image.h, self.bar_height
            )));
        }
        Ok(image.sub_view(Region::new(
            0,
            image.h - self.bar_height,
            image.w,
            self.bar_height,
        )))
    }

    pub fn label_view<'a>(&self, info_bar: &ImageU8<'a>) -> Result<ImageU8<'a>> {
        non_empty(info_bar.sub_view(self.label_region), "label")
    }

    pub fn scale_bar_view<'a>(&self, info_bar: &ImageU8<'a>) -> Result<ImageU8<'a>> {
        non_empty(info_bar.sub_view(self.scale_bar_region), "scale-bar")
    }
}

fn non_empty<'a>(view: ImageU8<'a>, what: &str) -> Result<ImageU8<'a>> {
    if view.w == 0 || view.h == 0 {
        Err(MetrologyError::Calibration(format!(
            "{what} region lies outside the info bar"
        )))
    } else {
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_regions_clip_to_info_bar() {
        let buf = vec![0u8; 1280 * 400];
        let img = ImageU8::new(1280, 400, &buf);
        let layout = InfoBarLayout::default();
        let bar = layout.info_bar(&img).unwrap();
        assert_eq!((bar.w, bar.h), (1280, 95));
        let label = layout.label_view(&bar).unwrap();
        assert_eq!((label.w, label.h), (95, 95));
        let scale_bar = layout.scale_bar_view(&bar).unwrap();
        assert_eq!((scale_bar.w, scale_bar.h), (1050, 95));
    }

    #[test]
    fn short_image_has_no_info_bar() {
        let buf = vec![0u8; 64 * 50];
        let img = ImageU8::new(64, 50, &buf);
        assert!(matches!(
            InfoBarLayout::default().info_bar(&img),
            Err(MetrologyError::Calibration(_))
        ));
    }

    #[test]
    fn narrow_image_has_no_scale_bar_region() {
        let buf = vec![0u8; 150 * 120];
        let img = ImageU8::new(150, 120, &buf);
        let layout = InfoBarLayout::default();
        let bar = layout.info_bar(&img).unwrap();
        assert!(layout.scale_bar_view(&bar).is_err());
    }
}
