//! Grayscale image containers used by the pipeline.
//!
//! - [`ImageU8`]: borrowed 8-bit view with an element stride, so crops and
//!   sub-regions share the original buffer.
//! - [`ImageF32`]: owned float image for gradient processing.
//! - [`ImageView`]: row access shared by both, used by the profile and
//!   metric stages.
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::{CropMargins, ImageU8, Region};
