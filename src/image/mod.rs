//! Image containers used by the pipeline.
//!
//! - [`RasterImage`]: borrowed RGBA input as handed over by the caller.
//! - [`ImageF32`]: owned single-channel float buffer; doubles as the
//!   intensity field and the gradient-magnitude field.
pub mod f32;
pub mod io;
pub mod raster;
pub mod traits;

pub use self::f32::{GradientField, ImageF32, IntensityField};
pub use self::raster::RasterImage;
pub use self::traits::{ImageView, ImageViewMut, Rows};
