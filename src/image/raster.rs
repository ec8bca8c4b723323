use crate::error::{PalmError, Result};

/// Bytes per pixel of the interleaved RGBA input.
pub const RGBA_CHANNELS: usize = 4;

/// Borrowed RGBA raster (row-major, 4 bytes per pixel, no row padding).
///
/// The buffer belongs to the caller; the pipeline only reads it.
#[derive(Clone, Copy, Debug)]
pub struct RasterImage<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> RasterImage<'a> {
    /// Build a validated view over `data`.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        let image = Self { w, h, data };
        image.validate()?;
        Ok(image)
    }

    /// Reject zero-sized rasters and buffers too short for `w × h` pixels.
    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(PalmError::invalid_image(format!(
                "dimensions must be positive, got {}x{}",
                self.w, self.h
            )));
        }
        let needed = self
            .w
            .checked_mul(self.h)
            .and_then(|n| n.checked_mul(RGBA_CHANNELS))
            .ok_or_else(|| PalmError::invalid_image("pixel count overflows usize"))?;
        if self.data.len() < needed {
            return Err(PalmError::invalid_image(format!(
                "buffer holds {} bytes, {}x{} RGBA needs {needed}",
                self.data.len(),
                self.w,
                self.h
            )));
        }
        Ok(())
    }

    /// RGB triple of the pixel with linear index `i`; alpha is ignored.
    #[inline]
    pub fn rgb(&self, i: usize) -> [u8; 3] {
        let o = i * RGBA_CHANNELS;
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }
}
