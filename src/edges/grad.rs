//! Sobel gradient magnitude over interior pixels.
//!
//! - Convolves the 3×3 `X`/`Y` Sobel pair at every pixel with a full
//!   neighbourhood; border rows and columns stay at zero.
//! - Output is `mag = sqrt(gx^2 + gy^2)` per pixel.
//!
//! Complexity: O(W·H) with nine taps per pixel.
use crate::image::{GradientField, ImageView, ImageViewMut, IntensityField};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient magnitude of `l`; fields smaller than 3×3 come back all zero.
pub fn sobel_magnitude(l: &IntensityField) -> GradientField {
    let w = l.w;
    let h = l.h;
    let mut mag = GradientField::new(w, h);
    if w < 3 || h < 3 {
        return mag;
    }

    for y in 1..h - 1 {
        let rows = [l.row(y - 1), l.row(y), l.row(y + 1)];
        let out = mag.row_mut(y);
        for x in 1..w - 1 {
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, src) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x += src[x - 1] * kx_row[0] + src[x] * kx_row[1] + src[x + 1] * kx_row[2];
                sum_y += src[x - 1] * ky_row[0] + src[x] * ky_row[1] + src[x + 1] * ky_row[2];
            }
            out[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    mag
}
