//! RGBA raster → normalized intensity field.
//!
//! Luma uses the Rec. 601 weights scaled to [0, 1]. With contrast stretching
//! enabled the field is rescaled to its own min/max and remapped through
//! `n^gamma`. A constant image stays flat (the range is floored at 1e-6).
use crate::image::{ImageViewMut, IntensityField, RasterImage};
use crate::params::DetectionParams;

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;
const MIN_RANGE: f32 = 1e-6;
const MIN_GAMMA: f32 = 0.1;

/// Convert the caller's raster into the intensity field used by the gradient stage.
pub fn to_intensity(image: &RasterImage<'_>, params: &DetectionParams) -> IntensityField {
    let mut out = IntensityField::new(image.w, image.h);
    for y in 0..image.h {
        let row = out.row_mut(y);
        for (x, dst) in row.iter_mut().enumerate() {
            let [r, g, b] = image.rgb(y * image.w + x);
            *dst = (LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32) / 255.0;
        }
    }
    if params.contrast_stretch {
        stretch_contrast(&mut out, params.contrast_gamma);
    }
    out
}

/// Min/max stretch to [0, 1] followed by a power-law remap.
pub fn stretch_contrast(field: &mut IntensityField, gamma: f32) {
    let Some((lo, hi)) = field.min_max() else {
        return;
    };
    let range = (hi - lo).max(MIN_RANGE);
    let gamma = gamma.max(MIN_GAMMA);
    for v in &mut field.data {
        let n = ((*v - lo) / range).clamp(0.0, 1.0);
        *v = n.powf(gamma);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(pixels: &[[u8; 3]]) -> Vec<u8> {
        pixels.iter().flat_map(|p| [p[0], p[1], p[2], 255]).collect()
    }

    #[test]
    fn luma_without_stretch_uses_weighted_sum() {
        let data = rgba(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]]);
        let img = RasterImage::new(2, 2, &data).unwrap();
        let params = DetectionParams {
            contrast_stretch: false,
            ..Default::default()
        };
        let field = to_intensity(&img, &params);
        assert!((field.get(0, 0) - 0.299).abs() < 1e-5);
        assert!((field.get(1, 0) - 0.587).abs() < 1e-5);
        assert!((field.get(0, 1) - 0.114).abs() < 1e-5);
        assert!((field.get(1, 1) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn stretch_spans_unit_range() {
        let data = rgba(&[[50, 50, 50], [100, 100, 100], [150, 150, 150], [200, 200, 200]]);
        let img = RasterImage::new(2, 2, &data).unwrap();
        let field = to_intensity(&img, &DetectionParams::default());
        let (lo, hi) = field.min_max().unwrap();
        assert!(lo.abs() < 1e-6);
        assert!((hi - 1.0).abs() < 1e-6);
    }

    #[test]
    fn constant_image_stays_flat() {
        let data = rgba(&[[80, 80, 80]; 9]);
        let img = RasterImage::new(3, 3, &data).unwrap();
        let field = to_intensity(&img, &DetectionParams::default());
        assert!(field.data.iter().all(|&v| v == field.data[0]));
    }

    #[test]
    fn tiny_gamma_is_floored() {
        let mut a = IntensityField::from_vec(2, 1, vec![0.0, 0.5]).unwrap();
        let mut b = a.clone();
        stretch_contrast(&mut a, 0.0);
        stretch_contrast(&mut b, 0.1);
        assert_eq!(a.data, b.data);
    }
}
