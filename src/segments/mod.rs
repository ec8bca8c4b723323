//! Percentile thresholding and connected-component segmentation.
//!
//! The gradient-magnitude field is binarized at a rank-based cutoff: the
//! magnitudes are sorted and the value at `floor(n * percentile)` becomes the
//! threshold. Pixels at or above it (and with a non-zero gradient) form the
//! foreground mask. An iterative 8-connected flood fill then groups the
//! foreground into components; groups with `min_component_size` pixels or
//! fewer are discarded as noise.
//!
//! Notes
//! - Raising the percentile can only shrink the foreground.
//! - A flat field has no foreground at all, whatever the percentile.
//! - Component pixel lists carry no spatial ordering; the feature extractor
//!   orders them along the principal axis before any end-based analysis.
//!
//! Complexity
//! - Sorting dominates at O(N log N); the flood fill visits every pixel once.

mod components;
mod threshold;

pub use components::Component;
pub use threshold::{binary_mask, percentile_threshold, MAG_EPS};

use crate::image::GradientField;
use crate::params::DetectionParams;

/// Output of the segmentation stage.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// Magnitude cutoff used for the mask; reported as `mag_ref` on lines.
    pub threshold: f32,
    /// Number of foreground pixels in the mask.
    pub foreground: usize,
    pub components: Vec<Component>,
}

/// Threshold `mag` and extract the surviving 8-connected components.
pub fn segment(mag: &GradientField, params: &DetectionParams) -> Segmentation {
    let threshold = percentile_threshold(&mag.data, params.edge_percentile);
    let mask = binary_mask(mag, threshold);
    let foreground = mask.iter().filter(|&&m| m != 0).count();
    let components = extract_components(&mask, mag.w, mag.h, params.min_component_size);
    Segmentation {
        threshold,
        foreground,
        components,
    }
}

/// 8-connected components of `mask` with more than `min_size` pixels.
pub fn extract_components(
    mask: &[u8],
    width: usize,
    height: usize,
    min_size: usize,
) -> Vec<Component> {
    components::ComponentExtractor::new(mask, width, height, min_size).extract()
}
