use crate::image::GradientField;

/// Magnitudes at or below this value never count as edges.
pub const MAG_EPS: f32 = 1e-6;

/// Value at rank `floor(n * percentile)` of the sorted magnitudes.
///
/// The index is clamped to the last element, so `percentile = 1.0` selects
/// the maximum. An empty field yields `0.0`.
pub fn percentile_threshold(values: &[f32], percentile: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let p = if percentile.is_finite() {
        percentile.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let idx = ((sorted.len() as f32 * p).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Foreground mask: `1` where `mag >= cutoff` and the pixel has a non-zero
/// gradient, `0` elsewhere.
pub fn binary_mask(mag: &GradientField, cutoff: f32) -> Vec<u8> {
    mag.data
        .iter()
        .map(|&m| u8::from(m >= cutoff && m > MAG_EPS))
        .collect()
}
