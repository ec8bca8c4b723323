//! Parameter types configuring the reader stages.
//!
//! Two groups: [`DetectionParams`] drive the image-space stages (contrast,
//! edge percentile, component size) and [`InterpretationParams`] drive the
//! geometric predicates (strength ratios, bifurcation clustering).
//!
//! [`PalmParams`] is `Copy`. Every run takes it by value, so a caller that
//! edits its own copy while a run is in flight can never tear the snapshot
//! the run is working with.

use crate::error::Result;
use crate::image::io::read_json_file;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Parameters for the preprocessing and segmentation stages.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Rank fraction of the sorted magnitudes used as the edge cutoff.
    pub edge_percentile: f32,
    /// Components with this many pixels or fewer are dropped as noise.
    pub min_component_size: usize,
    /// Enables min/max stretch followed by the gamma remap.
    pub contrast_stretch: bool,
    /// Exponent of the power-law remap; floored at 0.1 when applied.
    pub contrast_gamma: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            edge_percentile: 0.85,
            min_component_size: 100,
            contrast_stretch: true,
            contrast_gamma: 0.9,
        }
    }
}

/// Parameters for strength classification and bifurcation detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationParams {
    /// Minimum centroid separation (degrees) between the two tangent clusters.
    pub branch_min_sep_deg: f32,
    /// Minimum members per tangent cluster.
    pub branch_min_cluster: usize,
    /// Multiplier applied to `branch_min_sep_deg`.
    pub bifurcation_sensitivity: f32,
    pub mag_robust_ratio: f32,
    pub mag_pale_ratio: f32,
    pub thickness_robust_ratio: f32,
    pub thickness_pale_ratio: f32,
}

impl Default for InterpretationParams {
    fn default() -> Self {
        Self {
            branch_min_sep_deg: 45.0,
            branch_min_cluster: 4,
            bifurcation_sensitivity: 1.0,
            mag_robust_ratio: 1.3,
            mag_pale_ratio: 0.95,
            thickness_robust_ratio: 1.2,
            thickness_pale_ratio: 0.8,
        }
    }
}

/// Full parameter snapshot for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalmParams {
    pub detection: DetectionParams,
    pub interpretation: InterpretationParams,
}

/// Ranges exposed by the settings UI.
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const EDGE_PERCENTILE: RangeInclusive<f32> = 0.0..=1.0;
    pub const CONTRAST_GAMMA: RangeInclusive<f32> = 0.1..=3.0;
    pub const BRANCH_MIN_SEP_DEG: RangeInclusive<f32> = 20.0..=90.0;
    pub const BRANCH_MIN_CLUSTER: RangeInclusive<usize> = 2..=12;
    pub const BIFURCATION_SENSITIVITY: RangeInclusive<f32> = 0.5..=2.0;
    pub const MAG_ROBUST_RATIO: RangeInclusive<f32> = 1.0..=2.5;
    pub const MAG_PALE_RATIO: RangeInclusive<f32> = 0.5..=1.2;
    pub const THICKNESS_ROBUST_RATIO: RangeInclusive<f32> = 1.0..=2.0;
    pub const THICKNESS_PALE_RATIO: RangeInclusive<f32> = 0.3..=1.0;
}

fn clamp_f32(v: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

impl DetectionParams {
    /// Pull every knob back into its UI range; non-finite values reset to defaults.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            edge_percentile: clamp_f32(
                self.edge_percentile,
                ranges::EDGE_PERCENTILE,
                d.edge_percentile,
            ),
            min_component_size: self.min_component_size,
            contrast_stretch: self.contrast_stretch,
            contrast_gamma: clamp_f32(
                self.contrast_gamma,
                ranges::CONTRAST_GAMMA,
                d.contrast_gamma,
            ),
        }
    }
}

impl InterpretationParams {
    /// Pull every knob back into its UI range; non-finite values reset to defaults.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let cluster = ranges::BRANCH_MIN_CLUSTER;
        Self {
            branch_min_sep_deg: clamp_f32(
                self.branch_min_sep_deg,
                ranges::BRANCH_MIN_SEP_DEG,
                d.branch_min_sep_deg,
            ),
            branch_min_cluster: self.branch_min_cluster.clamp(*cluster.start(), *cluster.end()),
            bifurcation_sensitivity: clamp_f32(
                self.bifurcation_sensitivity,
                ranges::BIFURCATION_SENSITIVITY,
                d.bifurcation_sensitivity,
            ),
            mag_robust_ratio: clamp_f32(
                self.mag_robust_ratio,
                ranges::MAG_ROBUST_RATIO,
                d.mag_robust_ratio,
            ),
            mag_pale_ratio: clamp_f32(
                self.mag_pale_ratio,
                ranges::MAG_PALE_RATIO,
                d.mag_pale_ratio,
            ),
            thickness_robust_ratio: clamp_f32(
                self.thickness_robust_ratio,
                ranges::THICKNESS_ROBUST_RATIO,
                d.thickness_robust_ratio,
            ),
            thickness_pale_ratio: clamp_f32(
                self.thickness_pale_ratio,
                ranges::THICKNESS_PALE_RATIO,
                d.thickness_pale_ratio,
            ),
        }
    }
}

impl PalmParams {
    pub fn clamped(self) -> Self {
        Self {
            detection: self.detection.clamped(),
            interpretation: self.interpretation.clamped(),
        }
    }
}

/// Load a parameter file; missing fields fall back to defaults and the
/// result is clamped to the UI ranges.
pub fn load_params(path: &Path) -> Result<PalmParams> {
    let params: PalmParams = read_json_file(path)?;
    Ok(params.clamped())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let p = PalmParams::default();
        assert_eq!(p.detection.edge_percentile, 0.85);
        assert_eq!(p.detection.min_component_size, 100);
        assert!(p.detection.contrast_stretch);
        assert_eq!(p.interpretation.branch_min_cluster, 4);
        assert_eq!(p.interpretation.branch_min_sep_deg, 45.0);
        assert_eq!(p.clamped(), p);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: PalmParams =
            serde_json::from_str(r#"{"interpretation": {"branch_min_sep_deg": 30.0}}"#).unwrap();
        assert_eq!(p.interpretation.branch_min_sep_deg, 30.0);
        assert_eq!(p.interpretation.mag_robust_ratio, 1.3);
        assert_eq!(p.detection, DetectionParams::default());
    }

    #[test]
    fn clamping_pulls_values_into_ui_ranges() {
        let mut p = PalmParams::default();
        p.interpretation.branch_min_sep_deg = 150.0;
        p.interpretation.branch_min_cluster = 0;
        p.detection.edge_percentile = f32::NAN;
        let c = p.clamped();
        assert_eq!(c.interpretation.branch_min_sep_deg, 90.0);
        assert_eq!(c.interpretation.branch_min_cluster, 2);
        assert_eq!(c.detection.edge_percentile, 0.85);
    }
}
