//! Branch detection from the spread of tangent directions near a line end.
//!
//! A line that forks leaves two distinct populations of segment angles close
//! to the fork. The angles are split with a 1-D two-means seeded at their
//! extremes; the end counts as bifurcated when both groups are populated and
//! their centroids are far enough apart.
use super::geometry::{branch_angles_near, End};
use crate::params::InterpretationParams;
use crate::types::Point;

/// Segment angles inspected near an end.
pub const BRANCH_SAMPLES: usize = 40;

const ITERATIONS: usize = 8;

/// Result of the two-means split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoMeans {
    pub centroids: [f32; 2],
    pub counts: [usize; 2],
}

impl TwoMeans {
    pub fn separation_deg(&self) -> f32 {
        (self.centroids[0] - self.centroids[1]).abs().to_degrees()
    }
}

/// Two-means over raw angle values, seeded at the minimum and maximum.
///
/// Stops early when a group empties. The returned counts use strict
/// nearest-centroid membership, so samples equidistant from both centroids
/// go to the second group. `None` for an empty slice.
pub fn two_means_extrema(angles: &[f32]) -> Option<TwoMeans> {
    let (&first, rest) = angles.split_first()?;
    let (lo, hi) = rest
        .iter()
        .fold((first, first), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    let mut c = [lo, hi];

    for _ in 0..ITERATIONS {
        let mut sum = [0.0f32; 2];
        let mut n = [0usize; 2];
        for &a in angles {
            let g = group_of(a, c);
            sum[g] += a;
            n[g] += 1;
        }
        if n[0] == 0 || n[1] == 0 {
            break;
        }
        c = [sum[0] / n[0] as f32, sum[1] / n[1] as f32];
    }

    let mut counts = [0usize; 2];
    for &a in angles {
        counts[group_of(a, c)] += 1;
    }
    Some(TwoMeans {
        centroids: c,
        counts,
    })
}

#[inline]
fn group_of(a: f32, c: [f32; 2]) -> usize {
    if (a - c[0]).abs() < (a - c[1]).abs() {
        0
    } else {
        1
    }
}

/// Whether `angles` (radians) split into two populated, separated clusters.
pub fn is_bifurcated(angles: &[f32], params: &InterpretationParams) -> bool {
    let min_cluster = params.branch_min_cluster;
    if angles.len() < 2 * min_cluster {
        return false;
    }
    let Some(split) = two_means_extrema(angles) else {
        return false;
    };
    let min_sep = params.branch_min_sep_deg * params.bifurcation_sensitivity;
    split.counts[0] >= min_cluster
        && split.counts[1] >= min_cluster
        && split.separation_deg() >= min_sep
}

/// Minimum number of pixels a line needs before its ends are inspected.
pub const MIN_BRANCH_POINTS: usize = 6;

/// Bifurcation test near `end` of a line's ordered pixel points.
///
/// Each arm of a fork is traced separately, see [`branch_angles_near`].
pub fn has_branch_near(points: &[Point], end: End, params: &InterpretationParams) -> bool {
    if points.len() < MIN_BRANCH_POINTS {
        return false;
    }
    is_bifurcated(&branch_angles_near(points, end, BRANCH_SAMPLES), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(a_deg: f32, b_deg: f32, n: usize) -> Vec<f32> {
        let mut v = vec![a_deg.to_radians(); n];
        v.extend(std::iter::repeat(b_deg.to_radians()).take(n));
        v
    }

    #[test]
    fn separated_clusters_are_flagged() {
        let params = InterpretationParams::default();
        assert!(is_bifurcated(&clusters(0.0, 50.0, 6), &params));
    }

    #[test]
    fn close_clusters_are_not_flagged() {
        let params = InterpretationParams::default();
        assert!(!is_bifurcated(&clusters(0.0, 30.0, 6), &params));
    }

    #[test]
    fn sensitivity_scales_required_separation() {
        let mut params = InterpretationParams::default();
        params.bifurcation_sensitivity = 0.5;
        assert!(is_bifurcated(&clusters(0.0, 30.0, 6), &params));
        params.bifurcation_sensitivity = 2.0;
        assert!(!is_bifurcated(&clusters(0.0, 50.0, 6), &params));
    }

    #[test]
    fn needs_enough_samples_per_group() {
        let params = InterpretationParams::default();
        // Seven samples: below 2 * min_cluster.
        assert!(!is_bifurcated(&clusters(0.0, 80.0, 4)[..7], &params));
        // Lopsided: 10 vs 2.
        let mut lopsided = vec![0.0f32; 10];
        lopsided.extend([1.4f32, 1.4]);
        assert!(!is_bifurcated(&lopsided, &params));
    }

    #[test]
    fn two_means_splits_at_extremes() {
        let split = two_means_extrema(&[0.0, 0.1, 0.2, 1.0, 1.1, 1.2]).unwrap();
        assert!((split.centroids[0] - 0.1).abs() < 1e-5);
        assert!((split.centroids[1] - 1.1).abs() < 1e-5);
        assert_eq!(split.counts, [3, 3]);
        assert!(two_means_extrema(&[]).is_none());
    }

    #[test]
    fn constant_angles_fall_into_second_group() {
        let split = two_means_extrema(&[0.5; 5]).unwrap();
        assert_eq!(split.counts, [0, 5]);
    }

    /// Pixels of a stem rising from `base` to `fork`, then two arms
    /// `arm_deg` either side of vertical, `arm_len` pixels long.
    fn y_shape(base: [f32; 2], fork: [f32; 2], arm_deg: f32, arm_len: usize) -> Vec<Point> {
        let mut pts: Vec<Point> = (0..=(base[1] - fork[1]) as usize)
            .map(|i| [base[0], base[1] - i as f32])
            .collect();
        let (s, c) = arm_deg.to_radians().sin_cos();
        for sign in [-1.0f32, 1.0] {
            for t in 1..=arm_len {
                let t = t as f32;
                pts.push([(fork[0] + sign * s * t).round(), (fork[1] - c * t).round()]);
            }
        }
        pts
    }

    #[test]
    fn forked_end_is_detected() {
        let params = InterpretationParams::default();
        let pts = y_shape([100.0, 190.0], [100.0, 110.0], 35.0, 40);
        assert!(has_branch_near(&pts, End::End, &params));
        assert!(!has_branch_near(&pts, End::Start, &params));
    }

    #[test]
    fn thick_straight_crease_is_not_forked() {
        let params = InterpretationParams::default();
        // Two edge rows either side of a dark crease, like a Sobel ring.
        let mut pts: Vec<Point> = Vec::new();
        for y in (50..190).rev() {
            for x in [97.0, 98.0, 102.0, 103.0] {
                pts.push([x, y as f32]);
            }
        }
        assert!(!has_branch_near(&pts, End::End, &params));
        assert!(!has_branch_near(&pts, End::Start, &params));
    }

    #[test]
    fn too_few_points_never_branch() {
        let mut params = InterpretationParams::default();
        params.branch_min_cluster = 2;
        let pts = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, -3.0], [4.0, -6.0]];
        assert!(!has_branch_near(&pts, End::End, &params));
    }
}
