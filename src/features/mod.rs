//! Per-component measurements and point ordering.
//!
//! For each connected component this stage computes:
//! - the pixel bounding box;
//! - the principal angle: the pixel coordinates are summarized online and
//!   the 2×2 covariance matrix is eigendecomposed; the eigenvector of the
//!   larger eigenvalue gives the dominant direction, reported in [0, π];
//! - `score`: major bbox extent over the shorter canvas side;
//! - `avg_mag`: mean gradient magnitude over the member pixels;
//! - `thickness`: pixel count per unit of major extent.
//!
//! The flood fill leaves pixels in discovery order, which says nothing about
//! where the ridge starts or ends. Points are therefore sorted by their
//! projection on the principal axis before they are stored on the line.
//! Mostly horizontal lines run left → right, mostly vertical lines run
//! bottom → top, so "start" and "end" mean the same thing for every line of
//! a given shape.

mod accumulator;

use crate::image::GradientField;
use crate::segments::Component;
use crate::types::{BBox, DetectedLine, Point};
use accumulator::ComponentAccumulator;
use nalgebra::{Matrix2, SymmetricEigen};

/// Measure every component against the magnitude field.
pub fn extract_lines(
    components: &[Component],
    mag: &GradientField,
    mag_ref: f32,
) -> Vec<DetectedLine> {
    components
        .iter()
        .filter_map(|c| extract_line(c, mag, mag_ref))
        .collect()
}

/// Build an unlabeled [`DetectedLine`] from one component. `None` for an
/// empty component.
pub fn extract_line(
    component: &Component,
    mag: &GradientField,
    mag_ref: f32,
) -> Option<DetectedLine> {
    let width = mag.w;
    let height = mag.h;
    let mut acc = ComponentAccumulator::new();
    for &idx in &component.indices {
        acc.push(idx % width, idx / width, mag.data[idx]);
    }
    if acc.is_empty() {
        return None;
    }

    let bbox = BBox {
        x: acc.min_x,
        y: acc.min_y,
        w: acc.max_x - acc.min_x + 1,
        h: acc.max_y - acc.min_y + 1,
    };
    let axis = principal_axis(&acc);
    let angle = (axis[1] as f32).atan2(axis[0] as f32);
    let major = bbox.major_extent().max(1) as f32;
    let score = bbox.major_extent() as f32 / width.min(height).max(1) as f32;
    let thickness = acc.count as f32 / major;
    let points = order_along_axis(&component.indices, width, acc.centroid(), axis);

    Some(DetectedLine {
        points,
        angle,
        score,
        bbox,
        label: None,
        avg_mag: acc.avg_mag(),
        mag_ref,
        thickness,
    })
}

fn principal_axis(acc: &ComponentAccumulator) -> [f64; 2] {
    let (cxx, cxy, cyy) = acc.covariance();
    dominant_axis(cxx, cxy, cyy).unwrap_or([1.0, 0.0])
}

/// Unit eigenvector of the larger eigenvalue of the covariance
/// `[[cxx, cxy], [cxy, cyy]]`, with `vy >= 0` (and `vx >= 0` when `vy == 0`).
/// `None` when the spread vanishes.
pub fn dominant_axis(cxx: f64, cxy: f64, cyy: f64) -> Option<[f64; 2]> {
    if !(cxx + cyy).is_finite() || cxx + cyy < 1e-12 {
        return None;
    }
    let eig = SymmetricEigen::new(Matrix2::new(cxx, cxy, cxy, cyy));
    let vmax = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        eig.eigenvectors.column(0)
    } else {
        eig.eigenvectors.column(1)
    };
    let (mut vx, mut vy) = (vmax[0], vmax[1]);
    let norm = (vx * vx + vy * vy).sqrt();
    if !norm.is_finite() || norm < 1e-12 {
        return None;
    }
    vx /= norm;
    vy /= norm;
    if vy < 0.0 || (vy == 0.0 && vx < 0.0) {
        vx = -vx;
        vy = -vy;
    }
    Some([vx, vy])
}

/// Sort pixel indices by projection on the traversal direction derived from
/// `axis`; ties keep raster order.
fn order_along_axis(
    indices: &[usize],
    width: usize,
    centroid: [f64; 2],
    axis: [f64; 2],
) -> Vec<Point> {
    let [ax, ay] = axis;
    let dir = if ax.abs() >= ay.abs() {
        if ax < 0.0 {
            [-ax, -ay]
        } else {
            [ax, ay]
        }
    } else {
        // `ay > 0` here; walk toward smaller y (up the image).
        [-ax, -ay]
    };

    let mut keyed: Vec<(f64, usize)> = indices
        .iter()
        .map(|&idx| {
            let dx = (idx % width) as f64 - centroid[0];
            let dy = (idx / width) as f64 - centroid[1];
            (dx * dir[0] + dy * dir[1], idx)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    keyed
        .into_iter()
        .map(|(_, idx)| [(idx % width) as f32, (idx / width) as f32])
        .collect()
}
