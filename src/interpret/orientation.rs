//! Single planar de-rotation of the labeled line set.
//!
//! The baseline is the fate line when one is present (its tilt away from
//! vertical is removed), otherwise the chord-length-weighted mean direction
//! of all lines. Chords run between centerline ends, so crease thickness
//! does not skew them. Every point is rotated about the center of the union
//! bounding box, so relative geometry and point order are preserved.
use super::geometry::{centerline_chord, Canvas};
use crate::angle::fold_half_pi;
use crate::types::{DetectedLine, PalmLabel, Point};
use log::debug;
use std::f32::consts::FRAC_PI_2;

/// Lines after de-rotation.
#[derive(Clone, Debug)]
pub struct Normalized {
    pub lines: Vec<DetectedLine>,
    /// Angle (radians, image coordinates) that was removed.
    pub rotation: f32,
    pub center: Point,
}

/// Rotation to remove from `lines`.
pub fn choose_rotation(lines: &[DetectedLine]) -> f32 {
    let fate = lines
        .iter()
        .find(|l| l.label == Some(PalmLabel::Destino) && l.points.len() >= 2);
    if let Some(fate) = fate {
        let [dx, dy] = centerline_chord(&fate.points);
        if dx != 0.0 || dy != 0.0 {
            return fold_half_pi(dy.atan2(dx) + FRAC_PI_2);
        }
    }
    weighted_mean_direction(lines)
}

/// `atan2` of the summed centerline chords; 0 when every chord is degenerate.
pub fn weighted_mean_direction(lines: &[DetectedLine]) -> f32 {
    let (sx, sy) = lines.iter().fold((0.0f32, 0.0f32), |(sx, sy), l| {
        let [dx, dy] = centerline_chord(&l.points);
        (sx + dx, sy + dy)
    });
    if sx.hypot(sy) < 1e-6 {
        0.0
    } else {
        sy.atan2(sx)
    }
}

/// Rotate `p` by `angle` (radians, image coordinates) about `center`.
#[inline]
pub fn rotate_point(p: Point, angle: f32, center: Point) -> Point {
    let (s, c) = angle.sin_cos();
    let dx = p[0] - center[0];
    let dy = p[1] - center[1];
    [center[0] + dx * c - dy * s, center[1] + dx * s + dy * c]
}

/// Center of the bounding box of every point, or `None` without points.
fn union_bbox_center(lines: &[DetectedLine]) -> Option<Point> {
    let mut iter = lines.iter().flat_map(|l| l.points.iter().copied());
    let first = iter.next()?;
    let (mut lo, mut hi) = (first, first);
    for p in iter {
        lo = [lo[0].min(p[0]), lo[1].min(p[1])];
        hi = [hi[0].max(p[0]), hi[1].max(p[1])];
    }
    Some([(lo[0] + hi[0]) * 0.5, (lo[1] + hi[1]) * 0.5])
}

/// De-rotate `lines`; the input is left untouched.
pub fn normalize_rotation(lines: &[DetectedLine], canvas: Canvas) -> Normalized {
    let rotation = choose_rotation(lines);
    let center = union_bbox_center(lines).unwrap_or_else(|| canvas.center());
    debug!(
        "orientation: removing {:.2}° about ({:.1}, {:.1})",
        rotation.to_degrees(),
        center[0],
        center[1]
    );
    let lines = lines
        .iter()
        .map(|l| DetectedLine {
            points: l
                .points
                .iter()
                .map(|&p| rotate_point(p, -rotation, center))
                .collect(),
            ..l.clone()
        })
        .collect();
    Normalized {
        lines,
        rotation,
        center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(label: PalmLabel, points: Vec<Point>) -> DetectedLine {
        DetectedLine {
            points,
            angle: 0.0,
            score: 0.5,
            bbox: Default::default(),
            label: Some(label),
            avg_mag: 1.0,
            mag_ref: 1.0,
            thickness: 1.0,
        }
    }

    fn segment(a: Point, b: Point, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
            })
            .collect()
    }

    #[test]
    fn tilted_fate_line_becomes_vertical() {
        let canvas = Canvas::new(200, 200);
        let lines = vec![
            line(PalmLabel::Coracao, segment([40.0, 60.0], [160.0, 70.0], 50)),
            line(PalmLabel::Destino, segment([100.0, 190.0], [120.0, 90.0], 50)),
        ];
        let out = normalize_rotation(&lines, canvas);
        assert!(out.rotation > 0.1);
        let fate = &out.lines[1];
        let [dx, dy] = fate.chord();
        assert!(dx.abs() < 1e-3, "dx {dx}");
        assert!(dy < 0.0);
        assert_eq!(fate.points.len(), 50);

        let again = normalize_rotation(&out.lines, canvas);
        assert!(again.rotation.abs() < 1e-4);
    }

    #[test]
    fn mean_direction_is_idempotent() {
        let canvas = Canvas::new(200, 200);
        let lines = vec![
            line(PalmLabel::Coracao, segment([40.0, 60.0], [160.0, 40.0], 40)),
            line(PalmLabel::Cabeca, segment([40.0, 110.0], [150.0, 95.0], 40)),
        ];
        let out = normalize_rotation(&lines, canvas);
        assert!(out.rotation < -0.1);
        let again = normalize_rotation(&out.lines, canvas);
        assert!(again.rotation.abs() < 1e-4);
    }

    #[test]
    fn no_lines_means_no_rotation() {
        let out = normalize_rotation(&[], Canvas::new(100, 80));
        assert_eq!(out.rotation, 0.0);
        assert_eq!(out.center, [50.0, 40.0]);
        assert!(out.lines.is_empty());
    }

    #[test]
    fn rotation_preserves_distances() {
        let c = [10.0, 10.0];
        let p = rotate_point([13.0, 14.0], 0.7, c);
        let d = (p[0] - c[0]).hypot(p[1] - c[1]);
        assert!((d - 5.0).abs() < 1e-4);
    }
}
