//! Geometric predicates over (normalized) line points.
//!
//! Tangent angles are measured counter-clockwise with y pointing up, toward
//! the fingers: a segment going right and up the image has a positive angle.
use crate::angle::circular_mean;
use crate::features::dominant_axis;
use crate::params::InterpretationParams;
use crate::types::{DetectedLine, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Segments averaged for the direction near an end.
pub const DIRECTION_SAMPLES: usize = 12;

const TOP_BAND: f32 = 0.25;
const BOTTOM_BAND: f32 = 0.75;
const LEFT_BAND: f32 = 0.33;
const RIGHT_BAND: f32 = 0.67;
const VENUS_LEFT: f32 = 0.6;
const VENUS_TOP: f32 = 0.6;

/// Cross-section runs split on gaps wider than this many mean section sizes.
const RUN_GAP_FACTOR: f32 = 2.0;
const MIN_RUN_GAP: f32 = 2.0;

const LONG_RATIO: f32 = 0.6;
const SHORT_RATIO: f32 = 0.45;

/// Canvas the lines were detected on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn center(&self) -> Point {
        [self.width * 0.5, self.height * 0.5]
    }
}

/// Named palm zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mount {
    Sun,
    Inferior,
    Jupiter,
    Mercury,
    Venus,
    Saturn,
}

/// Zone containing `p`.
///
/// Checked in order: top band → sun, lower-right pocket → venus, bottom band
/// → inferior, left third → jupiter, right third → mercury, else saturn.
pub fn mount_of_point(p: Point, canvas: Canvas) -> Mount {
    let fx = p[0] / canvas.width.max(1e-6);
    let fy = p[1] / canvas.height.max(1e-6);
    if fy <= TOP_BAND {
        Mount::Sun
    } else if fx > VENUS_LEFT && fy > VENUS_TOP {
        Mount::Venus
    } else if fy >= BOTTOM_BAND {
        Mount::Inferior
    } else if fx <= LEFT_BAND {
        Mount::Jupiter
    } else if fx >= RIGHT_BAND {
        Mount::Mercury
    } else {
        Mount::Saturn
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strength {
    Robust,
    Pale,
}

/// Robust wins over pale; `None` is the neutral band.
pub fn strength_class(line: &DetectedLine, params: &InterpretationParams) -> Option<Strength> {
    let ratio = line.avg_mag / line.mag_ref.max(1e-6);
    let thickness = line.thickness;
    if ratio >= params.mag_robust_ratio || thickness >= params.thickness_robust_ratio {
        Some(Strength::Robust)
    } else if ratio <= params.mag_pale_ratio || thickness <= params.thickness_pale_ratio {
        Some(Strength::Pale)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthClass {
    Long,
    Short,
}

pub fn length_class(length: f32, reference: f32) -> Option<LengthClass> {
    let ratio = length / reference.max(1e-6);
    if ratio >= LONG_RATIO {
        Some(LengthClass::Long)
    } else if ratio <= SHORT_RATIO {
        Some(LengthClass::Short)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum End {
    Start,
    End,
}

/// Tangent angle of the segment `a → b`, y up.
#[inline]
pub fn tangent_angle(a: Point, b: Point) -> f32 {
    (a[1] - b[1]).atan2(b[0] - a[0])
}

/// Tangent angles of up to `max_samples` consecutive segments nearest `end`,
/// listed from the end inward.
pub fn segment_angles_near(points: &[Point], end: End, max_samples: usize) -> Vec<f32> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let k = max_samples.min(n - 1);
    (0..k)
        .map(|i| {
            let j = match end {
                End::Start => i,
                End::End => n - 2 - i,
            };
            tangent_angle(points[j], points[j + 1])
        })
        .collect()
}

/// Circular mean of the tangents nearest `end`; 0 for fewer than two points.
pub fn direction_near(points: &[Point], end: End) -> f32 {
    circular_mean(&segment_angles_near(points, end, DIRECTION_SAMPLES))
}

pub fn polyline_length(points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
        .sum()
}

/// Collapse ordered pixel points into a one-sample-per-pixel-step polyline.
///
/// Every cross-section (see [`cross_sections`]) is replaced by its mean.
/// A one-pixel-wide line maps onto itself.
pub fn centerline(points: &[Point]) -> Vec<Point> {
    match cross_sections(points) {
        Some(sections) => sections.iter().map(|s| mean_point(s)).collect(),
        None => points.to_vec(),
    }
}

/// First → last vector of the centerline; zero for fewer than two points.
pub fn centerline_chord(points: &[Point]) -> [f32; 2] {
    let center = centerline(points);
    match (center.first(), center.last()) {
        (Some(a), Some(b)) if center.len() >= 2 => [b[0] - a[0], b[1] - a[1]],
        _ => [0.0, 0.0],
    }
}

/// Tangent angles near `end`, following every arm of a possibly forked line.
///
/// The `max_samples + 1` cross-sections nearest `end` are split into runs
/// wherever neighbouring offsets across the axis differ by more than twice
/// the mean cross-section size. Walking inward from `end`, each run extends
/// the nearest track of the previous section, so the arms of a fork become
/// separate tracks while one thick crease stays on one. Angles are listed
/// from the end inward, alternating between tracks. A line without a fork
/// yields the angles of its centerline.
pub fn branch_angles_near(points: &[Point], end: End, max_samples: usize) -> Vec<f32> {
    let Some(mut sections) = cross_sections(points) else {
        return Vec::new();
    };
    let mean_size = points.len() as f32 / sections.len() as f32;
    let gap = (RUN_GAP_FACTOR * mean_size).max(MIN_RUN_GAP);
    let reach = 2.0 * gap;
    if end == End::End {
        sections.reverse();
    }

    let mut tracks: Vec<Vec<Point>> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    for section in sections.iter().take(max_samples + 1) {
        let runs = section_runs(section, gap);
        let mut links: Vec<(f32, usize, usize)> = Vec::new();
        for (r, run) in runs.iter().enumerate() {
            for &t in &open {
                if let Some(last) = tracks[t].last() {
                    let d = (run[0] - last[0]).hypot(run[1] - last[1]);
                    if d <= reach {
                        links.push((d, r, t));
                    }
                }
            }
        }
        links.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut run_track: Vec<Option<usize>> = vec![None; runs.len()];
        let mut claimed = vec![false; tracks.len()];
        for (_, r, t) in links {
            if run_track[r].is_none() && !claimed[t] {
                run_track[r] = Some(t);
                claimed[t] = true;
            }
        }
        open.clear();
        for (run, linked) in runs.into_iter().zip(run_track) {
            let t = linked.unwrap_or_else(|| {
                tracks.push(Vec::new());
                tracks.len() - 1
            });
            tracks[t].push(run);
            open.push(t);
        }
    }

    // Tracks were walked inward; angles keep the start → end direction.
    let per_track: Vec<Vec<f32>> = tracks
        .iter()
        .map(|track| {
            track
                .windows(2)
                .map(|w| match end {
                    End::Start => tangent_angle(w[0], w[1]),
                    End::End => tangent_angle(w[1], w[0]),
                })
                .collect()
        })
        .collect();
    let longest = per_track.iter().map(Vec::len).max().unwrap_or(0);
    let mut angles = Vec::with_capacity(max_samples);
    for i in 0..longest {
        angles.extend(per_track.iter().filter_map(|track| track.get(i).copied()));
    }
    angles.truncate(max_samples);
    angles
}

/// One cross-section: `(offset across the axis, point)` pairs sorted by
/// offset.
type Section = Vec<(f32, Point)>;

/// Points grouped into one-pixel steps along their principal direction.
///
/// The direction is oriented along the first → last chord; each point goes
/// to the bin of its rounded projection. Bins come back in axis order, empty
/// ones skipped. `None` when the points do not span a direction.
fn cross_sections(points: &[Point]) -> Option<Vec<Section>> {
    let first = *points.first()?;
    let last = *points.last()?;
    let [mut ux, mut uy] = principal_direction(points)?;
    if (last[0] - first[0]) * ux + (last[1] - first[1]) * uy < 0.0 {
        ux = -ux;
        uy = -uy;
    }

    let mut bins: BTreeMap<i64, Section> = BTreeMap::new();
    for &p in points {
        let dx = p[0] - first[0];
        let dy = p[1] - first[1];
        let along = dx * ux + dy * uy;
        let across = dy * ux - dx * uy;
        bins.entry(along.round() as i64).or_default().push((across, p));
    }
    Some(
        bins.into_values()
            .map(|mut section| {
                section.sort_by(|a, b| a.0.total_cmp(&b.0));
                section
            })
            .collect(),
    )
}

/// Mean point of each run of `section` whose neighbouring offsets are at
/// most `gap` apart.
fn section_runs(section: &[(f32, Point)], gap: f32) -> Vec<Point> {
    section
        .chunk_by(|a, b| b.0 - a.0 <= gap)
        .map(mean_point)
        .collect()
}

fn mean_point(items: &[(f32, Point)]) -> Point {
    let (sx, sy) = items.iter().fold((0.0f64, 0.0f64), |(sx, sy), (_, p)| {
        (sx + p[0] as f64, sy + p[1] as f64)
    });
    let n = items.len().max(1) as f64;
    [(sx / n) as f32, (sy / n) as f32]
}

/// Unit direction of the dominant axis of `points`; `None` when they all
/// coincide.
fn principal_direction(points: &[Point]) -> Option<[f32; 2]> {
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0f64, 0.0f64), |(sx, sy), p| {
        (sx + p[0] as f64, sy + p[1] as f64)
    });
    let (mx, my) = (sx / n, sy / n);
    let (mut cxx, mut cxy, mut cyy) = (0.0f64, 0.0f64, 0.0f64);
    for p in points {
        let dx = p[0] as f64 - mx;
        let dy = p[1] as f64 - my;
        cxx += dx * dx;
        cxy += dx * dy;
        cyy += dy * dy;
    }
    let [vx, vy] = dominant_axis(cxx / n, cxy / n, cyy / n)?;
    Some([vx as f32, vy as f32])
}

/// Points with the smallest and the largest x (first occurrence wins).
pub fn left_right_ends(points: &[Point]) -> Option<(Point, Point)> {
    let mut iter = points.iter().copied();
    let first = iter.next()?;
    let (mut left, mut right) = (first, first);
    for p in iter {
        if p[0] < left[0] {
            left = p;
        }
        if p[0] > right[0] {
            right = p;
        }
    }
    Some((left, right))
}
