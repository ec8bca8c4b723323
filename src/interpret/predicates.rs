//! Per-line qualitative conditions.
//!
//! Every present line gets its strength and length class first, then the
//! label-specific conditions in a fixed order. Directions and lengths are
//! measured on the centerline; mounts and bifurcations on the ordered pixel
//! points, whose fork arms the centerline would average away.
use super::bifurcation::has_branch_near;
use super::geometry::{
    centerline, direction_near, left_right_ends, length_class, mount_of_point, polyline_length,
    strength_class, Canvas, End, LengthClass, Mount, Strength,
};
use crate::angle::{circular_mean, Orientation};
use crate::params::InterpretationParams;
use crate::rules::Condition;
use crate::types::{DetectedLine, PalmLabel, Point};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

/// Conditions that hold for one label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFindings {
    pub label: PalmLabel,
    pub present: bool,
    /// Conditions in emission order; empty when the line is absent.
    pub conditions: Vec<Condition>,
}

impl LineFindings {
    pub fn absent(label: PalmLabel) -> Self {
        Self {
            label,
            present: false,
            conditions: Vec::new(),
        }
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }
}

/// Evaluate a labeled (and normalized) line. Unlabeled lines yield no
/// conditions.
pub fn line_findings(
    line: &DetectedLine,
    canvas: Canvas,
    params: &InterpretationParams,
) -> Option<LineFindings> {
    let label = line.label?;
    let center = centerline(&line.points);
    let mut out = Vec::new();

    match strength_class(line, params) {
        Some(Strength::Robust) => out.push(Condition::Robusta),
        Some(Strength::Pale) => out.push(Condition::Palida),
        None => {}
    }
    match length_class(polyline_length(&center), length_reference(label, canvas)) {
        Some(LengthClass::Long) => out.push(Condition::Longa),
        Some(LengthClass::Short) => out.push(Condition::Curta),
        None => {}
    }

    let ends = left_right_ends(&line.points);
    let right_mount = ends.map(|(_, right)| mount_of_point(right, canvas));
    match label {
        PalmLabel::Coracao => {
            heart_conditions(line, &center, ends, canvas, right_mount, params, &mut out)
        }
        PalmLabel::Cabeca => head_conditions(line, &center, right_mount, params, &mut out),
        PalmLabel::Vida => {
            let origin = line.first().map(|p| mount_of_point(p, canvas));
            if origin == Some(Mount::Venus) {
                out.push(Condition::OrigemEmVenus);
            }
        }
        PalmLabel::Destino => fate_conditions(line, &center, right_mount, params, &mut out),
    }

    Some(LineFindings {
        label,
        present: true,
        conditions: out,
    })
}

/// Canvas dimension a line's length is compared against.
pub fn length_reference(label: PalmLabel, canvas: Canvas) -> f32 {
    match label {
        PalmLabel::Coracao | PalmLabel::Cabeca => canvas.width,
        PalmLabel::Vida => canvas.width.max(canvas.height),
        PalmLabel::Destino => canvas.height,
    }
}

fn heart_conditions(
    line: &DetectedLine,
    center: &[Point],
    ends: Option<(Point, Point)>,
    canvas: Canvas,
    right_mount: Option<Mount>,
    params: &InterpretationParams,
    out: &mut Vec<Condition>,
) {
    let Some((left, _)) = ends else {
        return;
    };
    let dir = direction_near(center, End::End);
    out.push(if dir > 0.0 {
        Condition::Ascendente
    } else {
        Condition::Descendente
    });
    let toward_upper_right = dir > 0.0 && dir < FRAC_PI_2;
    if right_mount == Some(Mount::Jupiter)
        && toward_upper_right
        && has_branch_near(&line.points, End::End, params)
    {
        out.push(Condition::BifurcadaParaJupiter);
    }
    if right_mount == Some(Mount::Saturn) && (dir - FRAC_PI_2).abs() < FRAC_PI_6 {
        out.push(Condition::TerminaEmSaturno);
    }
    if mount_of_point(left, canvas) == Mount::Mercury {
        out.push(Condition::OrigemEmMercurio);
    }
}

fn head_conditions(
    line: &DetectedLine,
    center: &[Point],
    right_mount: Option<Mount>,
    params: &InterpretationParams,
    out: &mut Vec<Condition>,
) {
    let mean = circular_mean(&[
        direction_near(center, End::Start),
        direction_near(center, End::End),
    ]);
    if Orientation::of(mean) == Orientation::Diagonal {
        out.push(Condition::Diagonal);
    }
    if right_mount == Some(Mount::Jupiter) && has_branch_near(&line.points, End::End, params) {
        out.push(Condition::Ramificada);
    }
    push_termination(right_mount, out);
}

fn fate_conditions(
    line: &DetectedLine,
    center: &[Point],
    right_mount: Option<Mount>,
    params: &InterpretationParams,
    out: &mut Vec<Condition>,
) {
    let near_vertical =
        |dir: f32| (dir - FRAC_PI_2).abs() < FRAC_PI_6 || (dir + FRAC_PI_2).abs() < FRAC_PI_6;
    if near_vertical(direction_near(center, End::Start))
        || near_vertical(direction_near(center, End::End))
    {
        out.push(Condition::Vertical);
    }
    if has_branch_near(&line.points, End::End, params) {
        out.push(Condition::Ramificada);
    }
    push_termination(right_mount, out);
}

fn push_termination(right_mount: Option<Mount>, out: &mut Vec<Condition>) {
    match right_mount {
        Some(Mount::Jupiter) => out.push(Condition::TerminaEmJupiter),
        Some(Mount::Saturn) => out.push(Condition::TerminaEmSaturno),
        Some(Mount::Mercury) => out.push(Condition::TerminaEmMercurio),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_line;
    use crate::image::GradientField;
    use crate::segments::Component;

    const SIDE: usize = 200;

    fn line(label: PalmLabel, points: Vec<Point>, ratio: f32) -> DetectedLine {
        DetectedLine {
            points,
            angle: 0.0,
            score: 0.5,
            bbox: Default::default(),
            label: Some(label),
            avg_mag: ratio,
            mag_ref: 1.0,
            thickness: 1.0,
        }
    }

    fn horizontal(y: f32, x0: usize, x1: usize) -> Vec<Point> {
        (x0..x1).map(|x| [x as f32, y]).collect()
    }

    #[test]
    fn flat_heart_line_is_descending_and_short() {
        let canvas = Canvas::new(200, 200);
        let heart = line(PalmLabel::Coracao, horizontal(60.0, 60, 140), 1.5);
        let f = line_findings(&heart, canvas, &InterpretationParams::default()).unwrap();
        assert_eq!(
            f.conditions,
            vec![Condition::Robusta, Condition::Curta, Condition::Descendente]
        );
    }

    #[test]
    fn heart_rising_into_saturn() {
        let canvas = Canvas::new(200, 200);
        // Runs right, then turns straight up, ending in the middle column.
        let mut pts = horizontal(120.0, 20, 100);
        pts.extend((1..=40).map(|i| [99.0, 120.0 - i as f32]));
        let heart = line(PalmLabel::Coracao, pts, 1.0);
        let f = line_findings(&heart, canvas, &InterpretationParams::default()).unwrap();
        assert!(f.has(Condition::Ascendente));
        assert!(f.has(Condition::TerminaEmSaturno));
        assert!(!f.has(Condition::OrigemEmMercurio));
    }

    #[test]
    fn heart_origin_in_mercury() {
        let canvas = Canvas::new(200, 200);
        let heart = line(PalmLabel::Coracao, horizontal(100.0, 140, 190), 1.0);
        let f = line_findings(&heart, canvas, &InterpretationParams::default()).unwrap();
        assert!(f.has(Condition::OrigemEmMercurio));
    }

    #[test]
    fn sloped_head_line_is_diagonal_and_ends_in_mercury() {
        let canvas = Canvas::new(200, 200);
        let pts: Vec<Point> = (0..100)
            .map(|i| [40.0 + i as f32 * 1.2, 160.0 - i as f32 * 0.9])
            .collect();
        let head = line(PalmLabel::Cabeca, pts, 1.0);
        let f = line_findings(&head, canvas, &InterpretationParams::default()).unwrap();
        assert!(f.has(Condition::Diagonal));
        assert!(f.has(Condition::TerminaEmMercurio));
        assert!(!f.has(Condition::Ramificada));
    }

    #[test]
    fn life_line_from_venus() {
        let canvas = Canvas::new(200, 200);
        let pts: Vec<Point> = (0..60).map(|i| [170.0 - i as f32, 170.0 - i as f32]).collect();
        let life = line(PalmLabel::Vida, pts, 1.0);
        let f = line_findings(&life, canvas, &InterpretationParams::default()).unwrap();
        assert!(f.has(Condition::OrigemEmVenus));
    }

    #[test]
    fn upright_fate_line_is_vertical() {
        let canvas = Canvas::new(200, 200);
        let pts: Vec<Point> = (0..140).map(|i| [100.0, 190.0 - i as f32]).collect();
        let fate = line(PalmLabel::Destino, pts, 1.0);
        let f = line_findings(&fate, canvas, &InterpretationParams::default()).unwrap();
        assert!(f.has(Condition::Vertical));
        assert!(f.has(Condition::Longa));
        assert!(!f.has(Condition::Ramificada));
    }

    /// Pixel run from `from`, `deg` counter-clockwise from the +x axis with y
    /// up, `len` steps long.
    fn ray(from: (usize, usize), deg: f32, len: usize) -> Vec<(usize, usize)> {
        let (s, c) = deg.to_radians().sin_cos();
        (0..=len)
            .map(|t| {
                let t = t as f32;
                (
                    (from.0 as f32 + c * t).round() as usize,
                    (from.1 as f32 - s * t).round() as usize,
                )
            })
            .collect()
    }

    /// Axis-aligned stem from `start` to `fork`, then one ray per arm angle.
    fn forked(
        start: (usize, usize),
        fork: (usize, usize),
        arms_deg: &[f32],
        arm_len: usize,
    ) -> Vec<(usize, usize)> {
        let mut pixels: Vec<(usize, usize)> = if start.1 == fork.1 {
            (start.0..=fork.0).map(|x| (x, start.1)).collect()
        } else {
            (fork.1..=start.1).map(|y| (start.0, y)).collect()
        };
        for &deg in arms_deg {
            pixels.extend(ray(fork, deg, arm_len));
        }
        pixels
    }

    /// Run `pixels` through feature extraction, as a flood-fill component.
    fn traced(label: PalmLabel, pixels: &[(usize, usize)]) -> DetectedLine {
        let mut mag = GradientField::new(SIDE, SIDE);
        let mut indices: Vec<usize> = pixels.iter().map(|&(x, y)| y * SIDE + x).collect();
        indices.sort_unstable();
        indices.dedup();
        for &i in &indices {
            mag.set(i % SIDE, i / SIDE, 1.0);
        }
        let mut line = extract_line(&Component { indices }, &mag, 1.0).unwrap();
        line.label = Some(label);
        line
    }

    fn findings_of(line: &DetectedLine) -> LineFindings {
        line_findings(line, Canvas::new(SIDE, SIDE), &InterpretationParams::default()).unwrap()
    }

    #[test]
    fn forked_fate_line_is_ramified() {
        // Upright stem splitting into two arms 35° either side of vertical.
        let fate = traced(PalmLabel::Destino, &forked((100, 190), (100, 110), &[55.0, 125.0], 40));
        let f = findings_of(&fate);
        assert!(f.has(Condition::Ramificada), "{:?}", f.conditions);
        assert!(f.has(Condition::Vertical));
        assert!(f.has(Condition::TerminaEmSaturno));
    }

    #[test]
    fn thick_straight_fate_line_is_not_ramified() {
        let pixels: Vec<_> = (50..=190)
            .flat_map(|y| (99..=101).map(move |x| (x, y)))
            .collect();
        let f = findings_of(&traced(PalmLabel::Destino, &pixels));
        assert!(f.has(Condition::Vertical));
        assert!(!f.has(Condition::Ramificada), "{:?}", f.conditions);
    }

    #[test]
    fn fate_line_termination_follows_upper_end() {
        // Leaning right as it rises, so the upper end is the rightmost point.
        let fate_from = |x0: f32, top: f32| {
            let pts: Vec<Point> = (0..=130)
                .map(|i| [x0 + i as f32 * 0.1, 190.0 - i as f32 * (190.0 - top) / 130.0])
                .collect();
            findings_of(&line(PalmLabel::Destino, pts, 1.0))
        };
        let terminations = [
            Condition::TerminaEmJupiter,
            Condition::TerminaEmSaturno,
            Condition::TerminaEmMercurio,
        ];
        for (x0, expected) in [
            (40.0, Some(Condition::TerminaEmJupiter)),
            (95.0, Some(Condition::TerminaEmSaturno)),
            (150.0, Some(Condition::TerminaEmMercurio)),
        ] {
            let f = fate_from(x0, 60.0);
            assert!(f.has(Condition::Vertical));
            for c in terminations {
                assert_eq!(f.has(c), Some(c) == expected, "x0 {x0}: {:?}", f.conditions);
            }
        }
        // Reaching into the sun band names no mount.
        let f = fate_from(95.0, 30.0);
        assert!(terminations.iter().all(|&c| !f.has(c)), "{:?}", f.conditions);
    }

    #[test]
    fn heart_forking_into_jupiter() {
        // Runs right, then splits into a flat arm and a steep one.
        let heart = traced(PalmLabel::Coracao, &forked((10, 100), (30, 100), &[10.0, 80.0], 30));
        let f = findings_of(&heart);
        assert!(f.has(Condition::Ascendente));
        assert!(f.has(Condition::BifurcadaParaJupiter), "{:?}", f.conditions);

        // Same fork ending in mercury.
        let shifted = traced(
            PalmLabel::Coracao,
            &forked((90, 100), (110, 100), &[10.0, 80.0], 30),
        );
        assert!(!findings_of(&shifted).has(Condition::BifurcadaParaJupiter));
    }

    #[test]
    fn head_line_ramified_toward_jupiter() {
        let head = traced(PalmLabel::Cabeca, &forked((8, 120), (28, 120), &[5.0, 70.0], 30));
        let f = findings_of(&head);
        assert!(f.has(Condition::Ramificada), "{:?}", f.conditions);
        assert!(f.has(Condition::TerminaEmJupiter));

        let unforked = traced(PalmLabel::Cabeca, &forked((8, 120), (28, 120), &[5.0], 30));
        let f = findings_of(&unforked);
        assert!(!f.has(Condition::Ramificada), "{:?}", f.conditions);
        assert!(f.has(Condition::TerminaEmJupiter));
    }

    #[test]
    fn unlabeled_line_has_no_findings() {
        let mut l = line(PalmLabel::Vida, horizontal(10.0, 0, 10), 1.0);
        l.label = None;
        assert!(line_findings(&l, Canvas::new(50, 50), &InterpretationParams::default()).is_none());
    }
}
