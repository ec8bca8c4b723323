//! Heuristic labeling of detected lines.
//!
//! Each line is tested against the four label rules in a fixed order and
//! takes the first one it satisfies:
//!
//! | label   | orientation            | band (bbox center)       | length            |
//! |---------|------------------------|--------------------------|-------------------|
//! | coracao | horizontal             | 0.20 ≤ y/H ≤ 0.40        | > 0.35·W          |
//! | cabeca  | horizontal or diagonal | 0.40 ≤ y/H ≤ 0.60        | > 0.35·W          |
//! | destino | vertical               | 0.40 ≤ x/W ≤ 0.60        | > 0.40·H          |
//! | vida    | diagonal               | 0.20 ≤ x/W ≤ 0.45        | > 0.35·max(W, H)  |
//!
//! Length is the major bbox extent. After labeling only the highest-scoring
//! line per label is kept.
use crate::angle::Orientation;
use crate::types::{DetectedLine, PalmLabel};
use log::debug;

/// Label `line` on a `width × height` canvas, or `None` if no rule matches.
pub fn classify(line: &DetectedLine, width: usize, height: usize) -> Option<PalmLabel> {
    let (w, h) = (width as f32, height as f32);
    let [cx, cy] = line.bbox.center();
    let norm_x = cx / w;
    let norm_y = cy / h;
    let len = line.bbox.major_extent() as f32;
    let orientation = Orientation::of(line.angle);
    let horizontal = orientation == Orientation::Horizontal;
    let vertical = orientation == Orientation::Vertical;
    let diagonal = orientation == Orientation::Diagonal;

    if horizontal && (0.2..=0.4).contains(&norm_y) && len > 0.35 * w {
        return Some(PalmLabel::Coracao);
    }
    if (horizontal || diagonal) && (0.4..=0.6).contains(&norm_y) && len > 0.35 * w {
        return Some(PalmLabel::Cabeca);
    }
    if vertical && (0.4..=0.6).contains(&norm_x) && len > 0.4 * h {
        return Some(PalmLabel::Destino);
    }
    if diagonal && (0.2..=0.45).contains(&norm_x) && len > 0.35 * w.max(h) {
        return Some(PalmLabel::Vida);
    }
    None
}

/// Label every line and keep the best-scoring one per label.
///
/// Output follows [`PalmLabel::DETECTION_ORDER`]; labels without a candidate
/// are absent. On equal scores the earlier line wins.
pub fn select_best(lines: Vec<DetectedLine>, width: usize, height: usize) -> Vec<DetectedLine> {
    let mut best: [Option<DetectedLine>; 4] = [None, None, None, None];
    let mut unlabeled = 0usize;
    for mut line in lines {
        let Some(label) = classify(&line, width, height) else {
            unlabeled += 1;
            continue;
        };
        line.label = Some(label);
        let slot = slot_of(label);
        let replace = match &best[slot] {
            Some(current) => line.score > current.score,
            None => true,
        };
        if replace {
            best[slot] = Some(line);
        }
    }
    debug!("classify: {unlabeled} candidate(s) matched no label");
    best.into_iter().flatten().collect()
}

fn slot_of(label: PalmLabel) -> usize {
    match label {
        PalmLabel::Vida => 0,
        PalmLabel::Cabeca => 1,
        PalmLabel::Coracao => 2,
        PalmLabel::Destino => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BBox;
    use std::f32::consts::FRAC_PI_2;

    fn line(bbox: BBox, angle: f32, score: f32) -> DetectedLine {
        DetectedLine {
            points: Vec::new(),
            angle,
            score,
            bbox,
            label: None,
            avg_mag: 1.0,
            mag_ref: 1.0,
            thickness: 1.0,
        }
    }

    #[test]
    fn labels_each_zone() {
        let (w, h) = (200, 200);
        let heart = line(BBox { x: 40, y: 58, w: 100, h: 4 }, 0.0, 0.5);
        let head = line(BBox { x: 40, y: 98, w: 100, h: 4 }, 0.0, 0.5);
        let fate = line(BBox { x: 98, y: 40, w: 4, h: 100 }, FRAC_PI_2, 0.5);
        let life = line(BBox { x: 20, y: 100, w: 60, h: 80 }, 2.2, 0.4);
        assert_eq!(classify(&heart, w, h), Some(PalmLabel::Coracao));
        assert_eq!(classify(&head, w, h), Some(PalmLabel::Cabeca));
        assert_eq!(classify(&fate, w, h), Some(PalmLabel::Destino));
        assert_eq!(classify(&life, w, h), Some(PalmLabel::Vida));
    }

    #[test]
    fn short_or_misplaced_lines_are_unlabeled() {
        let (w, h) = (200, 200);
        let short = line(BBox { x: 40, y: 58, w: 60, h: 4 }, 0.0, 0.3);
        let low = line(BBox { x: 40, y: 170, w: 120, h: 4 }, 0.0, 0.6);
        assert_eq!(classify(&short, w, h), None);
        assert_eq!(classify(&low, w, h), None);
    }

    #[test]
    fn keeps_one_line_per_label() {
        let (w, h) = (200, 200);
        let lines = vec![
            line(BBox { x: 40, y: 58, w: 80, h: 4 }, 0.0, 0.4),
            line(BBox { x: 30, y: 60, w: 120, h: 4 }, 0.0, 0.6),
            line(BBox { x: 35, y: 62, w: 100, h: 4 }, 0.1, 0.5),
            line(BBox { x: 98, y: 40, w: 4, h: 100 }, FRAC_PI_2, 0.5),
        ];
        let best = select_best(lines, w, h);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].label, Some(PalmLabel::Coracao));
        assert_eq!(best[0].score, 0.6);
        assert_eq!(best[1].label, Some(PalmLabel::Destino));
    }

    #[test]
    fn output_follows_detection_order() {
        let (w, h) = (200, 200);
        let lines = vec![
            line(BBox { x: 98, y: 40, w: 4, h: 100 }, FRAC_PI_2, 0.5),
            line(BBox { x: 40, y: 58, w: 100, h: 4 }, 0.0, 0.5),
            line(BBox { x: 20, y: 100, w: 60, h: 80 }, 2.2, 0.4),
            line(BBox { x: 40, y: 98, w: 100, h: 4 }, 0.0, 0.5),
        ];
        let labels: Vec<_> = select_best(lines, w, h)
            .into_iter()
            .map(|l| l.label.unwrap())
            .collect();
        assert_eq!(labels, PalmLabel::DETECTION_ORDER.to_vec());
    }
}
