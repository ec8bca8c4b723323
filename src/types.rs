use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in image coordinates (x right, y down).
pub type Point = [f32; 2];

/// Anatomical label of a palm line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PalmLabel {
    /// Life line.
    Vida,
    /// Head line.
    Cabeca,
    /// Heart line.
    Coracao,
    /// Fate line.
    Destino,
}

impl PalmLabel {
    /// Order in which detected lines are reported.
    pub const DETECTION_ORDER: [PalmLabel; 4] = [
        PalmLabel::Vida,
        PalmLabel::Cabeca,
        PalmLabel::Coracao,
        PalmLabel::Destino,
    ];

    /// Order in which the narrative is assembled.
    pub const NARRATIVE_ORDER: [PalmLabel; 4] = [
        PalmLabel::Coracao,
        PalmLabel::Cabeca,
        PalmLabel::Vida,
        PalmLabel::Destino,
    ];

    /// Key used by the rules document.
    pub fn key(self) -> &'static str {
        match self {
            PalmLabel::Vida => "vida",
            PalmLabel::Cabeca => "cabeca",
            PalmLabel::Coracao => "coracao",
            PalmLabel::Destino => "destino",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::DETECTION_ORDER.into_iter().find(|l| l.key() == key)
    }
}

impl fmt::Display for PalmLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Axis-aligned pixel bounding box; `w` and `h` count pixels (inclusive extent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl BBox {
    pub fn center(&self) -> Point {
        [
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        ]
    }

    /// Longest side; the length proxy used by the classifier.
    pub fn major_extent(&self) -> usize {
        self.w.max(self.h)
    }
}

/// Candidate ridge line built from one connected component.
///
/// `points` holds one entry per component pixel, ordered along the principal
/// axis (left → right for mostly horizontal lines, bottom → top otherwise).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLine {
    pub points: Vec<Point>,
    /// Principal-axis angle in radians, in [0, π].
    pub angle: f32,
    /// Major bbox extent relative to the shorter canvas side.
    pub score: f32,
    pub bbox: BBox,
    pub label: Option<PalmLabel>,
    /// Mean gradient magnitude over the member pixels.
    pub avg_mag: f32,
    /// Magnitude cutoff the component was segmented with.
    pub mag_ref: f32,
    /// Pixel count per unit of major extent.
    pub thickness: f32,
}

impl DetectedLine {
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Vector from the first to the last point; zero for fewer than two points.
    pub fn chord(&self) -> [f32; 2] {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) if self.points.len() >= 2 => [b[0] - a[0], b[1] - a[1]],
            _ => [0.0, 0.0],
        }
    }
}
