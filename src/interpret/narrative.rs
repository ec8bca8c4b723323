//! Rule-table lookup turning findings into text.
use super::geometry::Canvas;
use super::orientation::normalize_rotation;
use super::predicates::{line_findings, LineFindings};
use crate::params::InterpretationParams;
use crate::rules::{Condition, RulesTable};
use crate::types::{DetectedLine, PalmLabel};
use log::debug;
use serde::{Deserialize, Serialize};

/// Outcome of the interpretation stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    /// Angle removed by the orientation normalizer (radians).
    pub rotation: f32,
    /// One entry per label, in narrative order.
    pub findings: Vec<LineFindings>,
    pub narrative: String,
}

/// Normalize orientation and evaluate every label.
///
/// Returns the removed rotation and one [`LineFindings`] per label in
/// [`PalmLabel::NARRATIVE_ORDER`]; labels without a line are reported absent.
pub fn analyze_lines(
    lines: &[DetectedLine],
    canvas: Canvas,
    params: &InterpretationParams,
) -> (f32, Vec<LineFindings>) {
    let normalized = normalize_rotation(lines, canvas);
    let findings = PalmLabel::NARRATIVE_ORDER
        .into_iter()
        .map(|label| {
            normalized
                .lines
                .iter()
                .find(|l| l.label == Some(label))
                .and_then(|l| line_findings(l, canvas, params))
                .unwrap_or_else(|| LineFindings::absent(label))
        })
        .collect();
    (normalized.rotation, findings)
}

/// Join the fragments for `findings`, in order, with single spaces.
///
/// Each label contributes its presence or absence fragment followed by the
/// fragments of its conditions. Missing or empty fragments are skipped.
pub fn render(findings: &[LineFindings], rules: &RulesTable) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for f in findings {
        let presence = if f.present {
            Condition::Presenca
        } else {
            Condition::Ausencia
        };
        parts.extend(rules.get(f.label, presence));
        parts.extend(f.conditions.iter().filter_map(|&c| rules.get(f.label, c)));
    }
    debug!("narrative: {} fragment(s)", parts.len());
    parts.join(" ")
}

/// Full interpretation of a labeled line set.
pub fn interpret(
    lines: &[DetectedLine],
    canvas: Canvas,
    rules: &RulesTable,
    params: &InterpretationParams,
) -> Interpretation {
    let (rotation, findings) = analyze_lines(lines, canvas, params);
    let narrative = render(&findings, rules);
    Interpretation {
        rotation,
        findings,
        narrative,
    }
}
