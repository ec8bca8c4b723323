//! Palm reader orchestrating detection and interpretation.
//!
//! Stages
//! - Preprocess: RGBA → luma, optional contrast stretch and gamma.
//! - Gradient: interior Sobel magnitude.
//! - Segment: percentile threshold, 8-connected components.
//! - Features: bbox, principal angle, score, intensity metrics, point order.
//! - Classify: label and keep the best line per label.
//! - Interpret: de-rotate, evaluate conditions, render the rule table.
//!
//! Typical usage:
//! ```no_run
//! use palm_reader::{PalmParams, PalmReader, RasterImage, RulesTable};
//!
//! # fn example(rgba: &[u8], w: usize, h: usize, rules: RulesTable) -> palm_reader::Result<()> {
//! let reader = PalmReader::new(PalmParams::default());
//! let image = RasterImage::new(w, h, rgba)?;
//! let result = reader.process(image, Some(&rules))?;
//! println!("{} line(s): {}", result.lines.len(), result.narrative);
//! # Ok(())
//! # }
//! ```

use crate::classify::select_best;
use crate::diagnostics::{elapsed_ms, DetectionStats, TimingBreakdown};
use crate::edges::sobel_magnitude;
use crate::error::{PalmError, Result};
use crate::features::extract_lines;
use crate::image::RasterImage;
use crate::interpret::{self, Canvas, LineFindings};
use crate::params::{DetectionParams, PalmParams};
use crate::preprocess::to_intensity;
use crate::rules::RulesTable;
use crate::segments::segment;
use crate::types::DetectedLine;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Why a run finished without a full narrative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DegradedReason {
    /// No rule table was supplied.
    MissingRules,
    /// The supplied rule document could not be read as a table.
    MalformedRules(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultStatus {
    #[default]
    Complete,
    Degraded(DegradedReason),
}

impl ResultStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ResultStatus::Complete)
    }
}

/// Everything one run produces. Always returned for a valid image, even
/// with zero detected lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub width: usize,
    pub height: usize,
    /// Labeled lines in detection order, in image coordinates.
    pub lines: Vec<DetectedLine>,
    /// One entry per label, in narrative order.
    pub findings: Vec<LineFindings>,
    pub narrative: String,
    /// Angle removed by orientation normalization (radians).
    pub rotation: f32,
    pub status: ResultStatus,
    pub stats: DetectionStats,
    pub timing: TimingBreakdown,
    pub latency_ms: f64,
}

/// Output of the image-space stages.
#[derive(Clone, Debug)]
pub struct Detection {
    /// Best line per label, in detection order.
    pub lines: Vec<DetectedLine>,
    pub stats: DetectionStats,
}

/// Run the image-space stages on `image`.
pub fn detect_lines(
    image: RasterImage<'_>,
    params: DetectionParams,
    timing: &mut TimingBreakdown,
) -> Result<Detection> {
    image.validate()?;
    let intensity = timing.measure("preprocess", || to_intensity(&image, &params));
    let mag = timing.measure("gradient", || sobel_magnitude(&intensity));
    let seg = timing.measure("segment", || segment(&mag, &params));
    debug!(
        "segment: threshold={:.4} foreground={} components={}",
        seg.threshold,
        seg.foreground,
        seg.components.len()
    );
    let candidates = timing.measure("features", || {
        extract_lines(&seg.components, &mag, seg.threshold)
    });
    let lines = timing.measure("classify", || select_best(candidates, image.w, image.h));
    debug!("classify: kept {} labeled line(s)", lines.len());

    Ok(Detection {
        stats: DetectionStats {
            threshold: seg.threshold,
            foreground_pixels: seg.foreground,
            components: seg.components.len(),
            labeled: lines.len(),
        },
        lines,
    })
}

/// Stateless front end holding the parameter set for the next run.
#[derive(Clone, Debug, Default)]
pub struct PalmReader {
    params: PalmParams,
}

impl PalmReader {
    pub fn new(params: PalmParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> PalmParams {
        self.params
    }

    /// Replace the parameters used by subsequent runs.
    pub fn set_params(&mut self, params: PalmParams) {
        self.params = params;
    }

    /// Analyze one photo. Without a rule table the run completes with an
    /// empty narrative and a degraded status.
    pub fn process(
        &self,
        image: RasterImage<'_>,
        rules: Option<&RulesTable>,
    ) -> Result<AnalysisResult> {
        let status = match rules {
            Some(_) => ResultStatus::Complete,
            None => ResultStatus::Degraded(DegradedReason::MissingRules),
        };
        let empty = RulesTable::new();
        self.run(image, rules.unwrap_or(&empty), status)
    }

    /// Like [`process`](Self::process), taking the rule document as JSON
    /// text. A malformed document degrades the result instead of failing.
    pub fn process_with_rules_json(
        &self,
        image: RasterImage<'_>,
        rules_json: Option<&str>,
    ) -> Result<AnalysisResult> {
        let Some(text) = rules_json else {
            return self.process(image, None);
        };
        match RulesTable::from_json_str(text) {
            Ok(rules) => self.process(image, Some(&rules)),
            Err(PalmError::MalformedRules { reason }) => {
                warn!("rules rejected, narrative will be empty: {reason}");
                let status = ResultStatus::Degraded(DegradedReason::MalformedRules(reason));
                self.run(image, &RulesTable::new(), status)
            }
            Err(e) => Err(e),
        }
    }

    fn run(
        &self,
        image: RasterImage<'_>,
        rules: &RulesTable,
        status: ResultStatus,
    ) -> Result<AnalysisResult> {
        // Snapshot: the whole run sees one parameter set.
        let params = self.params;
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let Detection { lines, stats } = detect_lines(image, params.detection, &mut timing)?;
        let canvas = Canvas::new(image.w, image.h);
        let reading = timing.measure("interpret", || {
            interpret::interpret(&lines, canvas, rules, &params.interpretation)
        });
        if let ResultStatus::Degraded(reason) = &status {
            warn!("analysis degraded: {reason:?}");
        }

        let latency_ms = elapsed_ms(total_start);
        timing.total_ms = latency_ms;
        debug!(
            "run: {}x{} lines={} rotation={:.2}° latency={latency_ms:.2}ms",
            image.w,
            image.h,
            lines.len(),
            reading.rotation.to_degrees()
        );

        Ok(AnalysisResult {
            width: image.w,
            height: image.h,
            lines,
            findings: reading.findings,
            narrative: reading.narrative,
            rotation: reading.rotation,
            status,
            stats,
            timing,
            latency_ms,
        })
    }
}
