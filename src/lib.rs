#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod params;
pub mod rules;
pub mod types;

// Stage modules: public for experiments and tests, considered internals.
pub mod angle;
pub mod classify;
pub mod edges;
pub mod features;
pub mod interpret;
pub mod preprocess;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

// Main entry points: reader + results.
pub use crate::detector::{
    detect_lines, AnalysisResult, DegradedReason, Detection, PalmReader, ResultStatus,
};
pub use crate::error::{PalmError, Result};
pub use crate::image::RasterImage;
pub use crate::params::{DetectionParams, InterpretationParams, PalmParams};
pub use crate::rules::{load_rules, Condition, RulesTable};
pub use crate::types::{BBox, DetectedLine, PalmLabel, Point};

// Per-run diagnostics attached to every result.
pub use crate::diagnostics::{DetectionStats, StageTiming, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use palm_reader::prelude::*;
///
/// # fn main() -> palm_reader::Result<()> {
/// let (w, h) = (64usize, 48usize);
/// let rgba = vec![200u8; w * h * 4];
/// let image = RasterImage::new(w, h, &rgba)?;
///
/// let rules = RulesTable::from_json_str(r#"{"linhas": {"vida": {"ausencia": "Sem vida."}}}"#)?;
/// let reader = PalmReader::new(PalmParams::default());
/// let result = reader.process(image, Some(&rules))?;
/// println!("{} (latency {:.3} ms)", result.narrative, result.latency_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::detector::{AnalysisResult, PalmReader};
    pub use crate::image::RasterImage;
    pub use crate::params::PalmParams;
    pub use crate::rules::RulesTable;
    pub use crate::types::{DetectedLine, PalmLabel};
}
