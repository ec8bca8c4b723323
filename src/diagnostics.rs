//! Per-run timing and stage counters attached to every analysis result.
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry describing a single stage of the reader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Time `f` and record it under `label`.
    pub fn measure<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.push(label, elapsed_ms(start));
        out
    }
}

/// Counters describing what the detection stages produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    /// Magnitude cutoff at the configured percentile.
    pub threshold: f32,
    pub foreground_pixels: usize,
    /// Components that survived the size filter.
    pub components: usize,
    /// Components that matched a label.
    pub labeled: usize,
}

#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_stage_in_order() {
        let mut timing = TimingBreakdown::default();
        let v = timing.measure("first", || 2 + 2);
        timing.push("second", 1.5);
        assert_eq!(v, 4);
        let labels: Vec<_> = timing.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["first", "second"]);
        assert!(timing.stages[0].elapsed_ms >= 0.0);
    }
}
