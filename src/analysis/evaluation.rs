use serde::Serialize;

use crate::analysis::pipeline::VisibilityRecord;
use crate::analysis::stats::{mean, median, spearman};

/// How far geometric visibility overstates risk-aware service
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub num_windows: usize,
    /// `(duration − EUST) / duration` in percent, over windows with non-zero duration
    pub mean_overestimation_pct: f64,
    pub median_overestimation_pct: f64,
    pub mean_drop_probability: f64,
    /// Agreement of the duration ranking with the utility ranking
    pub rank_correlation: f64,
}

pub fn evaluate(records: &[VisibilityRecord]) -> Option<EvaluationSummary> {
    if records.is_empty() {
        return None;
    }

    let overestimation: Vec<f64> = records
        .iter()
        .filter(|r| r.duration_s > 0.0)
        .map(|r| (r.duration_s - r.expected_service_s) / r.duration_s * 100.0)
        .collect();
    let drop: Vec<f64> = records.iter().map(|r| r.drop_probability).collect();
    let durations: Vec<f64> = records.iter().map(|r| r.duration_s).collect();
    let utilities: Vec<f64> = records.iter().map(|r| r.utility).collect();

    Some(EvaluationSummary {
        num_windows: records.len(),
        mean_overestimation_pct: mean(&overestimation),
        median_overestimation_pct: median(&overestimation),
        mean_drop_probability: mean(&drop),
        rank_correlation: spearman(&durations, &utilities),
    })
}
