use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::pipeline::{VisibilityPipeline, VisibilityRecord};
use crate::analysis::stats::{mean, nan_mean, spearman};
use crate::analysis::{Parameter, Parameters};
use crate::predict::EphemerisOracle;

/// Values to try for one parameter, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    pub parameter: Parameter,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityRecord {
    pub parameter: Parameter,
    pub value: f64,
    pub num_windows: usize,
    /// NaN when the perturbed run produced no windows
    pub avg_utility: f64,
    pub top_sat_id: Option<String>,
    pub top_sat_match: u8,
    /// NaN with fewer than 2 satellites common to both runs
    pub rank_correlation: f64,
}

/// Averages of the sensitivity rows of one parameter, NaN values skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub parameter: Parameter,
    pub runs: usize,
    pub mean_num_windows: f64,
    pub mean_avg_utility: f64,
    pub top_sat_match_rate: f64,
    pub mean_rank_correlation: f64,
}

/// Best utility over each satellite's windows, keyed by satellite id
pub fn best_utility_per_satellite(records: &[VisibilityRecord]) -> BTreeMap<&str, f64> {
    let mut best = BTreeMap::new();
    for record in records {
        best.entry(record.satellite_id.as_str())
            .and_modify(|u: &mut f64| *u = u.max(record.utility))
            .or_insert(record.utility);
    }
    best
}

/// Satellite with the highest best-utility; ties go to the smallest id
pub fn top_satellite<'a>(best: &BTreeMap<&'a str, f64>) -> Option<&'a str> {
    let mut top: Option<(&'a str, f64)> = None;
    for (id, utility) in best {
        if top.map_or(true, |(_, u)| *utility > u) {
            top = Some((*id, *utility));
        }
    }
    top.map(|(id, _)| id)
}

fn compare(
    variation: Parameter,
    value: f64,
    baseline_best: &BTreeMap<&str, f64>,
    baseline_top: &str,
    records: &[VisibilityRecord],
) -> SensitivityRecord {
    if records.is_empty() {
        return SensitivityRecord {
            parameter: variation,
            value,
            num_windows: 0,
            avg_utility: f64::NAN,
            top_sat_id: None,
            top_sat_match: 0,
            rank_correlation: f64::NAN,
        };
    }

    let utilities: Vec<f64> = records.iter().map(|r| r.utility).collect();
    let best = best_utility_per_satellite(records);
    let top = top_satellite(&best);

    let (base, perturbed): (Vec<f64>, Vec<f64>) = baseline_best
        .iter()
        .filter_map(|(id, u)| best.get(id).map(|p| (*u, *p)))
        .unzip();

    SensitivityRecord {
        parameter: variation,
        value,
        num_windows: records.len(),
        avg_utility: mean(&utilities),
        top_sat_id: top.map(str::to_string),
        top_sat_match: u8::from(top == Some(baseline_top)),
        rank_correlation: spearman(&base, &perturbed),
    }
}

/// Rerun the pipeline for every (parameter, value) pair against a baseline.
///
/// `baseline_records` are the records of `pipeline` run under `baseline`.
/// Each perturbed run uses its own copy of `baseline` with one parameter
/// replaced. An empty baseline yields no rows. Values that fail validation
/// and runs that fail are skipped.
pub fn run_sensitivity<O: EphemerisOracle>(
    pipeline: &VisibilityPipeline<'_, O>,
    baseline: &Parameters,
    baseline_records: &[VisibilityRecord],
    satellites: &[O::Satellite],
    variations: &[Variation],
) -> Vec<SensitivityRecord> {
    let baseline_best = best_utility_per_satellite(baseline_records);
    let Some(baseline_top) = top_satellite(&baseline_best) else {
        log::warn!("Baseline produced no windows, skipping sensitivity analysis");
        return Vec::new();
    };
    log::info!("Baseline top satellite: {}", baseline_top);

    let mut rows = Vec::new();
    for variation in variations {
        for value in &variation.values {
            let params = match baseline.with_override(variation.parameter, *value) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skipping {} = {}: {}", variation.parameter, value, e);
                    continue;
                }
            };
            let output = match pipeline.run(&params, satellites) {
                Ok(output) => output,
                Err(e) => {
                    log::warn!("Run {} = {} failed: {}", variation.parameter, value, e);
                    continue;
                }
            };
            let row = compare(
                variation.parameter,
                *value,
                &baseline_best,
                baseline_top,
                &output.records,
            );
            log::debug!(
                "{} = {}: {} windows, top {:?}, rho {:.3}",
                row.parameter,
                row.value,
                row.num_windows,
                row.top_sat_id,
                row.rank_correlation
            );
            rows.push(row);
        }
    }
    rows
}

/// Group rows by parameter in first-appearance order
pub fn summarize_by_parameter(rows: &[SensitivityRecord]) -> Vec<ParameterSummary> {
    let mut order: Vec<Parameter> = Vec::new();
    for row in rows {
        if !order.contains(&row.parameter) {
            order.push(row.parameter);
        }
    }

    order
        .into_iter()
        .map(|parameter| {
            let group: Vec<&SensitivityRecord> =
                rows.iter().filter(|r| r.parameter == parameter).collect();
            let column = |f: fn(&SensitivityRecord) -> f64| -> Vec<f64> {
                group.iter().map(|r| f(r)).collect()
            };
            ParameterSummary {
                parameter,
                runs: group.len(),
                mean_num_windows: nan_mean(&column(|r| r.num_windows as f64)),
                mean_avg_utility: nan_mean(&column(|r| r.avg_utility)),
                top_sat_match_rate: nan_mean(&column(|r| f64::from(r.top_sat_match))),
                mean_rank_correlation: nan_mean(&column(|r| r.rank_correlation)),
            }
        })
        .collect()
}
