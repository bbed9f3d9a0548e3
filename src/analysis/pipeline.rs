use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::hazard::{HazardModel, HazardTraces};
use crate::analysis::region::{filter_satellite, visibility_mask, RegionDecision};
use crate::analysis::survival::{ServiceMetrics, SurvivalCurve};
use crate::analysis::utility::{variance_within_bounds, UtilityScorer};
use crate::analysis::windows::{extract_passes, Pass};
use crate::analysis::{Parameters, TimeGrid};
use crate::predict::{EphemerisOracle, GroundStation, PredictError};

/// One scored pass with the traces it was scored from
#[derive(Debug, Clone)]
pub struct VisibilityWindow {
    pub satellite_id: String,
    pub pass: Pass,
    pub hazard: HazardTraces,
    pub survival: SurvivalCurve,
    pub metrics: ServiceMetrics,
    pub utility: f64,
    /// Closest sub-point distance over the whole run, not just this pass
    pub min_ground_distance_km: f64,
}

impl VisibilityWindow {
    fn to_record(&self, grid: &TimeGrid) -> VisibilityRecord {
        let instants = grid.instants();
        VisibilityRecord {
            satellite_id: self.satellite_id.clone(),
            start_time_utc: instants[self.pass.range.start],
            end_time_utc: instants[self.pass.range.end - 1],
            duration_s: self.pass.duration_s,
            expected_service_s: self.metrics.expected_service_s,
            variance_s: self.metrics.variance_s,
            utility: self.utility,
            avg_elevation_deg: self.pass.mean_elevation_deg(),
            max_angular_rate_degs: self.pass.max_abs_angular_rate_deg_s(),
            drop_probability: self.metrics.drop_probability,
            min_ground_dist_km: self.min_ground_distance_km,
        }
    }

    fn to_trace(&self) -> RepresentativeTrace {
        RepresentativeTrace {
            satellite_id: self.satellite_id.clone(),
            utility: self.utility,
            times_s: self.pass.relative_times_s(),
            hazard: self.hazard.clone(),
            survival: self.survival.survival.clone(),
        }
    }
}

/// Flat snapshot of one window, used for ranking and export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityRecord {
    pub satellite_id: String,
    pub start_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    pub duration_s: f64,
    pub expected_service_s: f64,
    pub variance_s: f64,
    pub utility: f64,
    pub avg_elevation_deg: f64,
    pub max_angular_rate_degs: f64,
    pub drop_probability: f64,
    pub min_ground_dist_km: f64,
}

/// Hazard and survival traces of a satellite's best-utility window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentativeTrace {
    pub satellite_id: String,
    pub utility: f64,
    /// Seconds since the window start
    pub times_s: Vec<f64>,
    pub hazard: HazardTraces,
    pub survival: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Sorted by descending utility
    pub records: Vec<VisibilityRecord>,
    /// One per satellite that produced at least one window, in processing order
    pub traces: Vec<RepresentativeTrace>,
}

impl PipelineOutput {
    /// Traces of the `n` best-ranked satellites, best first
    pub fn top_traces(&self, n: usize) -> Vec<&RepresentativeTrace> {
        let mut top: Vec<&RepresentativeTrace> = Vec::with_capacity(n);
        for record in &self.records {
            if top.len() == n {
                break;
            }
            if top.iter().any(|t| t.satellite_id == record.satellite_id) {
                continue;
            }
            if let Some(trace) = self
                .traces
                .iter()
                .find(|t| t.satellite_id == record.satellite_id)
            {
                top.push(trace);
            }
        }
        top
    }
}

/// Region filter → windowing → hazard → survival → utility, for every satellite
pub struct VisibilityPipeline<'a, O: EphemerisOracle> {
    oracle: &'a O,
    station: GroundStation,
    anchor: DateTime<Utc>,
}

impl<'a, O: EphemerisOracle> VisibilityPipeline<'a, O> {
    pub fn new(oracle: &'a O, station: GroundStation, anchor: DateTime<Utc>) -> Self {
        Self {
            oracle,
            station,
            anchor,
        }
    }

    /// Evaluate every satellite under `params`.
    ///
    /// Satellites that fail to propagate or are rejected contribute nothing.
    /// An elevation series that does not match the time grid aborts the run.
    pub fn run(
        &self,
        params: &Parameters,
        satellites: &[O::Satellite],
    ) -> Result<PipelineOutput, PredictError> {
        let grid = TimeGrid::new(params, self.anchor);
        let hazard_model = HazardModel::new(params, grid.anchor_unix_s());
        let scorer = UtilityScorer::new(params);

        let mut output = PipelineOutput::default();
        let mut accepted = 0usize;

        for satellite in satellites {
            let id = self.oracle.satellite_id(satellite);
            let evaluated =
                self.evaluate_satellite(satellite, &grid, params, &hazard_model, &scorer);
            let windows = match evaluated {
                Ok(Some(windows)) => windows,
                Ok(None) => continue,
                Err(e @ PredictError::SeriesLength { .. }) => return Err(e),
                Err(e) => {
                    log::warn!("Skipping {}: {}", id, e);
                    continue;
                }
            };
            accepted += 1;

            let mut best: Option<&VisibilityWindow> = None;
            for window in &windows {
                if best.map_or(true, |b| window.utility > b.utility) {
                    best = Some(window);
                }
                output.records.push(window.to_record(&grid));
            }
            if let Some(best) = best {
                output.traces.push(best.to_trace());
            }
        }

        output
            .records
            .sort_by(|a, b| b.utility.total_cmp(&a.utility));

        log::info!(
            "{} of {} satellites in region, {} windows",
            accepted,
            satellites.len(),
            output.records.len()
        );
        Ok(output)
    }

    /// `Ok(None)` when the region filter rejects the satellite
    fn evaluate_satellite(
        &self,
        satellite: &O::Satellite,
        grid: &TimeGrid,
        params: &Parameters,
        hazard_model: &HazardModel,
        scorer: &UtilityScorer,
    ) -> Result<Option<Vec<VisibilityWindow>>, PredictError> {
        let id = self.oracle.satellite_id(satellite);
        let elevation = self
            .oracle
            .elevation(satellite, grid.instants(), &self.station)?;
        if elevation.len() != grid.len() {
            return Err(PredictError::SeriesLength {
                satellite: id.to_string(),
                expected: grid.len(),
                actual: elevation.len(),
            });
        }

        let mask = visibility_mask(&elevation, params.elev_min_deg);
        let min_ground_distance_km = match filter_satellite(
            self.oracle,
            satellite,
            &self.station,
            grid,
            &elevation,
            &mask,
            params,
        )? {
            RegionDecision::Accepted {
                min_ground_distance_km,
            } => min_ground_distance_km,
            RegionDecision::Rejected(reason) => {
                log::debug!("Rejected {}: {}", id, reason);
                return Ok(None);
            }
        };

        let windows = extract_passes(&elevation, &mask, grid, params)
            .into_iter()
            .map(|pass| {
                let hazard = hazard_model.evaluate(&pass);
                let survival = SurvivalCurve::integrate(&hazard.total, grid.step_s());
                let metrics = survival.metrics(grid.step_s());
                if !variance_within_bounds(&metrics, pass.duration_s) {
                    log::warn!(
                        "{}: variance {:.3} s outside bounds (EUST {:.3} s, duration {:.0} s)",
                        id,
                        metrics.variance_s,
                        metrics.expected_service_s,
                        pass.duration_s
                    );
                }
                let utility = scorer.score(&metrics);

                VisibilityWindow {
                    satellite_id: id.to_string(),
                    pass,
                    hazard,
                    survival,
                    metrics,
                    utility,
                    min_ground_distance_km,
                }
            })
            .collect();

        Ok(Some(windows))
    }
}
