use chrono::{DateTime, Duration, Utc};

use crate::analysis::Parameters;

/// Uniform simulation time axis shared by every satellite in a run.
///
/// Offsets are seconds relative to the wall-clock `anchor`.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    anchor: DateTime<Utc>,
    step_s: f64,
    offsets: Vec<f64>,
    instants: Vec<DateTime<Utc>>,
}

impl TimeGrid {
    /// `start_offset_s + i * step_s` for `i in 0..floor(duration / step) + 2`
    pub fn new(params: &Parameters, anchor: DateTime<Utc>) -> Self {
        let steps = (params.sim_duration_s / params.step_s).floor() as usize;
        let offsets: Vec<f64> = (0..steps + 2)
            .map(|i| params.start_offset_s + i as f64 * params.step_s)
            .collect();
        let instants = offsets
            .iter()
            .map(|offset| anchor + Duration::microseconds((offset * 1e6).round() as i64))
            .collect();

        Self {
            anchor,
            step_s: params.step_s,
            offsets,
            instants,
        }
    }

    /// Anchor as fractional Unix seconds
    pub fn anchor_unix_s(&self) -> f64 {
        self.anchor.timestamp() as f64 + f64::from(self.anchor.timestamp_subsec_nanos()) * 1e-9
    }

    pub fn step_s(&self) -> f64 {
        self.step_s
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }
}
