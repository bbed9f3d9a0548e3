use std::ops::Range;

use crate::analysis::geometry::angular_rate_deg_s;
use crate::analysis::stats::mean;
use crate::analysis::{Parameters, TimeGrid};

/// Elevation bounds applied before differentiation or trigonometry
pub const ELEVATION_CLIP_DEG: (f64, f64) = (0.1, 90.0);

/// A maximal contiguous visibility interval of one satellite
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// Grid indices covered by the pass
    pub range: Range<usize>,
    /// Grid offsets of the covered samples (s)
    pub offsets_s: Vec<f64>,
    pub duration_s: f64,
    pub elevation_deg: Vec<f64>,
    pub angular_rate_deg_s: Vec<f64>,
}

impl Pass {
    pub fn mean_elevation_deg(&self) -> f64 {
        mean(&self.elevation_deg)
    }

    pub fn max_abs_angular_rate_deg_s(&self) -> f64 {
        self.angular_rate_deg_s
            .iter()
            .fold(0.0, |acc: f64, r| acc.max(r.abs()))
    }

    /// Sample times relative to the first sample of the pass
    pub fn relative_times_s(&self) -> Vec<f64> {
        let start = self.offsets_s.first().copied().unwrap_or(0.0);
        self.offsets_s.iter().map(|t| t - start).collect()
    }
}

/// Index ranges of every maximal run of `true` in `mask`, left to right
pub fn visibility_runs(mask: &[bool]) -> impl Iterator<Item = Range<usize>> + '_ {
    mask.chunk_by(|a, b| a == b)
        .scan(0usize, |start, run| {
            let range = *start..*start + run.len();
            *start = range.end;
            Some((range, run[0]))
        })
        .filter_map(|(range, visible)| visible.then_some(range))
}

/// Turn a satellite's visibility mask into passes that are long and high enough.
///
/// The angular rate is differentiated once over the whole clipped series and
/// then sliced, so edge samples see their neighbours outside the pass.
pub fn extract_passes(
    elevation_deg: &[f64],
    mask: &[bool],
    grid: &TimeGrid,
    params: &Parameters,
) -> Vec<Pass> {
    let offsets = grid.offsets();
    let clipped: Vec<f64> = elevation_deg
        .iter()
        .map(|e| e.clamp(ELEVATION_CLIP_DEG.0, ELEVATION_CLIP_DEG.1))
        .collect();
    let angular_rate = angular_rate_deg_s(&clipped, grid.step_s());

    visibility_runs(mask)
        .filter_map(|range| {
            let start_offset_s = offsets[range.start];
            let end_offset_s = offsets[range.end - 1];
            let duration_s = end_offset_s - start_offset_s;
            if duration_s < params.min_visible_seconds {
                return None;
            }

            let elevation = elevation_deg[range.clone()].to_vec();
            if mean(&elevation) < params.min_avg_elev_deg {
                return None;
            }

            Some(Pass {
                offsets_s: offsets[range.clone()].to_vec(),
                duration_s,
                elevation_deg: elevation,
                angular_rate_deg_s: angular_rate[range.clone()].to_vec(),
                range,
            })
        })
        .collect()
}
