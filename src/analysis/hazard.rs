use serde::Serialize;

use crate::analysis::windows::{Pass, ELEVATION_CLIP_DEG};
use crate::analysis::Parameters;

/// Upper bound of the geometric hazard per sample
pub const GEOMETRIC_HAZARD_CAP: f64 = 0.05;
const MIN_SIN_ELEVATION: f64 = 0.1;

const HANDOVER_CYCLE_S: f64 = 60.0;
const HANDOVER_PERIOD_S: f64 = 15.0;
const HANDOVER_SPIKE_S: f64 = 1.5;

/// Elevation e-folding scale of the atmospheric term (deg)
const RAIN_SCALE_DEG: f64 = 15.0;

/// Per-sample hazard traces of one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardTraces {
    pub geometric: Vec<f64>,
    pub beam: Vec<f64>,
    pub atmospheric: Vec<f64>,
    pub total: Vec<f64>,
}

/// Link-loss hazard rates inside a pass.
///
/// Three independent, non-negative contributions are evaluated per sample:
///
/// ```text
/// h_geo  = clip(α_geo · |ω| / max(sin(el), 0.1), 0, 0.05)
/// h_beam = α_beam · 1[(t mod 60) mod 15 < 1.5] · 1[|ω| > ω_th]
/// h_rain = α_rain · exp(−el / 15)
/// ```
///
/// where `ω` is the elevation rate (deg/s), `el` the elevation and `t` the
/// wall-clock time of the sample in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardModel {
    pub alpha_geo: f64,
    pub alpha_beam: f64,
    pub alpha_rain: f64,
    pub omega_th: f64,
    /// Wall-clock time of offset zero (Unix seconds)
    pub anchor_unix_s: f64,
}

impl HazardModel {
    pub fn new(params: &Parameters, anchor_unix_s: f64) -> Self {
        Self {
            alpha_geo: params.alpha_geo,
            alpha_beam: params.alpha_beam,
            alpha_rain: params.alpha_rain,
            omega_th: params.omega_th,
            anchor_unix_s,
        }
    }

    pub fn geometric(&self, elevation_deg: f64, angular_rate_deg_s: f64) -> f64 {
        let elevation = elevation_deg
            .clamp(ELEVATION_CLIP_DEG.0, ELEVATION_CLIP_DEG.1)
            .to_radians();
        let h = self.alpha_geo * angular_rate_deg_s.abs() / elevation.sin().max(MIN_SIN_ELEVATION);
        h.clamp(0.0, GEOMETRIC_HAZARD_CAP)
    }

    pub fn beam(&self, offset_s: f64, angular_rate_deg_s: f64) -> f64 {
        let phase = (self.anchor_unix_s + offset_s).rem_euclid(HANDOVER_CYCLE_S);
        let near_handover = phase.rem_euclid(HANDOVER_PERIOD_S) < HANDOVER_SPIKE_S;
        if near_handover && angular_rate_deg_s.abs() > self.omega_th {
            self.alpha_beam
        } else {
            0.0
        }
    }

    pub fn atmospheric(&self, elevation_deg: f64) -> f64 {
        self.alpha_rain * (-elevation_deg / RAIN_SCALE_DEG).exp()
    }

    /// Evaluate every hazard component at each grid sample of a pass
    pub fn evaluate(&self, pass: &Pass) -> HazardTraces {
        let n = pass.elevation_deg.len();
        let mut traces = HazardTraces {
            geometric: Vec::with_capacity(n),
            beam: Vec::with_capacity(n),
            atmospheric: Vec::with_capacity(n),
            total: Vec::with_capacity(n),
        };

        for ((elevation, rate), offset_s) in pass
            .elevation_deg
            .iter()
            .zip(&pass.angular_rate_deg_s)
            .zip(&pass.offsets_s)
        {
            let geometric = self.geometric(*elevation, *rate);
            let beam = self.beam(*offset_s, *rate);
            let atmospheric = self.atmospheric(*elevation);

            traces.geometric.push(geometric);
            traces.beam.push(beam);
            traces.atmospheric.push(atmospheric);
            traces.total.push(geometric + beam + atmospheric);
        }

        traces
    }
}
