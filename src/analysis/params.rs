use std::collections::HashMap;

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

use crate::analysis::AnalysisError;

/// Name of a tunable analysis parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    ElevMinDeg,
    MaxGroundDistanceKm,
    MinVisibleSeconds,
    MinAvgElevDeg,
    StepS,
    StartOffsetS,
    SimDurationS,
    AlphaGeo,
    AlphaBeam,
    AlphaRain,
    OmegaTh,
    LambdaRisk,
}

impl Parameter {
    pub const ALL: [Parameter; 12] = [
        Parameter::ElevMinDeg,
        Parameter::MaxGroundDistanceKm,
        Parameter::MinVisibleSeconds,
        Parameter::MinAvgElevDeg,
        Parameter::StepS,
        Parameter::StartOffsetS,
        Parameter::SimDurationS,
        Parameter::AlphaGeo,
        Parameter::AlphaBeam,
        Parameter::AlphaRain,
        Parameter::OmegaTh,
        Parameter::LambdaRisk,
    ];

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Complete, validated set of analysis parameters.
///
/// A value type: perturbations produce new instances via [`Parameters::with_override`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Minimum elevation for visibility (deg)
    pub elev_min_deg: f64,
    /// Maximum sub-point distance from the terminal (km)
    pub max_ground_distance_km: f64,
    /// Minimum total visible time and minimum window duration (s)
    pub min_visible_seconds: f64,
    /// Minimum mean elevation over the visible samples or window (deg)
    pub min_avg_elev_deg: f64,
    pub step_s: f64,
    pub start_offset_s: f64,
    pub sim_duration_s: f64,
    pub alpha_geo: f64,
    pub alpha_beam: f64,
    pub alpha_rain: f64,
    /// Angular-rate threshold for beam handover (deg/s)
    pub omega_th: f64,
    /// Risk aversion
    pub lambda_risk: f64,
}

impl Parameters {
    /// Build from a flat name/value mapping. Every parameter is required.
    pub fn from_map(values: &HashMap<String, f64>) -> Result<Self, AnalysisError> {
        for key in values.keys() {
            if Parameter::from_name(key).is_none() {
                log::warn!("Ignoring unknown parameter '{}'", key);
            }
        }

        let get = |p: Parameter| {
            values
                .get(p.name())
                .copied()
                .ok_or(AnalysisError::MissingParameter(p))
        };

        let params = Parameters {
            elev_min_deg: get(Parameter::ElevMinDeg)?,
            max_ground_distance_km: get(Parameter::MaxGroundDistanceKm)?,
            min_visible_seconds: get(Parameter::MinVisibleSeconds)?,
            min_avg_elev_deg: get(Parameter::MinAvgElevDeg)?,
            step_s: get(Parameter::StepS)?,
            start_offset_s: get(Parameter::StartOffsetS)?,
            sim_duration_s: get(Parameter::SimDurationS)?,
            alpha_geo: get(Parameter::AlphaGeo)?,
            alpha_beam: get(Parameter::AlphaBeam)?,
            alpha_rain: get(Parameter::AlphaRain)?,
            omega_th: get(Parameter::OmegaTh)?,
            lambda_risk: get(Parameter::LambdaRisk)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::ElevMinDeg => self.elev_min_deg,
            Parameter::MaxGroundDistanceKm => self.max_ground_distance_km,
            Parameter::MinVisibleSeconds => self.min_visible_seconds,
            Parameter::MinAvgElevDeg => self.min_avg_elev_deg,
            Parameter::StepS => self.step_s,
            Parameter::StartOffsetS => self.start_offset_s,
            Parameter::SimDurationS => self.sim_duration_s,
            Parameter::AlphaGeo => self.alpha_geo,
            Parameter::AlphaBeam => self.alpha_beam,
            Parameter::AlphaRain => self.alpha_rain,
            Parameter::OmegaTh => self.omega_th,
            Parameter::LambdaRisk => self.lambda_risk,
        }
    }

    /// Copy with one parameter replaced
    pub fn with_override(&self, parameter: Parameter, value: f64) -> Result<Self, AnalysisError> {
        let mut next = *self;
        let slot = match parameter {
            Parameter::ElevMinDeg => &mut next.elev_min_deg,
            Parameter::MaxGroundDistanceKm => &mut next.max_ground_distance_km,
            Parameter::MinVisibleSeconds => &mut next.min_visible_seconds,
            Parameter::MinAvgElevDeg => &mut next.min_avg_elev_deg,
            Parameter::StepS => &mut next.step_s,
            Parameter::StartOffsetS => &mut next.start_offset_s,
            Parameter::SimDurationS => &mut next.sim_duration_s,
            Parameter::AlphaGeo => &mut next.alpha_geo,
            Parameter::AlphaBeam => &mut next.alpha_beam,
            Parameter::AlphaRain => &mut next.alpha_rain,
            Parameter::OmegaTh => &mut next.omega_th,
            Parameter::LambdaRisk => &mut next.lambda_risk,
        };
        *slot = value;
        next.validate()?;
        Ok(next)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |parameter: Parameter, reason: &'static str| -> Result<(), AnalysisError> {
            Err(AnalysisError::InvalidParameter {
                parameter,
                value: self.get(parameter),
                reason,
            })
        };

        if let Some(p) = Parameter::ALL.into_iter().find(|p| !self.get(*p).is_finite()) {
            return invalid(p, "must be finite");
        }
        if self.step_s <= 0.0 {
            return invalid(Parameter::StepS, "must be positive");
        }
        if self.sim_duration_s < 0.0 {
            return invalid(Parameter::SimDurationS, "must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn baseline_map() -> HashMap<String, f64> {
    [
        ("elev_min_deg", 10.0),
        ("max_ground_distance_km", 300.0),
        ("min_visible_seconds", 180.0),
        ("min_avg_elev_deg", 30.0),
        ("step_s", 15.0),
        ("start_offset_s", 60.0),
        ("sim_duration_s", 7200.0),
        ("alpha_geo", 0.001),
        ("alpha_beam", 0.002),
        ("alpha_rain", 0.005),
        ("omega_th", 1.2),
        ("lambda_risk", 0.6),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names() {
        assert_eq!(Parameter::StepS.name(), "step_s");
        assert_eq!(Parameter::MinAvgElevDeg.to_string(), "min_avg_elev_deg");
        assert_eq!(
            Parameter::from_name("max_ground_distance_km"),
            Some(Parameter::MaxGroundDistanceKm)
        );
        assert_eq!(Parameter::from_name("ELEV_MIN_DEG"), None);
        for p in Parameter::ALL {
            assert_eq!(Parameter::from_name(p.name()), Some(p));
        }
    }

    #[test]
    fn test_from_map() {
        let params = Parameters::from_map(&baseline_map()).unwrap();
        assert_eq!(params.elev_min_deg, 10.0);
        assert_eq!(params.step_s, 15.0);
        assert_eq!(params.lambda_risk, 0.6);
        assert_eq!(params.get(Parameter::OmegaTh), 1.2);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let mut map = baseline_map();
        map.remove("alpha_rain");
        match Parameters::from_map(&map) {
            Err(AnalysisError::MissingParameter(p)) => assert_eq!(p, Parameter::AlphaRain),
            other => panic!("expected missing parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut map = baseline_map();
        map.insert("epsilon".to_string(), 1e-3);
        assert!(Parameters::from_map(&map).is_ok());
    }

    #[test]
    fn test_invalid_step() {
        let mut map = baseline_map();
        map.insert("step_s".to_string(), 0.0);
        assert!(matches!(
            Parameters::from_map(&map),
            Err(AnalysisError::InvalidParameter {
                parameter: Parameter::StepS,
                ..
            })
        ));
    }

    #[test]
    fn test_with_override_leaves_base_untouched() {
        let base = Parameters::from_map(&baseline_map()).unwrap();
        let perturbed = base.with_override(Parameter::AlphaGeo, 0.002).unwrap();
        assert_eq!(perturbed.alpha_geo, 0.002);
        assert_eq!(base.alpha_geo, 0.001);
        assert_eq!(perturbed.alpha_beam, base.alpha_beam);

        assert!(base.with_override(Parameter::SimDurationS, -1.0).is_err());
        assert!(base.with_override(Parameter::LambdaRisk, f64::NAN).is_err());
    }
}
