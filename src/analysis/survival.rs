use serde::Serialize;

/// Cumulative hazard and survival probability aligned with a hazard trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalCurve {
    pub cumulative_hazard: Vec<f64>,
    pub survival: Vec<f64>,
}

/// Scalar service metrics of one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceMetrics {
    /// Expected usable service time (s)
    pub expected_service_s: f64,
    /// ∫ S(1 − S) dt (s)
    pub variance_s: f64,
    pub drop_probability: f64,
}

impl SurvivalCurve {
    /// Integrate a hazard trace sampled every `step_s`.
    ///
    /// Cumulative hazard starts at exactly zero and survival at exactly one.
    pub fn integrate(hazard: &[f64], step_s: f64) -> Self {
        let mut cumulative_hazard = Vec::with_capacity(hazard.len());
        if !hazard.is_empty() {
            cumulative_hazard.push(0.0);
        }
        for pair in hazard.windows(2) {
            let last = cumulative_hazard[cumulative_hazard.len() - 1];
            cumulative_hazard.push(last + (pair[0] + pair[1]) / 2.0 * step_s);
        }

        let survival = cumulative_hazard.iter().map(|h| (-h).exp()).collect();
        Self {
            cumulative_hazard,
            survival,
        }
    }

    pub fn metrics(&self, step_s: f64) -> ServiceMetrics {
        let expected_service_s = trapezoid(&self.survival, step_s);
        let spread: Vec<f64> = self.survival.iter().map(|s| s * (1.0 - s)).collect();
        let variance_s = trapezoid(&spread, step_s);
        let drop_probability = match self.survival.as_slice() {
            [] | [_] => 0.0,
            [.., last] => (1.0 - last).clamp(0.0, 1.0),
        };

        ServiceMetrics {
            expected_service_s,
            variance_s,
            drop_probability,
        }
    }
}

/// Trapezoidal integral of uniformly spaced samples
pub fn trapezoid(values: &[f64], step_s: f64) -> f64 {
    values
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0 * step_s)
        .sum()
}
