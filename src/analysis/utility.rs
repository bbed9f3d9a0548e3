use crate::analysis::survival::ServiceMetrics;
use crate::analysis::Parameters;

/// Risk-adjusted ranking score: `EUST − λ · variance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityScorer {
    pub lambda_risk: f64,
}

impl UtilityScorer {
    pub fn new(params: &Parameters) -> Self {
        Self {
            lambda_risk: params.lambda_risk,
        }
    }

    pub fn score(&self, metrics: &ServiceMetrics) -> f64 {
        metrics.expected_service_s - self.lambda_risk * metrics.variance_s
    }
}

/// Check the algebraic bounds of the variance proxy. Never clamps.
///
/// `S(1 − S) ≤ S` and `S(1 − S) ≤ 1/4` pointwise, so the integrated variance
/// is at most the expected service time and at most a quarter of the duration.
pub fn variance_within_bounds(metrics: &ServiceMetrics, duration_s: f64) -> bool {
    const TOLERANCE: f64 = 1e-9;
    metrics.variance_s >= 0.0
        && metrics.variance_s <= metrics.expected_service_s + TOLERANCE
        && metrics.variance_s <= duration_s / 4.0 + TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::survival::SurvivalCurve;

    fn metrics(expected_service_s: f64, variance_s: f64) -> ServiceMetrics {
        ServiceMetrics {
            expected_service_s,
            variance_s,
            drop_probability: 0.1,
        }
    }

    #[test]
    fn test_score() {
        let scorer = UtilityScorer { lambda_risk: 0.6 };
        assert!((scorer.score(&metrics(200.0, 10.0)) - 194.0).abs() < 1e-12);
        assert_eq!(scorer.score(&metrics(200.0, 0.0)), 200.0);
    }

    #[test]
    fn test_higher_aversion_penalizes_uncertainty() {
        let m = metrics(300.0, 40.0);
        let cautious = UtilityScorer { lambda_risk: 1.0 }.score(&m);
        let bold = UtilityScorer { lambda_risk: 0.3 }.score(&m);
        assert!(cautious < bold);
        assert!(cautious <= m.expected_service_s);
    }

    #[test]
    fn test_variance_bounds_hold_for_integrated_curves() {
        for rate in [0.0, 1e-4, 1e-3, 1e-2, 0.1] {
            let curve = SurvivalCurve::integrate(&[rate; 30], 15.0);
            let m = curve.metrics(15.0);
            assert!(variance_within_bounds(&m, 29.0 * 15.0), "rate {}", rate);
        }
        assert!(!variance_within_bounds(&metrics(10.0, 20.0), 100.0));
    }
}
