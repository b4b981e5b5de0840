//! Index Composer: the final weighted combination of velocity, flow, and
//! quality into the overall impact index.

use crate::config::WeightsConfig;

/// `overall = w_v * velocity + w_f * flow + w_q * quality`, clamped to
/// `[0, 100]`. Pure function; missing inputs are handled upstream.
pub fn compose_overall(
    velocity_score: f64,
    flow_score: f64,
    quality_score: f64,
    weights: &WeightsConfig,
) -> f64 {
    let overall = weights.velocity * velocity_score
        + weights.flow * flow_score
        + weights.quality * quality_score;
    overall.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weighting_example() {
        // 0.6 * 80 + 0.25 * 70 + 0.15 * 90 = 48 + 17.5 + 13.5 = 79
        let overall = compose_overall(80.0, 70.0, 90.0, &WeightsConfig::default());
        assert!((overall - 79.0).abs() < 1e-9);
    }

    #[test]
    fn overall_is_clamped() {
        let weights = WeightsConfig::default();
        assert_eq!(compose_overall(200.0, 200.0, 200.0, &weights), 100.0);
        assert_eq!(compose_overall(-50.0, -50.0, -50.0, &weights), 0.0);
    }
}
