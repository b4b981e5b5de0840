//! Median-anchored scoring: converts raw sprint aggregates into bounded
//! 0-100 scores using team-relative medians.

pub mod composer;

use crate::config::{CurveConfig, WeightsConfig};
use crate::core::errors::{Error, Result};
use crate::core::{SprintAggregate, SprintScore, TeamMedians};

/// Direction of a metric: throughput improves upward, cycle time downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// The graded curve: the team's own median scores `baseline` (70 by
/// default), double the median (or half, for lower-is-better metrics)
/// reaches `excellence` (100), and below-median values scale the
/// baseline proportionally.
#[derive(Clone, Copy, Debug)]
pub struct MedianCurve {
    pub baseline: f64,
    pub excellence: f64,
}

impl MedianCurve {
    pub fn from_config(curve: &CurveConfig) -> Self {
        Self {
            baseline: curve.median_baseline,
            excellence: curve.excellence,
        }
    }

    /// Score `value` against the team median `m`. A zero median means no
    /// meaningful baseline exists; that is an `UndefinedBaseline` failure,
    /// never a division by zero.
    pub fn score(
        &self,
        metric: &str,
        value: f64,
        median: f64,
        direction: ScoreDirection,
    ) -> Result<f64> {
        if median <= 0.0 {
            return Err(Error::undefined_baseline(metric));
        }
        let score = match direction {
            ScoreDirection::HigherIsBetter => {
                if value >= median {
                    self.baseline + (value / median - 1.0) * self.excellence
                } else {
                    self.baseline * (value / median)
                }
            }
            ScoreDirection::LowerIsBetter => {
                if value <= median {
                    self.baseline + (1.0 - value / median) * self.excellence
                } else {
                    self.baseline * (median / value)
                }
            }
        };
        Ok(score.clamp(0.0, self.excellence))
    }
}

/// Compute the run's scoring baseline from the same sprint set being
/// scored. Sprints without data for a metric do not participate.
pub fn compute_team_medians<'a, I>(aggregates: I) -> TeamMedians
where
    I: IntoIterator<Item = &'a SprintAggregate> + Clone,
{
    let throughputs: Vec<f64> = aggregates
        .clone()
        .into_iter()
        .filter_map(|a| a.throughput)
        .map(f64::from)
        .filter(|v| *v > 0.0)
        .collect();
    let cycle_times: Vec<f64> = aggregates
        .into_iter()
        .filter_map(|a| a.mean_cycle_time)
        .filter(|v| *v > 0.0)
        .collect();

    TeamMedians {
        median_throughput: median(throughputs),
        median_cycle_time: median(cycle_times),
    }
}

/// Fail the run before any score is emitted when a baseline is undefined.
pub fn ensure_baselines(medians: &TeamMedians) -> Result<()> {
    if medians.median_throughput <= 0.0 {
        return Err(Error::undefined_baseline("throughput"));
    }
    if medians.median_cycle_time <= 0.0 {
        return Err(Error::undefined_baseline("cycle time"));
    }
    Ok(())
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Penalty-per-bug score, floored at zero once the cap is reached.
pub fn bug_score(bugs_created: u32, curve: &CurveConfig) -> f64 {
    let penalized = bugs_created.min(curve.bug_cap) as f64 * curve.bug_penalty;
    (curve.excellence - penalized).max(0.0)
}

/// Inverse rejection ratio. No delivered work means no rejection penalty,
/// so a zero denominator scores full marks rather than being undefined.
pub fn rejection_score(rejections: u32, delivered_items: u32, curve: &CurveConfig) -> f64 {
    if delivered_items == 0 {
        return curve.excellence;
    }
    let ratio_pct = rejections as f64 / delivered_items as f64 * 100.0;
    (curve.excellence - ratio_pct).clamp(0.0, curve.excellence)
}

/// A resolved flow value: either the sprint's own survey score or an
/// imputed fallback, with the imputation recorded.
#[derive(Clone, Copy, Debug)]
pub struct FlowValue {
    pub score: f64,
    pub imputed: bool,
}

/// The fallback for sprints without survey data: the run average of the
/// available raw scores, or the configured default when the run has no
/// survey data at all.
pub fn flow_fallback<'a, I>(aggregates: I, curve: &CurveConfig) -> f64
where
    I: IntoIterator<Item = &'a SprintAggregate>,
{
    let available: Vec<f64> = aggregates
        .into_iter()
        .filter_map(|a| a.flow_score_raw)
        .collect();
    if available.is_empty() {
        log::info!(
            "No flow survey data found. Using default flow score of {} for all sprints.",
            curve.flow_default
        );
        curve.flow_default
    } else {
        available.iter().sum::<f64>() / available.len() as f64
    }
}

pub fn resolve_flow(raw: Option<f64>, fallback: f64) -> FlowValue {
    match raw {
        Some(score) => FlowValue {
            score,
            imputed: false,
        },
        None => FlowValue {
            score: fallback,
            imputed: true,
        },
    }
}

/// Score one sprint against the shared medians. `throughput` and
/// `mean_cycle_time` are passed unwrapped: sprints without them are
/// flagged upstream, never scored.
pub fn score_sprint(
    agg: &SprintAggregate,
    throughput: u32,
    mean_cycle_time: f64,
    medians: &TeamMedians,
    flow: FlowValue,
    weights: &WeightsConfig,
    curve: &CurveConfig,
) -> Result<SprintScore> {
    let grading = MedianCurve::from_config(curve);

    let throughput_score = grading.score(
        "throughput",
        f64::from(throughput),
        medians.median_throughput,
        ScoreDirection::HigherIsBetter,
    )?;
    let efficiency_score = grading.score(
        "cycle time",
        mean_cycle_time,
        medians.median_cycle_time,
        ScoreDirection::LowerIsBetter,
    )?;
    let velocity_score = weights.velocity_throughput * throughput_score
        + weights.velocity_efficiency * efficiency_score;

    let bug_score = self::bug_score(agg.bugs_created.unwrap_or(0), curve);
    let rejection_score = self::rejection_score(
        agg.rejections.unwrap_or(0),
        agg.delivered_items.unwrap_or(0),
        curve,
    );
    let quality_score = weights.quality_bugs * bug_score + weights.quality_rejections * rejection_score;

    let flow_score = flow.score.clamp(0.0, curve.excellence);

    let overall_score =
        composer::compose_overall(velocity_score, flow_score, quality_score, weights);

    Ok(SprintScore {
        sprint_name: agg.sprint_name.clone(),
        sprint_start: agg.sprint_start,
        velocity_score,
        quality_score,
        flow_score,
        overall_score,
        throughput_score,
        efficiency_score,
        bug_score,
        rejection_score,
        flow_imputed: flow.imputed,
    })
}
