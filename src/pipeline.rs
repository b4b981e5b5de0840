//! The metrics computation pipeline, from raw issues to scored sprints.
//!
//! Data flows one way: raw issue history -> classified segments ->
//! per-issue record -> per-sprint aggregate -> per-sprint score ->
//! composite index. Per-issue failures are isolated and collected into
//! the run report; a missing baseline aborts the run before any score is
//! emitted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::config::ImpactmapConfig;
use crate::core::aggregate::{active_sprint_name, aggregate_sprints};
use crate::core::metrics::build_issue_metrics;
use crate::core::{
    FlaggedSprint, IssueMetricsRecord, IssueRecord, Result, RunReport, SkippedIssue,
    SprintAggregate, SprintScore, TeamMedians,
};
use crate::scoring;

/// Everything one pipeline run produces.
#[derive(Clone, Debug)]
pub struct PipelineResult {
    pub medians: TeamMedians,
    pub scores: Vec<SprintScore>,
    pub issues: Vec<IssueMetricsRecord>,
    pub report: RunReport,
}

struct ScorableSprint {
    aggregate: SprintAggregate,
    throughput: u32,
    mean_cycle_time: f64,
}

/// Run the full computation over a batch of raw issues and the flow
/// survey map. Network and file I/O happen strictly outside this
/// function.
pub fn run_pipeline(
    issues: &[IssueRecord],
    flow_data: &HashMap<String, f64>,
    config: &ImpactmapConfig,
    now: DateTime<Utc>,
) -> Result<PipelineResult> {
    let statuses = config.workflow.status_map();
    let mut report = RunReport::default();

    let mut records = Vec::with_capacity(issues.len());
    for issue in issues {
        match build_issue_metrics(issue, now, &statuses) {
            Ok(record) => records.push(record),
            Err(err) if err.is_issue_scoped() => {
                log::warn!("Skipping issue {}: {err}", issue.key);
                report.skipped_issues.push(SkippedIssue {
                    key: issue.key.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    log::info!(
        "Built metrics for {} of {} issues",
        records.len(),
        issues.len()
    );

    let mut aggregates = aggregate_sprints(&records, config.sprint.duration_days);

    if config.sprint.exclude_active {
        if let Some(active) = active_sprint_name(&aggregates) {
            log::info!("Excluding active sprint {active:?} from scoring");
            aggregates.retain(|a| a.sprint_name != active);
        }
    }

    for agg in &mut aggregates {
        agg.flow_score_raw = flow_data.get(agg.sprint_name.trim()).copied();
    }

    let mut scorable = Vec::new();
    for aggregate in aggregates {
        match classify_for_scoring(&aggregate) {
            Ok((throughput, mean_cycle_time)) => scorable.push(ScorableSprint {
                aggregate,
                throughput,
                mean_cycle_time,
            }),
            Err(reason) => {
                log::warn!("Flagging sprint {:?}: {reason}", aggregate.sprint_name);
                report.flagged_sprints.push(FlaggedSprint {
                    sprint_name: aggregate.sprint_name.clone(),
                    reason,
                });
            }
        }
    }

    // Baseline and flow fallback come from exactly the sprint set being
    // scored; flagged sprints contribute to neither.
    let medians = scoring::compute_team_medians(scorable.iter().map(|s| &s.aggregate));
    scoring::ensure_baselines(&medians)?;
    let flow_fallback =
        scoring::flow_fallback(scorable.iter().map(|s| &s.aggregate), &config.curve);

    // Per-sprint scoring is independent; the only shared resource is the
    // read-only medians value.
    let mut scores = scorable
        .par_iter()
        .map(|sprint| {
            let flow = scoring::resolve_flow(sprint.aggregate.flow_score_raw, flow_fallback);
            scoring::score_sprint(
                &sprint.aggregate,
                sprint.throughput,
                sprint.mean_cycle_time,
                &medians,
                flow,
                &config.weights,
                &config.curve,
            )
        })
        .collect::<Result<Vec<SprintScore>>>()?;
    scores.sort_by(|a, b| b.sprint_start.cmp(&a.sprint_start));

    Ok(PipelineResult {
        medians,
        scores,
        issues: records,
        report,
    })
}

fn classify_for_scoring(aggregate: &SprintAggregate) -> std::result::Result<(u32, f64), String> {
    if aggregate.sprint_start.is_none() {
        return Err("no parseable sprint start date".to_string());
    }
    let throughput = aggregate
        .throughput
        .ok_or_else(|| "zero completed items; throughput score is undefined".to_string())?;
    let mean_cycle_time = aggregate
        .mean_cycle_time
        .ok_or_else(|| "no cycle-time data".to_string())?;
    Ok((throughput, mean_cycle_time))
}
