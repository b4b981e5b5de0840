//! Sprint Aggregator: folds per-issue metrics records into per-sprint
//! raw aggregates.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use super::{IssueMetricsRecord, SprintAggregate};

/// Group records by sprint name and compute each sprint's raw aggregate.
///
/// A metric with zero qualifying records yields `None`, not zero: zero is
/// a valid measured value and must not be conflated with "no data". Bug
/// counting scans the whole record set by creation date regardless of
/// sprint assignment, so bugs filed against a later sprint still land in
/// the window they were created in.
pub fn aggregate_sprints(
    records: &[IssueMetricsRecord],
    sprint_duration_days: i64,
) -> Vec<SprintAggregate> {
    let mut by_sprint: BTreeMap<&str, Vec<&IssueMetricsRecord>> = BTreeMap::new();
    for record in records {
        by_sprint
            .entry(record.sprint_name.as_str())
            .or_default()
            .push(record);
    }

    let mut aggregates: Vec<SprintAggregate> = by_sprint
        .into_iter()
        .map(|(sprint_name, members)| {
            let sprint_start = members.iter().filter_map(|r| r.sprint_start).max();

            let completed = members.iter().filter(|r| r.is_completed).count() as u32;
            let throughput = (completed > 0).then_some(completed);

            let active: Vec<f64> = members
                .iter()
                .map(|r| r.total_active_days)
                .filter(|days| *days > 0.0)
                .collect();
            let mean_cycle_time =
                (!active.is_empty()).then(|| active.iter().sum::<f64>() / active.len() as f64);

            let deliverable: Vec<&&IssueMetricsRecord> = members
                .iter()
                .filter(|r| r.issue_type.counts_for_delivery())
                .collect();
            let delivered_items = (!deliverable.is_empty())
                .then(|| deliverable.iter().filter(|r| r.reached_delivered).count() as u32);
            let rejections = (!deliverable.is_empty())
                .then(|| deliverable.iter().map(|r| r.rejection_count).sum::<u32>());

            let bugs_created =
                sprint_start.map(|start| count_bugs_in_window(records, start, sprint_duration_days));

            SprintAggregate {
                sprint_name: sprint_name.to_string(),
                sprint_start,
                throughput,
                mean_cycle_time,
                bugs_created,
                delivered_items,
                rejections,
                flow_score_raw: None,
            }
        })
        .collect();

    // Most recent sprint first; sprints without a parseable start date sort last.
    aggregates.sort_by(|a, b| b.sprint_start.cmp(&a.sprint_start));
    aggregates
}

/// Bugs created inside `[start, start + duration_days]`, inclusive on both
/// ends, across the whole run.
fn count_bugs_in_window(
    records: &[IssueMetricsRecord],
    start: NaiveDate,
    duration_days: i64,
) -> u32 {
    let end = start + Duration::days(duration_days);
    records
        .iter()
        .filter(|r| {
            r.issue_type == super::IssueType::Bug && {
                let created = r.created.date_naive();
                created >= start && created <= end
            }
        })
        .count() as u32
}

/// The sprint with the latest start date is still in flight. Its scores
/// would be misleading mid-sprint, so callers exclude it from scoring.
pub fn active_sprint_name(aggregates: &[SprintAggregate]) -> Option<String> {
    aggregates
        .iter()
        .filter(|a| a.sprint_start.is_some())
        .max_by_key(|a| a.sprint_start)
        .map(|a| a.sprint_name.clone())
}
