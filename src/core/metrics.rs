//! Issue Metrics Builder: combines classification and cycle-time output
//! with issue metadata into one metrics record per issue.

use chrono::{DateTime, Utc};

use super::cycle_time::cycle_time_segments;
use super::errors::{Error, Result};
use super::status::{StatusCategory, StatusMap};
use super::{IssueMetricsRecord, IssueRecord, StatusChange};

/// Build the derived metrics record for one issue.
///
/// `is_completed` holds iff the current status classifies as Accepted;
/// the current status is authoritative even when the history regressed
/// after a later acceptance. `reached_delivered` and `was_rejected` are
/// pure history scans.
pub fn build_issue_metrics(
    issue: &IssueRecord,
    now: DateTime<Utc>,
    statuses: &StatusMap,
) -> Result<IssueMetricsRecord> {
    let segments = cycle_time_segments(&issue.key, &issue.status_history, now, statuses)?;

    let current = statuses
        .classify(&issue.current_status)
        .ok_or_else(|| Error::unknown_status(&issue.key, &issue.current_status))?;
    let is_completed = current == StatusCategory::Accepted;

    let mut reached_delivered =
        matches!(current, StatusCategory::Delivered | StatusCategory::Accepted);
    let mut was_rejected = false;
    for change in &issue.status_history {
        let category = statuses
            .classify(&change.status)
            .ok_or_else(|| Error::unknown_status(&issue.key, &change.status))?;
        match category {
            StatusCategory::Delivered | StatusCategory::Accepted => reached_delivered = true,
            StatusCategory::Rejected => was_rejected = true,
            _ => {}
        }
    }

    Ok(IssueMetricsRecord {
        key: issue.key.clone(),
        issue_type: issue.issue_type,
        story_points: issue.story_points,
        created: issue.created,
        sprint_start: issue.sprint_start,
        sprint_name: issue.sprint_name.clone(),
        current_status: issue.current_status.clone(),
        segments,
        total_active_days: segments.total_active_days(),
        reached_delivered,
        was_rejected,
        is_completed,
        rejection_count: issue.rejection_count,
    })
}

/// Changelog scan for loaders that do not carry a rejection count:
/// one rejection per Delivered -> Rejected transition. Statuses outside
/// the configured workflow are left for [`build_issue_metrics`] to report.
pub fn count_rejections(history: &[StatusChange], statuses: &StatusMap) -> u32 {
    history
        .windows(2)
        .filter(|pair| {
            statuses.classify(&pair[0].status) == Some(StatusCategory::Delivered)
                && statuses.classify(&pair[1].status) == Some(StatusCategory::Rejected)
        })
        .count() as u32
}
