pub mod aggregate;
pub mod cycle_time;
pub mod errors;
pub mod metrics;
pub mod status;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use errors::{Error, Result};
pub use status::{StatusCategory, StatusMap};

/// Workflow item types tracked by the pipeline. Anything else (epics,
/// initiatives) is filtered out at the retrieval edge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IssueType {
    Story,
    Bug,
    Task,
}

impl IssueType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "story" | "user story" => Some(IssueType::Story),
            "bug" | "defect" => Some(IssueType::Bug),
            "task" | "sub-task" | "subtask" | "chore" => Some(IssueType::Task),
            _ => None,
        }
    }

    /// Tasks are auto-accepted by workflow convention and never count
    /// toward delivered items or rejection rates.
    pub fn counts_for_delivery(self) -> bool {
        matches!(self, IssueType::Story | IssueType::Bug)
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IssueType::Story => "Story",
            IssueType::Bug => "Bug",
            IssueType::Task => "Task",
        };
        write!(f, "{s}")
    }
}

/// One entry of an issue's status-change history: the status entered at
/// `timestamp`. Ordered ascending by timestamp, immutable once captured.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// A raw issue as handed over by the retrieval collaborator. Owned by the
/// pipeline run that fetched it and never mutated after construction;
/// derived metrics go into a separate [`IssueMetricsRecord`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub issue_type: IssueType,
    #[serde(default)]
    pub story_points: Option<f64>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub sprint_start: Option<NaiveDate>,
    pub sprint_name: String,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    pub current_status: String,
    #[serde(default)]
    pub rejection_count: u32,
}

/// Business days spent in each active-work category, cumulative across
/// rework cycles.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CycleTimeSegments {
    pub dev_days: f64,
    pub review_days: f64,
    pub finished_days: f64,
    pub delivered_days: f64,
}

impl CycleTimeSegments {
    pub fn total_active_days(&self) -> f64 {
        self.dev_days + self.review_days + self.finished_days + self.delivered_days
    }

    /// Accumulate `days` into the bucket for `category`. Non-active
    /// categories contribute nothing.
    pub fn add(&mut self, category: StatusCategory, days: f64) {
        match category {
            StatusCategory::Started => self.dev_days += days,
            StatusCategory::PeerReview => self.review_days += days,
            StatusCategory::Finished => self.finished_days += days,
            StatusCategory::Delivered => self.delivered_days += days,
            _ => {}
        }
    }
}

/// Per-issue metrics record: the raw issue plus everything derived from
/// its history. One per issue per run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueMetricsRecord {
    pub key: String,
    pub issue_type: IssueType,
    pub story_points: Option<f64>,
    pub created: DateTime<Utc>,
    pub sprint_start: Option<NaiveDate>,
    pub sprint_name: String,
    pub current_status: String,
    pub segments: CycleTimeSegments,
    pub total_active_days: f64,
    pub reached_delivered: bool,
    pub was_rejected: bool,
    pub is_completed: bool,
    pub rejection_count: u32,
}

/// Raw per-sprint aggregate. `None` means "no qualifying records for this
/// metric", which is distinct from a measured zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SprintAggregate {
    pub sprint_name: String,
    pub sprint_start: Option<NaiveDate>,
    pub throughput: Option<u32>,
    pub mean_cycle_time: Option<f64>,
    pub bugs_created: Option<u32>,
    pub delivered_items: Option<u32>,
    pub rejections: Option<u32>,
    pub flow_score_raw: Option<f64>,
}

/// Team-relative scoring baseline, computed once per run across the same
/// sprint set being scored and passed by parameter into every scoring
/// call. The baseline floats with each run's historical window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TeamMedians {
    pub median_throughput: f64,
    pub median_cycle_time: f64,
}

/// Terminal artifact of the pipeline: one scored sprint. Component scores
/// are carried for the raw-data export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SprintScore {
    pub sprint_name: String,
    pub sprint_start: Option<NaiveDate>,
    pub velocity_score: f64,
    pub quality_score: f64,
    pub flow_score: f64,
    pub overall_score: f64,
    pub throughput_score: f64,
    pub efficiency_score: f64,
    pub bug_score: f64,
    pub rejection_score: f64,
    pub flow_imputed: bool,
}

/// An issue dropped from the run, with the reason it was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkippedIssue {
    pub key: String,
    pub reason: String,
}

/// A sprint excluded from scoring rather than silently defaulted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlaggedSprint {
    pub sprint_name: String,
    pub reason: String,
}

/// Run-level account of everything that was skipped or flagged. Nothing
/// is dropped without a record here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub skipped_issues: Vec<SkippedIssue>,
    pub flagged_sprints: Vec<FlaggedSprint>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_issues.is_empty() && self.flagged_sprints.is_empty()
    }
}

/// Everything a reporting collaborator needs: scored sprints, the
/// per-issue audit records, and the run report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutput {
    pub generated_at: DateTime<Utc>,
    pub team: String,
    pub medians: TeamMedians,
    pub scores: Vec<SprintScore>,
    pub issues: Vec<IssueMetricsRecord>,
    pub report: RunReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_type_parsing() {
        assert_eq!(IssueType::parse("Story"), Some(IssueType::Story));
        assert_eq!(IssueType::parse("Sub-task"), Some(IssueType::Task));
        assert_eq!(IssueType::parse("Defect"), Some(IssueType::Bug));
        assert_eq!(IssueType::parse("Epic"), None);
    }

    #[test]
    fn tasks_do_not_count_for_delivery() {
        assert!(IssueType::Story.counts_for_delivery());
        assert!(IssueType::Bug.counts_for_delivery());
        assert!(!IssueType::Task.counts_for_delivery());
    }

    #[test]
    fn segments_total_is_sum_of_buckets() {
        let segments = CycleTimeSegments {
            dev_days: 2.0,
            review_days: 1.0,
            finished_days: 0.5,
            delivered_days: 1.5,
        };
        assert_eq!(segments.total_active_days(), 5.0);
    }

    #[test]
    fn segments_ignore_inactive_categories() {
        let mut segments = CycleTimeSegments::default();
        segments.add(StatusCategory::Blocked, 3.0);
        segments.add(StatusCategory::Unstarted, 1.0);
        assert_eq!(segments.total_active_days(), 0.0);
    }
}
