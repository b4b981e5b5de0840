// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod jira;
pub mod pipeline;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    CycleTimeSegments, Error, FlaggedSprint, IssueMetricsRecord, IssueRecord, IssueType, Result,
    RunOutput, RunReport, SkippedIssue, SprintAggregate, SprintScore, StatusCategory, StatusChange,
    StatusMap, TeamMedians,
};

pub use crate::config::{load_config, ImpactmapConfig};

pub use crate::core::aggregate::{active_sprint_name, aggregate_sprints};
pub use crate::core::cycle_time::{business_days_between, cycle_time_segments};
pub use crate::core::metrics::{build_issue_metrics, count_rejections};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::pipeline::{run_pipeline, PipelineResult};

pub use crate::scoring::{
    compute_team_medians, score_sprint, MedianCurve, ScoreDirection,
};
