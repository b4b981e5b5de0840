//! Shared error types for the application

use thiserror::Error;

/// Main error type for impactmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// A workflow status string with no configured lifecycle category.
    /// Fatal for the affected issue; the run reports which issue and
    /// which status triggered it instead of producing wrong metrics.
    #[error("unknown workflow status {status:?} on issue {issue}")]
    UnknownStatus { issue: String, status: String },

    /// Status-change history with out-of-order timestamps. Fatal for
    /// that issue only; the rest of the run continues.
    #[error("malformed status history for issue {issue}: {message}")]
    MalformedHistory { issue: String, message: String },

    /// A zero team median. No scoring is meaningful without a baseline,
    /// so this aborts the run before any score is emitted.
    #[error("undefined baseline: team median for {metric} is zero")]
    UndefinedBaseline { metric: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ticket tracker API errors
    #[error("Tracker API error: {0}")]
    Tracker(String),

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn unknown_status(issue: impl Into<String>, status: impl Into<String>) -> Self {
        Self::UnknownStatus {
            issue: issue.into(),
            status: status.into(),
        }
    }

    pub fn malformed_history(issue: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedHistory {
            issue: issue.into(),
            message: message.into(),
        }
    }

    pub fn undefined_baseline(metric: impl Into<String>) -> Self {
        Self::UndefinedBaseline {
            metric: metric.into(),
        }
    }

    /// True for failures scoped to a single issue, which are collected
    /// into the run report rather than aborting the run.
    pub fn is_issue_scoped(&self) -> bool {
        matches!(
            self,
            Self::UnknownStatus { .. } | Self::MalformedHistory { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
