//! Workflow status classification.
//!
//! Raw tracker statuses are an open string space; the pipeline works on a
//! closed set of lifecycle categories. Membership is configuration-driven
//! and classification fails loudly on unmapped strings so that workflow
//! drift is caught at run time instead of corrupting aggregates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fixed set of lifecycle categories a raw workflow status maps into.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Unstarted,
    Started,
    Blocked,
    PeerReview,
    Finished,
    Delivered,
    Accepted,
    Rejected,
    Canceled,
}

impl StatusCategory {
    /// True for the categories that accumulate cycle time.
    pub fn is_active_work(self) -> bool {
        matches!(
            self,
            StatusCategory::Started
                | StatusCategory::PeerReview
                | StatusCategory::Finished
                | StatusCategory::Delivered
        )
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(StatusCategory, &str)] = &[
            (StatusCategory::Unstarted, "Unstarted"),
            (StatusCategory::Started, "Started"),
            (StatusCategory::Blocked, "Blocked"),
            (StatusCategory::PeerReview, "Peer Review"),
            (StatusCategory::Finished, "Finished"),
            (StatusCategory::Delivered, "Delivered"),
            (StatusCategory::Accepted, "Accepted"),
            (StatusCategory::Rejected, "Rejected"),
            (StatusCategory::Canceled, "Canceled"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Normalize a raw status string for lookup: lowercase, dashes to spaces,
/// whitespace collapsed. "Closed - Completed" and "closed-completed" both
/// normalize to "closed completed".
pub fn normalize_status(raw: &str) -> String {
    raw.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lookup table from normalized raw status names to lifecycle categories.
/// Built once per run from configuration and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct StatusMap {
    entries: HashMap<String, StatusCategory>,
}

impl StatusMap {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, StatusCategory)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, category)| (normalize_status(name.as_ref()), category))
            .collect();
        Self { entries }
    }

    /// Classify a raw status string. `None` means the status is not in the
    /// configured workflow; callers turn that into an `UnknownStatus` error
    /// carrying the issue key.
    pub fn classify(&self, raw: &str) -> Option<StatusCategory> {
        self.entries.get(&normalize_status(raw)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
