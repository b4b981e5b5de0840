//! Local issue-file loading, for offline runs and integration tests.

use std::path::Path;

use crate::core::metrics::count_rejections;
use crate::core::status::StatusMap;
use crate::core::{IssueRecord, Result};

/// Load a JSON array of issue records from disk. Records that carry no
/// rejection count get one derived from their own history, so exports
/// from trackers that omit the field still aggregate correctly.
pub fn load_issues(path: &Path, statuses: &StatusMap) -> Result<Vec<IssueRecord>> {
    let contents = std::fs::read_to_string(path)?;
    let mut issues: Vec<IssueRecord> = serde_json::from_str(&contents)?;
    for issue in &mut issues {
        if issue.rejection_count == 0 {
            issue.rejection_count = count_rejections(&issue.status_history, statuses);
        }
    }
    log::info!("Loaded {} issues from {}", issues.len(), path.display());
    Ok(issues)
}
