//! Serde models for the tracker's search response and the mapping into
//! [`IssueRecord`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::config::TrackerConfig;
use crate::core::metrics::count_rejections;
use crate::core::status::StatusMap;
use crate::core::{Error, IssueRecord, IssueType, Result, StatusChange};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "startAt")]
    pub start_at: u32,
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub fields: RawFields,
    #[serde(default)]
    pub changelog: Changelog,
}

#[derive(Debug, Deserialize)]
pub struct RawFields {
    pub status: NamedField,
    #[serde(rename = "issuetype")]
    pub issue_type: NamedField,
    pub created: String,
    /// Custom fields keyed by field id; which ids matter comes from
    /// configuration, so they stay untyped here.
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

#[derive(Debug, Deserialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryItem {
    pub field: String,
    #[serde(rename = "toString", default)]
    pub to: Option<String>,
}

/// Trackers serialize timestamps with or without fractional seconds.
pub fn parse_tracker_datetime(raw: &str) -> Result<DateTime<Utc>> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.3f%z", "%Y-%m-%dT%H:%M:%S%z"];
    for format in FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    Err(Error::Tracker(format!("unparseable timestamp {raw:?}")))
}

static SPRINT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Iteration (\d{2})\.(\d{2})\.(\d{2})").expect("valid sprint date regex")
});
static SPRINT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"name=([^,\]]+)").expect("valid sprint name regex"));
static SPRINT_GOAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"goal=([^,\]]*)").expect("valid sprint goal regex"));

/// Parse the start date out of an "Iteration MM.DD.YY" sprint name.
pub fn sprint_date_from_name(name: &str) -> Option<NaiveDate> {
    let captures = SPRINT_DATE_RE.captures(name)?;
    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

struct SprintInfo {
    name: String,
    start: Option<NaiveDate>,
    goal: String,
}

/// The sprint field is either a list of objects or of the legacy
/// toString-serialized form; handle both.
fn extract_sprints(value: &Value) -> Vec<SprintInfo> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => {
                let name = fields.get("name")?.as_str()?.to_string();
                let goal = fields
                    .get("goal")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some(SprintInfo {
                    start: sprint_date_from_name(&name),
                    name,
                    goal,
                })
            }
            Value::String(serialized) => {
                let name = SPRINT_NAME_RE
                    .captures(serialized)
                    .map(|c| c[1].to_string())
                    .unwrap_or_else(|| serialized.clone());
                let goal = SPRINT_GOAL_RE
                    .captures(serialized)
                    .map(|c| c[1].to_string())
                    .unwrap_or_default();
                Some(SprintInfo {
                    start: sprint_date_from_name(&name),
                    name,
                    goal,
                })
            }
            _ => None,
        })
        .collect()
}

/// Map a raw tracker issue into a pipeline record.
///
/// Returns `Ok(None)` for issues filtered out on purpose: types outside
/// Story/Bug/Task, and issues whose sprint goal does not mention the
/// configured team (shared boards carry several teams' work).
pub fn to_issue_record(
    raw: &RawIssue,
    tracker: &TrackerConfig,
    statuses: &StatusMap,
) -> Result<Option<IssueRecord>> {
    let Some(issue_type) = IssueType::parse(&raw.fields.issue_type.name) else {
        log::debug!(
            "Ignoring {} with untracked type {:?}",
            raw.key,
            raw.fields.issue_type.name
        );
        return Ok(None);
    };

    let created = parse_tracker_datetime(&raw.fields.created)?;

    let story_points = raw
        .fields
        .custom
        .get(&tracker.story_points_field)
        .and_then(Value::as_f64);

    let mut sprint_name = "Unknown Sprint".to_string();
    let mut sprint_start = None;
    if let Some(sprint_value) = raw.fields.custom.get(&tracker.sprint_field) {
        let sprints = extract_sprints(sprint_value);
        // The sprint with the latest start date is the issue's current
        // assignment; earlier entries are carried-over history.
        if let Some(latest) = sprints.iter().max_by_key(|s| s.start) {
            if !latest.goal.contains(&tracker.team_filter) {
                log::debug!(
                    "Ignoring {}: sprint goal does not mention team {:?}",
                    raw.key,
                    tracker.team_filter
                );
                return Ok(None);
            }
            sprint_name = latest.name.clone();
            sprint_start = latest.start;
        }
    }

    let mut status_history = Vec::new();
    for history in &raw.changelog.histories {
        let timestamp = parse_tracker_datetime(&history.created)?;
        for item in &history.items {
            if item.field == "status" {
                if let Some(to) = &item.to {
                    status_history.push(StatusChange {
                        status: to.clone(),
                        timestamp,
                    });
                }
            }
        }
    }
    // Changelog pages are not guaranteed to arrive in order.
    status_history.sort_by_key(|change| change.timestamp);

    let rejection_count = count_rejections(&status_history, statuses);

    Ok(Some(IssueRecord {
        key: raw.key.clone(),
        issue_type,
        story_points,
        created,
        sprint_start,
        sprint_name,
        status_history,
        current_status: raw.fields.status.name.clone(),
        rejection_count,
    }))
}
