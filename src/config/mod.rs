//! Configuration for impactmap: workflow status tables, scoring weights,
//! curve constants, sprint window, and tracker field ids.
//!
//! Everything has a serde default so a missing or partial
//! `.impactmap.toml` still yields a working configuration.

mod loader;

pub use loader::{load_config, parse_and_validate_config};

use serde::{Deserialize, Serialize};

use crate::core::status::{StatusCategory, StatusMap};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactmapConfig {
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub sprint: SprintConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Raw status names per lifecycle category. Names are normalized before
/// lookup, so "Closed - Completed" and "closed completed" are the same
/// entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_unstarted")]
    pub unstarted: Vec<String>,
    #[serde(default = "default_started")]
    pub started: Vec<String>,
    #[serde(default = "default_blocked")]
    pub blocked: Vec<String>,
    #[serde(default = "default_peer_review")]
    pub peer_review: Vec<String>,
    #[serde(default = "default_finished")]
    pub finished: Vec<String>,
    #[serde(default = "default_delivered")]
    pub delivered: Vec<String>,
    #[serde(default = "default_accepted")]
    pub accepted: Vec<String>,
    #[serde(default = "default_rejected")]
    pub rejected: Vec<String>,
    #[serde(default = "default_canceled")]
    pub canceled: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            unstarted: default_unstarted(),
            started: default_started(),
            blocked: default_blocked(),
            peer_review: default_peer_review(),
            finished: default_finished(),
            delivered: default_delivered(),
            accepted: default_accepted(),
            rejected: default_rejected(),
            canceled: default_canceled(),
        }
    }
}

impl WorkflowConfig {
    /// Build the classification table used everywhere in the run.
    pub fn status_map(&self) -> StatusMap {
        let sections: [(&[String], StatusCategory); 9] = [
            (&self.unstarted, StatusCategory::Unstarted),
            (&self.started, StatusCategory::Started),
            (&self.blocked, StatusCategory::Blocked),
            (&self.peer_review, StatusCategory::PeerReview),
            (&self.finished, StatusCategory::Finished),
            (&self.delivered, StatusCategory::Delivered),
            (&self.accepted, StatusCategory::Accepted),
            (&self.rejected, StatusCategory::Rejected),
            (&self.canceled, StatusCategory::Canceled),
        ];
        StatusMap::from_entries(
            sections
                .into_iter()
                .flat_map(|(names, category)| names.iter().map(move |n| (n.clone(), category))),
        )
    }
}

fn default_unstarted() -> Vec<String> {
    vec_of(&["to do", "open", "backlog", "unscheduled"])
}
fn default_started() -> Vec<String> {
    vec_of(&["started", "in progress"])
}
fn default_blocked() -> Vec<String> {
    vec_of(&["blocked", "on hold"])
}
fn default_peer_review() -> Vec<String> {
    vec_of(&["peer review", "in review", "code review"])
}
fn default_finished() -> Vec<String> {
    vec_of(&["finished"])
}
fn default_delivered() -> Vec<String> {
    vec_of(&["delivered"])
}
fn default_accepted() -> Vec<String> {
    vec_of(&["accepted", "uat", "ready for release", "closed completed"])
}
fn default_rejected() -> Vec<String> {
    vec_of(&["rejected"])
}
fn default_canceled() -> Vec<String> {
    vec_of(&["closed canceled", "canceled", "won't do"])
}

fn vec_of(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Index and component weights. Each group must sum to 1.0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightsConfig {
    /// Weight of velocity in the overall index (0.0-1.0)
    #[serde(default = "default_velocity_weight")]
    pub velocity: f64,
    /// Weight of flow in the overall index (0.0-1.0)
    #[serde(default = "default_flow_weight")]
    pub flow: f64,
    /// Weight of quality in the overall index (0.0-1.0)
    #[serde(default = "default_quality_weight")]
    pub quality: f64,
    /// Throughput share of the velocity score (0.0-1.0)
    #[serde(default = "default_throughput_weight")]
    pub velocity_throughput: f64,
    /// Efficiency share of the velocity score (0.0-1.0)
    #[serde(default = "default_efficiency_weight")]
    pub velocity_efficiency: f64,
    /// Bug share of the quality score (0.0-1.0)
    #[serde(default = "default_bugs_weight")]
    pub quality_bugs: f64,
    /// Rejection share of the quality score (0.0-1.0)
    #[serde(default = "default_rejections_weight")]
    pub quality_rejections: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity_weight(),
            flow: default_flow_weight(),
            quality: default_quality_weight(),
            velocity_throughput: default_throughput_weight(),
            velocity_efficiency: default_efficiency_weight(),
            quality_bugs: default_bugs_weight(),
            quality_rejections: default_rejections_weight(),
        }
    }
}

impl WeightsConfig {
    fn validate_group(name: &str, weights: &[f64]) -> Result<(), String> {
        for w in weights {
            if !(0.0..=1.0).contains(w) {
                return Err(format!("{name} weights must be between 0.0 and 1.0"));
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 0.001 {
            return Err(format!("{name} weights must sum to 1.0, but sum to {sum:.3}"));
        }
        Ok(())
    }

    /// Validate all three weight groups (with small tolerance for
    /// floating point).
    pub fn validate(&self) -> Result<(), String> {
        Self::validate_group("index", &[self.velocity, self.flow, self.quality])?;
        Self::validate_group(
            "velocity",
            &[self.velocity_throughput, self.velocity_efficiency],
        )?;
        Self::validate_group("quality", &[self.quality_bugs, self.quality_rejections])?;
        Ok(())
    }

    /// Normalize each group to ensure an exact sum of 1.0.
    pub fn normalize(&mut self) {
        let index_sum = self.velocity + self.flow + self.quality;
        if index_sum > 0.0 && (index_sum - 1.0).abs() > 0.001 {
            self.velocity /= index_sum;
            self.flow /= index_sum;
            self.quality /= index_sum;
        }
        let velocity_sum = self.velocity_throughput + self.velocity_efficiency;
        if velocity_sum > 0.0 && (velocity_sum - 1.0).abs() > 0.001 {
            self.velocity_throughput /= velocity_sum;
            self.velocity_efficiency /= velocity_sum;
        }
        let quality_sum = self.quality_bugs + self.quality_rejections;
        if quality_sum > 0.0 && (quality_sum - 1.0).abs() > 0.001 {
            self.quality_bugs /= quality_sum;
            self.quality_rejections /= quality_sum;
        }
    }
}

fn default_velocity_weight() -> f64 {
    0.60
}
fn default_flow_weight() -> f64 {
    0.25
}
fn default_quality_weight() -> f64 {
    0.15
}
fn default_throughput_weight() -> f64 {
    0.60
}
fn default_efficiency_weight() -> f64 {
    0.40
}
fn default_bugs_weight() -> f64 {
    0.60
}
fn default_rejections_weight() -> f64 {
    0.40
}

/// Constants of the median-anchored grading curve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Score anchored at the team median
    #[serde(default = "default_median_baseline")]
    pub median_baseline: f64,
    /// Score ceiling, reached at double (or half) the median
    #[serde(default = "default_excellence")]
    pub excellence: f64,
    /// Quality penalty per bug created in a sprint window
    #[serde(default = "default_bug_penalty")]
    pub bug_penalty: f64,
    /// Bugs beyond this count no longer deepen the penalty
    #[serde(default = "default_bug_cap")]
    pub bug_cap: u32,
    /// Flow score used when no survey data exists for the whole run
    #[serde(default = "default_flow_score")]
    pub flow_default: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            median_baseline: default_median_baseline(),
            excellence: default_excellence(),
            bug_penalty: default_bug_penalty(),
            bug_cap: default_bug_cap(),
            flow_default: default_flow_score(),
        }
    }
}

fn default_median_baseline() -> f64 {
    70.0
}
fn default_excellence() -> f64 {
    100.0
}
fn default_bug_penalty() -> f64 {
    20.0
}
fn default_bug_cap() -> u32 {
    5
}
fn default_flow_score() -> f64 {
    70.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SprintConfig {
    /// Length of the bug-counting window following a sprint start
    #[serde(default = "default_sprint_duration")]
    pub duration_days: i64,
    /// Drop the most recent sprint from scoring; it is still in flight
    #[serde(default = "default_exclude_active")]
    pub exclude_active: bool,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            duration_days: default_sprint_duration(),
            exclude_active: default_exclude_active(),
        }
    }
}

fn default_sprint_duration() -> i64 {
    7
}
fn default_exclude_active() -> bool {
    true
}

/// Tracker project and custom-field ids. Credentials come from the
/// environment, not from this file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default = "default_team_field")]
    pub team_field: String,
    #[serde(default = "default_team_filter")]
    pub team_filter: String,
    #[serde(default = "default_story_points_field")]
    pub story_points_field: String,
    #[serde(default = "default_sprint_field")]
    pub sprint_field: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            project_key: default_project_key(),
            team_field: default_team_field(),
            team_filter: default_team_filter(),
            story_points_field: default_story_points_field(),
            sprint_field: default_sprint_field(),
            page_size: default_page_size(),
        }
    }
}

fn default_project_key() -> String {
    "PROJ".to_string()
}
fn default_team_field() -> String {
    "customfield_10400".to_string()
}
fn default_team_filter() -> String {
    "Foundation".to_string()
}
fn default_story_points_field() -> String {
    "customfield_10006".to_string()
}
fn default_sprint_field() -> String {
    "customfield_10001".to_string()
}
fn default_page_size() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::StatusCategory;

    #[test]
    fn default_weights_validate() {
        assert!(WeightsConfig::default().validate().is_ok());
    }

    #[test]
    fn unbalanced_weights_fail_validation() {
        let weights = WeightsConfig {
            velocity: 0.9,
            flow: 0.9,
            quality: 0.9,
            ..Default::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn normalize_restores_unit_sum() {
        let mut weights = WeightsConfig {
            velocity: 3.0,
            flow: 1.0,
            quality: 1.0,
            ..Default::default()
        };
        weights.normalize();
        assert!((weights.velocity + weights.flow + weights.quality - 1.0).abs() < 1e-9);
        assert!((weights.velocity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn default_workflow_covers_the_original_statuses() {
        let map = WorkflowConfig::default().status_map();
        assert_eq!(map.classify("Ready for Release"), Some(StatusCategory::Accepted));
        assert_eq!(map.classify("Closed - Completed"), Some(StatusCategory::Accepted));
        assert_eq!(map.classify("UAT"), Some(StatusCategory::Accepted));
        assert_eq!(map.classify("Peer Review"), Some(StatusCategory::PeerReview));
        assert_eq!(map.classify("Rejected"), Some(StatusCategory::Rejected));
        assert_eq!(map.classify("definitely not a status"), None);
    }
}
