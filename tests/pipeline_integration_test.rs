//! End-to-end pipeline tests over synthetic issue batches.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;

use impactmap::config::ImpactmapConfig;
use impactmap::core::{Error, IssueRecord, IssueType, StatusChange};
use impactmap::pipeline::run_pipeline;

fn ts(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, 0, 0).unwrap()
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn history(entries: &[(&str, DateTime<Utc>)]) -> Vec<StatusChange> {
    entries
        .iter()
        .map(|(status, timestamp)| StatusChange {
            status: status.to_string(),
            timestamp: *timestamp,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn issue(
    key: &str,
    issue_type: IssueType,
    sprint_name: &str,
    sprint_start: NaiveDate,
    created: DateTime<Utc>,
    current_status: &str,
    status_history: Vec<StatusChange>,
    rejection_count: u32,
) -> IssueRecord {
    IssueRecord {
        key: key.to_string(),
        issue_type,
        story_points: Some(3.0),
        created,
        sprint_start: Some(sprint_start),
        sprint_name: sprint_name.to_string(),
        status_history,
        current_status: current_status.to_string(),
        rejection_count,
    }
}

/// Two finished sprints, one active sprint, two broken issues, and flow
/// data for one of the two scored sprints.
fn sample_issues() -> Vec<IssueRecord> {
    let s1 = "Iteration 01.06.25";
    let s2 = "Iteration 01.13.25";
    let s3 = "Iteration 01.20.25";

    vec![
        // S1: story with 2 dev days and 1 delivered day, accepted.
        issue(
            "A-1",
            IssueType::Story,
            s1,
            date(1, 6),
            ts(1, 2, 9),
            "Accepted",
            history(&[
                ("Started", ts(1, 6, 9)),
                ("Delivered", ts(1, 8, 9)),
                ("Accepted", ts(1, 9, 9)),
            ]),
            0,
        ),
        // S1: task with 1 dev day, accepted.
        issue(
            "A-2",
            IssueType::Task,
            s1,
            date(1, 6),
            ts(1, 3, 9),
            "Accepted",
            history(&[("Started", ts(1, 6, 9)), ("Accepted", ts(1, 7, 9))]),
            0,
        ),
        // S2: bug created during S1's window, rejected once, reworked
        // over a weekend (Fri -> Mon is one business day).
        issue(
            "B-1",
            IssueType::Bug,
            s2,
            date(1, 13),
            ts(1, 8, 12),
            "Accepted",
            history(&[
                ("Started", ts(1, 13, 9)),
                ("Delivered", ts(1, 15, 9)),
                ("Rejected", ts(1, 16, 9)),
                ("Started", ts(1, 16, 10)),
                ("Delivered", ts(1, 17, 9)),
                ("Accepted", ts(1, 20, 9)),
            ]),
            1,
        ),
        // S2: story that never started; excluded from the cycle-time mean.
        issue(
            "B-2",
            IssueType::Story,
            s2,
            date(1, 13),
            ts(1, 13, 12),
            "To Do",
            history(&[]),
            0,
        ),
        // S3 is the active sprint and must not be scored.
        issue(
            "C-1",
            IssueType::Story,
            s3,
            date(1, 20),
            ts(1, 20, 9),
            "Started",
            history(&[("Started", ts(1, 20, 9))]),
            0,
        ),
        // Malformed history: timestamps out of order.
        issue(
            "M-1",
            IssueType::Story,
            s1,
            date(1, 6),
            ts(1, 2, 9),
            "Accepted",
            history(&[("Started", ts(1, 8, 9)), ("Delivered", ts(1, 6, 9))]),
            0,
        ),
        // Unknown workflow status.
        issue(
            "U-1",
            IssueType::Story,
            s1,
            date(1, 6),
            ts(1, 2, 9),
            "Warp Review",
            history(&[]),
            0,
        ),
    ]
}

fn flow_data() -> HashMap<String, f64> {
    HashMap::from([("Iteration 01.06.25".to_string(), 80.0)])
}

#[test]
fn scores_two_sprints_and_excludes_the_active_one() {
    let result = run_pipeline(
        &sample_issues(),
        &flow_data(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    let names: Vec<&str> = result.scores.iter().map(|s| s.sprint_name.as_str()).collect();
    assert_eq!(names, vec!["Iteration 01.13.25", "Iteration 01.06.25"]);
}

#[test]
fn medians_come_from_the_scored_sprints() {
    let result = run_pipeline(
        &sample_issues(),
        &flow_data(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    // Throughputs 2 and 1, cycle times 2.0 and 5.0.
    assert!((result.medians.median_throughput - 1.5).abs() < 1e-9);
    assert!((result.medians.median_cycle_time - 3.5).abs() < 1e-9);
}

#[test]
fn sprint_scores_follow_the_median_curve() {
    let result = run_pipeline(
        &sample_issues(),
        &flow_data(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    let s1 = result
        .scores
        .iter()
        .find(|s| s.sprint_name == "Iteration 01.06.25")
        .unwrap();
    // Above median on both axes, capped at 100.
    assert_eq!(s1.throughput_score, 100.0);
    assert_eq!(s1.efficiency_score, 100.0);
    assert_eq!(s1.velocity_score, 100.0);
    // One bug created in the window, no rejections on one delivered item.
    assert_eq!(s1.bug_score, 80.0);
    assert_eq!(s1.rejection_score, 100.0);
    assert!((s1.quality_score - 88.0).abs() < 1e-9);
    assert_eq!(s1.flow_score, 80.0);
    assert!(!s1.flow_imputed);
    assert!((s1.overall_score - 93.2).abs() < 1e-9);

    let s2 = result
        .scores
        .iter()
        .find(|s| s.sprint_name == "Iteration 01.13.25")
        .unwrap();
    assert!((s2.throughput_score - 70.0 / 1.5).abs() < 1e-9);
    assert!((s2.efficiency_score - 49.0).abs() < 1e-9);
    assert!((s2.velocity_score - 47.6).abs() < 1e-6);
    // No bugs created in the window; one rejection on one delivered item.
    assert_eq!(s2.bug_score, 100.0);
    assert_eq!(s2.rejection_score, 0.0);
    assert!((s2.quality_score - 60.0).abs() < 1e-9);
    // Imputed from the run average of available survey scores.
    assert!(s2.flow_imputed);
    assert_eq!(s2.flow_score, 80.0);
    assert!((s2.overall_score - 57.56).abs() < 1e-6);
}

#[test]
fn broken_issues_are_skipped_and_reported_not_fatal() {
    let result = run_pipeline(
        &sample_issues(),
        &flow_data(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    let mut skipped: Vec<&str> = result
        .report
        .skipped_issues
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    skipped.sort();
    assert_eq!(skipped, vec!["M-1", "U-1"]);

    let unknown = result
        .report
        .skipped_issues
        .iter()
        .find(|s| s.key == "U-1")
        .unwrap();
    assert!(unknown.reason.contains("Warp Review"));

    // Scoring still happened for the unaffected sprints.
    assert_eq!(result.scores.len(), 2);
}

#[test]
fn weekend_rework_cycle_times_are_cumulative() {
    let result = run_pipeline(
        &sample_issues(),
        &flow_data(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    let b1 = result.issues.iter().find(|i| i.key == "B-1").unwrap();
    // Two dev stretches (2 + 1 days) and two delivered stretches, the
    // second spanning a weekend (Friday -> Monday = 1 business day).
    assert_eq!(b1.segments.dev_days, 3.0);
    assert_eq!(b1.segments.delivered_days, 2.0);
    assert_eq!(b1.total_active_days, 5.0);
    assert!(b1.was_rejected);
    assert!(b1.is_completed);
}

#[test]
fn sprint_without_completed_items_is_flagged_not_zeroed() {
    let issues = vec![
        issue(
            "A-1",
            IssueType::Story,
            "Iteration 01.06.25",
            date(1, 6),
            ts(1, 2, 9),
            "Accepted",
            history(&[("Started", ts(1, 6, 9)), ("Accepted", ts(1, 8, 9))]),
            0,
        ),
        // Only in-flight work: throughput is undefined for this sprint.
        issue(
            "D-1",
            IssueType::Story,
            "Iteration 12.30.24",
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 29, 9, 0, 0).unwrap(),
            "Started",
            history(&[("Started", Utc.with_ymd_and_hms(2024, 12, 30, 9, 0, 0).unwrap())]),
            0,
        ),
        // A later sprint so 01.06.25 is not dropped as the active one.
        issue(
            "C-1",
            IssueType::Story,
            "Iteration 01.13.25",
            date(1, 13),
            ts(1, 13, 9),
            "Started",
            history(&[("Started", ts(1, 13, 9))]),
            0,
        ),
    ];

    let result = run_pipeline(
        &issues,
        &HashMap::new(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap();

    assert_eq!(result.scores.len(), 1);
    assert_eq!(result.report.flagged_sprints.len(), 1);
    let flagged = &result.report.flagged_sprints[0];
    assert_eq!(flagged.sprint_name, "Iteration 12.30.24");
    assert!(flagged.reason.contains("throughput"));
}

#[test]
fn no_survey_data_at_all_uses_the_configured_default() {
    let issues = vec![
        issue(
            "A-1",
            IssueType::Story,
            "Iteration 01.06.25",
            date(1, 6),
            ts(1, 2, 9),
            "Accepted",
            history(&[("Started", ts(1, 6, 9)), ("Accepted", ts(1, 8, 9))]),
            0,
        ),
        issue(
            "C-1",
            IssueType::Story,
            "Iteration 01.13.25",
            date(1, 13),
            ts(1, 13, 9),
            "Started",
            history(&[("Started", ts(1, 13, 9))]),
            0,
        ),
    ];

    let config = ImpactmapConfig::default();
    let result = run_pipeline(&issues, &HashMap::new(), &config, ts(2, 3, 0)).unwrap();

    assert_eq!(result.scores.len(), 1);
    assert!(result.scores[0].flow_imputed);
    assert_eq!(result.scores[0].flow_score, config.curve.flow_default);
}

#[test]
fn run_without_any_cycle_time_baseline_aborts() {
    // The only scorable candidate has a completed issue with no history,
    // so there is no cycle-time median to score against.
    let issues = vec![
        issue(
            "A-1",
            IssueType::Story,
            "Iteration 01.06.25",
            date(1, 6),
            ts(1, 2, 9),
            "Accepted",
            history(&[]),
            0,
        ),
        issue(
            "C-1",
            IssueType::Story,
            "Iteration 01.13.25",
            date(1, 13),
            ts(1, 13, 9),
            "Started",
            history(&[("Started", ts(1, 13, 9))]),
            0,
        ),
    ];

    let err = run_pipeline(
        &issues,
        &HashMap::new(),
        &ImpactmapConfig::default(),
        ts(2, 3, 0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UndefinedBaseline { .. }));
}
