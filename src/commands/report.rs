//! The report command: I/O at the edges, the pure pipeline in the
//! middle.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::config::load_config;
use crate::core::{RunOutput, SkippedIssue};
use crate::io::writers::csv::write_issue_rows;
use crate::io::{self, create_writer, OutputFormat};
use crate::jira::{to_issue_record, JiraClient, TrackerCredentials};
use crate::pipeline::run_pipeline;

pub struct ReportConfig {
    pub input: Option<PathBuf>,
    pub flow_data: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub raw_output: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub team: Option<String>,
}

pub fn handle_report(report: ReportConfig) -> Result<()> {
    let mut config = load_config(report.config_path.as_deref());
    if let Some(team) = &report.team {
        config.tracker.team_filter = team.clone();
    }
    let statuses = config.workflow.status_map();

    // Failures at the retrieval edge are isolated per issue, same as
    // inside the pipeline.
    let mut fetch_skipped: Vec<SkippedIssue> = Vec::new();

    let issues = match &report.input {
        Some(path) => io::issues::load_issues(path, &statuses)?,
        None => {
            let credentials = TrackerCredentials::from_env()?;
            let client = JiraClient::new(credentials, config.tracker.clone())?;
            let mut converted = Vec::new();
            for raw in &client.fetch_issues()? {
                match to_issue_record(raw, &config.tracker, &statuses) {
                    Ok(Some(record)) => converted.push(record),
                    Ok(None) => {}
                    Err(err) => {
                        log::warn!("Skipping issue {}: {err}", raw.key);
                        fetch_skipped.push(SkippedIssue {
                            key: raw.key.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
            converted
        }
    };

    if issues.is_empty() {
        log::warn!("No issues found. Nothing to score.");
        return Ok(());
    }

    let flow_data = io::flow::load_flow_data(report.flow_data.as_deref())?;
    let result = run_pipeline(&issues, &flow_data, &config, Utc::now())?;

    let mut run_report = result.report;
    run_report.skipped_issues.extend(fetch_skipped);

    let output = RunOutput {
        generated_at: Utc::now(),
        team: config.tracker.team_filter.clone(),
        medians: result.medians,
        scores: result.scores,
        issues: result.issues,
        report: run_report,
    };

    let mut writer = create_writer(report.format, report.output.as_deref())?;
    writer.write_report(&output)?;

    if let Some(path) = &report.raw_output {
        let mut file = std::fs::File::create(path)?;
        write_issue_rows(&mut file, &output.issues)?;
        log::info!("Saved raw issue rows to {}", path.display());
    }

    Ok(())
}
