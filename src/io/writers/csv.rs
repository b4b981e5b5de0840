//! CSV export: one dashboard row per scored sprint, plus the raw
//! per-issue rows used for audit exports.

use std::io::Write;

use crate::core::{IssueMetricsRecord, RunOutput};
use crate::io::output::OutputWriter;

pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_report(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "Sprint Name,Sprint Start,Throughput Score,Efficiency Score,Velocity Score,\
             Bug Score,Rejection Score,Quality Score,Flow Score,Flow Imputed,Overall Score"
        )?;
        for score in &output.scores {
            writeln!(
                self.writer,
                "{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{},{:.1}",
                escape(&score.sprint_name),
                score
                    .sprint_start
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                score.throughput_score,
                score.efficiency_score,
                score.velocity_score,
                score.bug_score,
                score.rejection_score,
                score.quality_score,
                score.flow_score,
                score.flow_imputed,
                score.overall_score,
            )?;
        }
        Ok(())
    }
}

/// Raw per-issue audit rows, the second export tab of the original
/// spreadsheet.
pub fn write_issue_rows<W: Write>(writer: &mut W, issues: &[IssueMetricsRecord]) -> anyhow::Result<()> {
    writeln!(
        writer,
        "Issue Key,Issue Type,Story Points,Sprint Name,Status,Dev Days,Review Days,\
         Finished Days,Delivered Days,Total Active Days,Reached Delivered,Was Rejected,\
         Completed,Rejection Count"
    )?;
    for issue in issues {
        writeln!(
            writer,
            "{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{},{}",
            escape(&issue.key),
            issue.issue_type,
            issue.story_points.map(|p| p.to_string()).unwrap_or_default(),
            escape(&issue.sprint_name),
            escape(&issue.current_status),
            issue.segments.dev_days,
            issue.segments.review_days,
            issue.segments.finished_days,
            issue.segments.delivered_days,
            issue.total_active_days,
            issue.reached_delivered,
            issue.was_rejected,
            issue.is_completed,
            issue.rejection_count,
        )?;
    }
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
