use std::io::Write;

use crate::core::RunOutput;
use crate::io::output::OutputWriter;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        self.write_header(output)?;
        self.write_dashboard(output)?;
        self.write_run_report(output)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        writeln!(self.writer, "# Team Impact Index")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            output.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Team: {}", output.team)?;
        writeln!(
            self.writer,
            "Baseline: median throughput {:.1}, median cycle time {:.1} days",
            output.medians.median_throughput, output.medians.median_cycle_time
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_dashboard(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        writeln!(self.writer, "## Executive Dashboard")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Iteration | Velocity | Quality | Flow | Overall |"
        )?;
        writeln!(self.writer, "|-----------|---------:|--------:|-----:|--------:|")?;
        for score in &output.scores {
            let flow_note = if score.flow_imputed { " *" } else { "" };
            writeln!(
                self.writer,
                "| {} | {:.1} | {:.1} | {:.1}{} | {:.1} |",
                score.sprint_name,
                score.velocity_score,
                score.quality_score,
                score.flow_score,
                flow_note,
                score.overall_score,
            )?;
        }
        writeln!(self.writer)?;
        if output.scores.iter().any(|s| s.flow_imputed) {
            writeln!(self.writer, "\\* flow score imputed from run average")?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_run_report(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        if output.report.is_clean() {
            return Ok(());
        }
        writeln!(self.writer, "## Run Report")?;
        writeln!(self.writer)?;
        for sprint in &output.report.flagged_sprints {
            writeln!(
                self.writer,
                "- sprint `{}` not scored: {}",
                sprint.sprint_name, sprint.reason
            )?;
        }
        for issue in &output.report.skipped_issues {
            writeln!(
                self.writer,
                "- issue `{}` skipped: {}",
                issue.key, issue.reason
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
