use colored::*;

use crate::core::RunOutput;
use crate::io::output::OutputWriter;

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        println!();
        println!("{}", "═══════════════════════════════════════════".cyan());
        println!("{}", "          TEAM IMPACT INDEX".bold().cyan());
        println!("{}", "═══════════════════════════════════════════".cyan());
        println!();
        println!(
            "Team: {}    Baseline: {:.1} items / {:.1} days",
            output.team.bold(),
            output.medians.median_throughput,
            output.medians.median_cycle_time
        );
        println!();

        println!(
            "{:<28} {:>9} {:>9} {:>7} {:>9}",
            "Iteration".bold(),
            "Velocity".bold(),
            "Quality".bold(),
            "Flow".bold(),
            "Overall".bold()
        );
        println!("───────────────────────────────────────────────────────────────");
        for score in &output.scores {
            let flow = if score.flow_imputed {
                format!("{:>6}*", format!("{:.1}", score.flow_score))
            } else {
                format!("{:>7}", format!("{:.1}", score.flow_score))
            };
            println!(
                "{:<28} {:>9} {:>9} {} {:>9}",
                score.sprint_name,
                band(score.velocity_score),
                band(score.quality_score),
                flow,
                band(score.overall_score),
            );
        }
        if output.scores.iter().any(|s| s.flow_imputed) {
            println!();
            println!("{}", "* flow score imputed from run average".dimmed());
        }

        if !output.report.flagged_sprints.is_empty() {
            println!();
            for sprint in &output.report.flagged_sprints {
                println!(
                    "{} sprint {} not scored: {}",
                    "!".yellow().bold(),
                    sprint.sprint_name.bold(),
                    sprint.reason
                );
            }
        }
        if !output.report.skipped_issues.is_empty() {
            println!();
            for issue in &output.report.skipped_issues {
                println!(
                    "{} issue {} skipped: {}",
                    "!".red().bold(),
                    issue.key.bold(),
                    issue.reason
                );
            }
        }
        println!();
        Ok(())
    }
}

fn band(score: f64) -> ColoredString {
    let text = format!("{score:.1}");
    if score >= 70.0 {
        text.green()
    } else if score >= 50.0 {
        text.yellow()
    } else {
        text.red()
    }
}
