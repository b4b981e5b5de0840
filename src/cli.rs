use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "impactmap")]
#[command(about = "Per-sprint AI impact index from cycle times, defects, and flow surveys", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the per-sprint impact index report
    Report {
        /// Local JSON issue export to score instead of fetching from the tracker
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Flow survey data file (JSON map of sprint name to raw score)
        #[arg(long = "flow-data")]
        flow_data: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write per-issue audit rows to this CSV file
        #[arg(long = "raw-output")]
        raw_output: Option<PathBuf>,

        /// Configuration file (defaults to .impactmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured team filter
        #[arg(long)]
        team: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Csv => crate::io::output::OutputFormat::Csv,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_report_command() {
        let cli = Cli::parse_from([
            "impactmap",
            "report",
            "--input",
            "issues.json",
            "--format",
            "json",
            "--team",
            "Foundation",
        ]);

        match cli.command {
            Commands::Report {
                input,
                format,
                team,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("issues.json")));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(team.as_deref(), Some("Foundation"));
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn parse_init_command() {
        let cli = Cli::parse_from(["impactmap", "init", "--force"]);

        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn output_format_conversion() {
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Csv),
            crate::io::output::OutputFormat::Csv
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Terminal),
            crate::io::output::OutputFormat::Terminal
        );
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::parse_from(["impactmap", "report", "-vv"]);
        assert_eq!(cli.verbosity, 2);
    }
}
