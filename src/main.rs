use anyhow::Result;
use clap::Parser;

use impactmap::cli::{Cli, Commands};
use impactmap::commands::{self, ReportConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Report {
            input,
            flow_data,
            format,
            output,
            raw_output,
            config,
            team,
        } => commands::handle_report(ReportConfig {
            input,
            flow_data,
            format: format.into(),
            output,
            raw_output,
            config_path: config,
            team,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}
