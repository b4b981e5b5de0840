//! CLI command implementations.
//!
//! - **report**: fetch or load issues, run the metrics pipeline, write
//!   the scored dashboard and optional raw audit rows
//! - **init**: initialize a new configuration file

pub mod init;
pub mod report;

pub use init::init_config;
pub use report::{handle_report, ReportConfig};
