//! Output format selection and the writer trait all report sinks
//! implement.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::RunOutput;

use super::writers::{CsvWriter, JsonWriter, MarkdownWriter, TerminalWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, output: &RunOutput) -> anyhow::Result<()>;
}

/// Build a writer for `format`, targeting `output` or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let destination: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Csv => Box::new(CsvWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new()),
    })
}
