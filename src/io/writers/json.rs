use std::io::Write;

use crate::core::RunOutput;
use crate::io::output::OutputWriter;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, output: &RunOutput) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(output)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
