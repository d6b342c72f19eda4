use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

/// Narrative of what happened in one working directory.
///
/// Every line lands in [`Report::lines`] and is dumped to the debug log at the
/// end. Only buffered lines and lines written with `*_now` reach the user
/// stream, and each of them reaches it exactly once.
#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<String>,
    pending: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a line back until the next flush.
    pub fn buffer(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.pending.push(line.clone());
        self.lines.push(line);
    }

    /// Keep a line for the debug log only.
    pub fn record(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Flush held lines, then write this one straight away.
    pub fn write_now(&mut self, out: &mut dyn Write, line: impl Into<String>) -> io::Result<()> {
        self.flush(out)?;
        let line = line.into();
        writeln!(out, "{line}")?;
        self.lines.push(line);
        Ok(())
    }

    /// Like [`Report::write_now`], highlighted as a warning.
    pub fn warn_now(&mut self, out: &mut dyn Write, line: impl Into<String>) -> io::Result<()> {
        self.flush(out)?;
        let line = line.into();
        writeln!(out, "{}", line.as_str().yellow())?;
        self.lines.push(line);
        Ok(())
    }

    pub fn flush(&mut self, out: &mut dyn Write) -> io::Result<()> {
        for line in self.pending.drain(..) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump_to_log(&self, dir: &Path) {
        for line in &self.lines {
            tracing::debug!(target: "lintplug::report", dir = %dir.display(), "{line}");
        }
    }
}
