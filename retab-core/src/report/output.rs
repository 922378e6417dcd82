//! Report output sinks
//!
//! The interpreter is decoupled from rendering through the [`ReportOutput`]
//! trait: it emits structural enter/exit events and literal text, and the
//! sink decides what they mean for the output format. CSV is the only
//! format today; the factory seam keeps the door open for others.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::ReportError;

/// Structural event sink for one report run.
///
/// The interpreter calls the enter/exit pairs in schema document order and
/// `finish` exactly once, after a fully successful walk. Field values arrive
/// already resolved; the sink only renders.
pub trait ReportOutput {
    fn enter_header(&mut self);
    fn exit_header(&mut self);
    fn enter_field(&mut self, value: &str);
    fn exit_field(&mut self);
    fn enter_repeater(&mut self);
    fn exit_repeater(&mut self);
    fn enter_total(&mut self);
    fn exit_total(&mut self);
    fn enter_newline(&mut self);
    fn exit_newline(&mut self);
    fn process_text(&mut self, text: &str);

    /// Persist the accumulated report and return the path written. With no
    /// path given, a timestamped file name in the working directory is used.
    fn finish(&mut self, path: Option<&Path>) -> Result<PathBuf, ReportError>;
}

/// CSV sink: an ordered list of accumulating output lines.
///
/// Field values are appended individually quoted; cell separators and any
/// other literal text come from the schema's text nodes. `NewLine` and
/// `Header` boundaries start fresh lines.
#[derive(Debug, Default)]
pub struct CsvOutput {
    lines: Vec<String>,
}

impl CsvOutput {
    pub fn new() -> Self {
        CsvOutput::default()
    }

    /// Accumulated lines in emission order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn ensure_line(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    fn append(&mut self, text: &str) {
        self.ensure_line();
        if let Some(line) = self.lines.last_mut() {
            line.push_str(text);
        }
    }
}

impl ReportOutput for CsvOutput {
    fn enter_header(&mut self) {
        self.ensure_line();
    }

    fn exit_header(&mut self) {
        self.lines.push(String::new());
    }

    fn enter_field(&mut self, value: &str) {
        self.append(&format!("\"{}\"", value));
    }

    fn exit_field(&mut self) {}

    fn enter_repeater(&mut self) {}

    fn exit_repeater(&mut self) {}

    fn enter_total(&mut self) {}

    fn exit_total(&mut self) {}

    fn enter_newline(&mut self) {}

    fn exit_newline(&mut self) {
        self.lines.push(String::new());
    }

    fn process_text(&mut self, text: &str) {
        self.append(text);
    }

    fn finish(&mut self, path: Option<&Path>) -> Result<PathBuf, ReportError> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(format!(
                "{}_report.csv",
                Local::now().format("%Y%m%d_%H%M%S")
            )),
        };
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        fs::write(&target, contents).map_err(|e| {
            ReportError::Io(format!(
                "failed to write report to '{}': {}",
                target.display(),
                e
            ))
        })?;
        log::info!("report written to '{}'", target.display());
        Ok(target)
    }
}

/// Create a sink for a named output format. Only `csv` is supported.
pub fn create_output(format: &str) -> Result<Box<dyn ReportOutput>, ReportError> {
    if format.eq_ignore_ascii_case("csv") {
        Ok(Box::new(CsvOutput::new()))
    } else {
        Err(ReportError::UnsupportedConfig {
            element: format.to_string(),
            message: "unsupported report output format".to_string(),
        })
    }
}
