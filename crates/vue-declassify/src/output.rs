//! Output formatting.

use crate::cli::OutputFormat;
use serde::Serialize;
use source_patch::{ByteOffset, LineIndex};

/// A position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

impl Position {
    pub fn at(index: &LineIndex, offset: ByteOffset) -> Self {
        let line_col = index.line_col(offset);
        Self {
            line: line_col.line + 1,
            column: line_col.col + 1,
            offset: offset.into(),
        }
    }
}

/// A warning or error message with an optional location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
}

impl Note {
    pub fn new(message: impl Into<String>, start: Option<Position>) -> Self {
        Self {
            message: message.into(),
            start,
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Converted {
        warnings: Vec<Note>,
        /// The rewritten file, kept only for dry runs.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: Note,
    },
}

/// The result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Formats file reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, reports: &[FileReport]) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(reports),
            OutputFormat::Json => self.format_json(reports),
        }
    }

    fn format_human(&self, reports: &[FileReport]) -> String {
        let mut output = String::new();

        for report in reports {
            let filename = &report.filename;
            match &report.outcome {
                Outcome::Converted { warnings, code } => {
                    match code {
                        Some(code) => {
                            output.push_str(&format!("=== {filename} ===\n{code}"));
                            if !code.ends_with('\n') {
                                output.push('\n');
                            }
                        }
                        None => output.push_str(&format!("Successfully declassified {filename}!\n")),
                    }
                    for warning in warnings {
                        output.push_str(&located(filename, warning, "Warning"));
                    }
                }
                Outcome::Skipped { reason } => {
                    output.push_str(&format!("Skipped {filename}: {reason}\n"));
                }
                Outcome::Failed { error } => {
                    output.push_str(&located(filename, error, "Error"));
                }
            }
        }

        output
    }

    fn format_json(&self, reports: &[FileReport]) -> String {
        let mut output = serde_json::to_string_pretty(reports).unwrap_or_default();
        output.push('\n');
        output
    }
}

fn located(filename: &str, note: &Note, severity: &str) -> String {
    match note.start {
        Some(start) => format!(
            "{}:{}:{}\n{}: {}\n",
            filename, start.line, start.column, severity, note.message
        ),
        None => format!("{}\n{}: {}\n", filename, severity, note.message),
    }
}

/// Summary of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.outcome {
                Outcome::Converted { warnings, .. } => {
                    summary.converted += 1;
                    summary.warnings += warnings.len();
                }
                Outcome::Skipped { .. } => summary.skipped += 1,
                Outcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        format!(
            "====================================\nvue-declassify converted {} with {}, skipped {} and failed {}",
            plural(self.converted, "file", "files"),
            plural(self.warnings, "warning", "warnings"),
            self.skipped,
            self.failed
        )
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
