//! CSV rendering for the two tabular artifacts.
//!
//! Quoting follows RFC 4180: a field is quoted only when it contains a comma,
//! a double quote, or a line break, and embedded quotes are doubled. Output is
//! deterministic so identical inputs produce byte-identical files.

use std::path::{Path, PathBuf};

use crate::compliance::GuidelineCount;
use crate::violations::{ViolationRecord, VIOLATION_FIELDS};

/// Header of the compliance-count CSV.
const COMPLIANCE_FIELDS: [&str; 3] = ["Guideline", "Category", "Violations"];

/// Renders the flat per-violation CSV.
///
/// The header row is always present, even for zero records.
#[must_use]
pub fn render_violations_csv(records: &[ViolationRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, &VIOLATION_FIELDS);
    for record in records {
        push_row(&mut out, &record.fields());
    }
    out
}

/// Renders the per-rule compliance-count CSV, one row per catalog rule.
#[must_use]
pub fn render_compliance_csv(rows: &[GuidelineCount]) -> String {
    let mut out = String::new();
    push_row(&mut out, &COMPLIANCE_FIELDS);
    for row in rows {
        let category = row.category.to_string();
        let violations = row.violations.to_string();
        push_row(&mut out, &[&row.guideline, &category, &violations]);
    }
    out
}

/// Writes the flat per-violation CSV to a file.
///
/// # Errors
///
/// Returns an error carrying the destination path if the write fails.
pub fn write_violations_csv(records: &[ViolationRecord], path: &Path) -> Result<(), CsvError> {
    write(path, &render_violations_csv(records))
}

/// Writes the per-rule compliance-count CSV to a file.
///
/// # Errors
///
/// Returns an error carrying the destination path if the write fails.
pub fn write_compliance_csv(rows: &[GuidelineCount], path: &Path) -> Result<(), CsvError> {
    write(path, &render_compliance_csv(rows))
}

fn write(path: &Path, content: &str) -> Result<(), CsvError> {
    std::fs::write(path, content).map_err(|e| CsvError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Errors writing a CSV artifact.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// IO error writing the file.
    #[error("Failed to write CSV {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}
