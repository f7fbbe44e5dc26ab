//! Violations command implementation: flat CSV only.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use misra_report_core::{csv, ViolationParser};

/// Runs the violations command.
pub fn run(xml: &Path, output: Option<&Path>, ignored: Vec<String>) -> Result<()> {
    let parser = ViolationParser::with_ignored_ids(ignored.into_iter().collect::<HashSet<_>>());
    let records = parser
        .parse_file(xml)
        .context("Failed to parse violations")?;

    tracing::info!("Number of violations: {}", records.len());

    match output {
        Some(path) => {
            csv::write_violations_csv(&records, path).context("Failed to write CSV")?;
            println!("Wrote {} record(s) to {}", records.len(), path.display());
        }
        None => print!("{}", csv::render_violations_csv(&records)),
    }

    Ok(())
}
