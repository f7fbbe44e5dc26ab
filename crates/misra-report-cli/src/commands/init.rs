//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# misra-report configuration

# cppcheck XML output to ingest
violations_file = "cppcheck.xml"

# Plain-text MISRA rule catalog (Rule <id> <Category> blocks)
catalog_file = "misra_rules.txt"

# Directory the artifacts are written into
output_dir = "."

# File names of the CSV artifacts
violations_csv = "errors.csv"
compliance_csv = "compliance_report.csv"

# Fully-qualified violation ids excluded before any counting
# ignored_ids = ["misra-c2012-17.2"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("misra-report.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created misra-report.toml");
    println!("\nNext steps:");
    println!("  1. Edit misra-report.toml to point at your cppcheck output and rule catalog");
    println!("  2. Run: misra-report report");

    Ok(())
}
