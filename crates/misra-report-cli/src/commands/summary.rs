//! Summary command implementation: aggregate and print.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use misra_report_core::{
    ComplianceStatus, ComplianceTally, GuidelineCount, RuleCatalog, RuleCategory, ViolationParser,
};

use crate::OutputFormat;

/// Runs the summary command.
pub fn run(xml: &Path, catalog: &Path, format: OutputFormat, ignored: Vec<String>) -> Result<()> {
    let catalog = RuleCatalog::from_file(catalog).context("Failed to load rule catalog")?;
    let parser = ViolationParser::with_ignored_ids(ignored.into_iter().collect::<HashSet<_>>());
    let records = parser
        .parse_file(xml)
        .context("Failed to parse violations")?;

    let tally = ComplianceTally::tally(&catalog, &records);

    match format {
        OutputFormat::Text => print_text(&tally, records.len()),
        OutputFormat::Json => print_json(&tally, records.len())?,
    }

    Ok(())
}

fn print_text(tally: &ComplianceTally, records: usize) {
    for row in tally.rows() {
        if row.violations > 0 {
            println!(
                "{}  [{}]  {} violation(s)",
                row.guideline, row.category, row.violations
            );
        }
    }

    println!(
        "\n{} record(s) against {} tracked rule(s)",
        records,
        tally.rule_count()
    );
    for category in RuleCategory::ALL {
        println!(
            "  {}: {} distinct rule(s) violated",
            category,
            tally.distinct_violations(category)
        );
    }

    let status = tally.status();
    let color = match status {
        ComplianceStatus::Compliant => "\x1b[32m",
        ComplianceStatus::Noncompliant => "\x1b[31m",
    };
    println!("{color}{status}\x1b[0m");
}

#[derive(Serialize)]
struct JsonSummary {
    status: ComplianceStatus,
    records: usize,
    mandatory_violated: usize,
    required_violated: usize,
    advisory_violated: usize,
    guidelines: Vec<GuidelineCount>,
}

fn print_json(tally: &ComplianceTally, records: usize) -> Result<()> {
    let summary = JsonSummary {
        status: tally.status(),
        records,
        mandatory_violated: tally.distinct_violations(RuleCategory::Mandatory),
        required_violated: tally.distinct_violations(RuleCategory::Required),
        advisory_violated: tally.distinct_violations(RuleCategory::Advisory),
        guidelines: tally.rows(),
    };
    let json = serde_json::to_string_pretty(&summary)?;
    println!("{json}");
    Ok(())
}
