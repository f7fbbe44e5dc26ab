//! Report command implementation: the full pipeline.

use anyhow::{Context, Result};
use std::path::PathBuf;

use misra_report_core::{ComplianceStatus, Pipeline, ReportConfig};

use crate::config_resolver::{self, ConfigSource};
use crate::renderer::HtmlRenderer;
use crate::vcs::GitVersionInfo;

/// Options for one report run.
#[derive(Debug)]
pub struct Options {
    /// Explicit config file path from `--config`.
    pub config: Option<PathBuf>,
    /// Document file name within the output directory.
    pub document: String,
    /// Custom HTML template.
    pub template: Option<PathBuf>,
    /// External HTML-to-PDF converter binary.
    pub pdf_converter: Option<PathBuf>,
    /// Repository to read commit metadata from.
    pub repo: PathBuf,
    /// Skip the document stage.
    pub no_document: bool,
    /// Exit nonzero on a Noncompliant result.
    pub strict: bool,
}

/// Runs the report command.
pub fn run(options: &Options) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let source = config_resolver::resolve(&cwd, options.config.as_deref());
    let config = match &source {
        ConfigSource::Default => {
            tracing::info!("No config file found, using defaults");
            ReportConfig::default()
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            ReportConfig::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let pipeline = Pipeline::new(config.clone());

    let summary = if options.no_document {
        pipeline.run(None, None).context("Reporting run failed")?
    } else {
        let renderer = HtmlRenderer::new(config.output_dir.join(&options.document))
            .with_template(options.template.clone())
            .with_pdf_converter(options.pdf_converter.clone());
        let version = GitVersionInfo::new(options.repo.clone());
        pipeline
            .run(Some(&renderer), Some(&version))
            .context("Reporting run failed")?
    };

    let (mandatory, required, advisory) = summary.violated_by_category;
    println!(
        "{} violation record(s) across {} rule(s)",
        summary.records, summary.rules
    );
    println!(
        "Violated: {mandatory} mandatory, {required} required, {advisory} advisory"
    );
    println!("Wrote {}", summary.violations_csv.display());
    println!("Wrote {}", summary.compliance_csv.display());
    if let Some(document) = &summary.document {
        println!("Wrote {}", document.display());
    }
    println!("Status: {}", summary.status);

    if options.strict && summary.status == ComplianceStatus::Noncompliant {
        std::process::exit(1);
    }

    Ok(())
}
