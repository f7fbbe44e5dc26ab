//! Sequential reporting pipeline.
//!
//! One run is a straight line: load catalog, parse violations, write the flat
//! CSV, tally, write the compliance CSV, then optionally hand the render
//! context to the document renderer. Artifacts written before a later stage
//! fails stay on disk; there is no rollback and no retry.

use std::path::PathBuf;

use crate::catalog::{CatalogError, RuleCatalog, RuleCategory};
use crate::compliance::{ComplianceStatus, ComplianceTally};
use crate::config::ReportConfig;
use crate::csv::{self, CsvError};
use crate::report::{build_context, DocumentRenderer, RenderError, VersionInfo, VersionInfoProvider};
use crate::violations::{ViolationParser, ViolationsError};

/// Orchestrates one reporting run.
#[derive(Debug)]
pub struct Pipeline {
    config: ReportConfig,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of flattened violation records.
    pub records: usize,
    /// Number of catalog rules tallied.
    pub rules: usize,
    /// Overall compliance determination.
    pub status: ComplianceStatus,
    /// Distinct violated rules per category: (mandatory, required, advisory).
    pub violated_by_category: (usize, usize, usize),
    /// Path of the flat per-violation CSV.
    pub violations_csv: PathBuf,
    /// Path of the compliance-count CSV.
    pub compliance_csv: PathBuf,
    /// Path of the rendered document, when a renderer was supplied.
    pub document: Option<PathBuf>,
}

impl Pipeline {
    /// Creates a pipeline for the given configuration.
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Runs the full pipeline.
    ///
    /// `renderer` and `version` are the external collaborators; pass `None`
    /// to stop after the CSV artifacts. A missing version provider (or one
    /// that finds no repository) leaves the version fields empty.
    ///
    /// # Errors
    ///
    /// Fails on malformed inputs, on IO failures, and on renderer failures.
    /// CSVs already written remain valid when the renderer fails.
    pub fn run(
        &self,
        renderer: Option<&dyn DocumentRenderer>,
        version: Option<&dyn VersionInfoProvider>,
    ) -> Result<RunSummary, PipelineError> {
        let catalog = RuleCatalog::from_file(&self.config.catalog_file)?;
        tracing::info!(
            "Loaded {} rules from {}",
            catalog.len(),
            self.config.catalog_file.display()
        );

        let parser = ViolationParser::with_ignored_ids(self.config.ignored_ids.clone());
        let records = parser.parse_file(&self.config.violations_file)?;
        tracing::info!(
            "Parsed {} violation records from {}",
            records.len(),
            self.config.violations_file.display()
        );

        std::fs::create_dir_all(&self.config.output_dir).map_err(|e| PipelineError::Io {
            path: self.config.output_dir.clone(),
            source: e,
        })?;

        let violations_csv = self.config.violations_csv_path();
        csv::write_violations_csv(&records, &violations_csv)?;

        let tally = ComplianceTally::tally(&catalog, &records);
        let compliance_csv = self.config.compliance_csv_path();
        csv::write_compliance_csv(&tally.rows(), &compliance_csv)?;

        let status = tally.status();
        tracing::info!("Compliance status: {status}");

        let document = match renderer {
            Some(renderer) => {
                let info = version.map_or_else(VersionInfo::default, |v| v.version_info());
                let context = build_context(&tally, info);
                Some(renderer.render(&context, &tally.rows())?)
            }
            None => None,
        };

        Ok(RunSummary {
            records: records.len(),
            rules: tally.rule_count(),
            status,
            violated_by_category: (
                tally.distinct_violations(RuleCategory::Mandatory),
                tally.distinct_violations(RuleCategory::Required),
                tally.distinct_violations(RuleCategory::Advisory),
            ),
            violations_csv,
            compliance_csv,
            document,
        })
    }
}

/// Errors aborting a reporting run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    Io {
        /// Directory that failed to create.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Rule catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Violations file could not be parsed.
    #[error(transparent)]
    Violations(#[from] ViolationsError),

    /// A CSV artifact could not be written.
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// The document renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
