//! # misra-report-core
//!
//! Core library for MISRA C:2012 compliance reporting from cppcheck output.
//!
//! The pipeline ingests the analyzer's XML, flattens it into one record per
//! reported location, tallies violations against a plain-text rule catalog,
//! and emits CSV artifacts plus a structured context for the document
//! renderer. It includes:
//!
//! - [`RuleCatalog`] for the Mandatory/Required/Advisory guideline catalog
//! - [`ViolationParser`] for flattening cppcheck XML into [`ViolationRecord`]s
//! - [`ComplianceTally`] for per-rule counts and the pass/fail determination
//! - [`Pipeline`] for orchestrating one reporting run
//!
//! ## Example
//!
//! ```ignore
//! use misra_report_core::{Pipeline, ReportConfig};
//!
//! let config = ReportConfig::from_file("misra-report.toml".as_ref())?;
//! let summary = Pipeline::new(config).run(None, None)?;
//! println!("{}", summary.status);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod compliance;
mod config;
mod pipeline;
mod report;
mod violations;

/// CSV rendering for the tabular artifacts.
pub mod csv;

pub use catalog::{CatalogError, CatalogParseError, RuleCatalog, RuleCategory, RuleEntry};
pub use compliance::{
    ComplianceStatus, ComplianceTally, GuidelineCount, MISRA_PREFIX,
};
pub use config::{ConfigError, ReportConfig};
pub use pipeline::{Pipeline, PipelineError, RunSummary};
pub use report::{
    build_context, DocumentRenderer, RenderContext, RenderError, VersionInfo, VersionInfoProvider,
};
pub use violations::{
    ViolationParser, ViolationRecord, ViolationsError, XmlParseError, VIOLATION_FIELDS,
};
