//! Render context for the compliance document and the boundary traits for
//! the external collaborators (document renderer, version-info provider).
//!
//! The core builds a fully structured [`RenderContext`]; how it turns into an
//! HTML or PDF artifact is the renderer's business, behind [`DocumentRenderer`].

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::RuleCategory;
use crate::compliance::{ComplianceStatus, ComplianceTally, GuidelineCount};

/// Version-control metadata for the audited revision.
///
/// All fields are empty strings when no version-control context is available;
/// the report simply omits them in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Commit identifier (full hash).
    pub commit_id: String,
    /// Commit date, preformatted for display.
    pub commit_date: String,
    /// Browsable URL of the commit.
    pub commit_url: String,
}

impl VersionInfo {
    /// Returns `true` when no metadata could be gathered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commit_id.is_empty() && self.commit_date.is_empty() && self.commit_url.is_empty()
    }
}

/// Structured context handed to the document renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Overall compliance string: `Compliant` or `Noncompliant`.
    pub compliance: String,
    /// E.g. `2 mandatory guidelines` (distinct violated rules, pluralized).
    pub mandatory_summary: String,
    /// E.g. `1 required guideline`.
    pub required_summary: String,
    /// E.g. `0 advisory guideline`.
    pub advisory_summary: String,
    /// `No critical violation detected` when compliant, `N/A` otherwise.
    pub note: String,
    /// Report date, formatted like `Aug 28, 2026`.
    pub date: String,
    /// Version-control metadata; empty fields when unavailable.
    pub version: VersionInfo,
}

/// Builds the render context from a finished tally.
#[must_use]
pub fn build_context(tally: &ComplianceTally, version: VersionInfo) -> RenderContext {
    let status = tally.status();
    let note = match status {
        ComplianceStatus::Compliant => "No critical violation detected",
        ComplianceStatus::Noncompliant => "N/A",
    };

    RenderContext {
        compliance: status.to_string(),
        mandatory_summary: guideline_summary(tally, RuleCategory::Mandatory),
        required_summary: guideline_summary(tally, RuleCategory::Required),
        advisory_summary: guideline_summary(tally, RuleCategory::Advisory),
        note: note.to_string(),
        date: Local::now().format("%b %d, %Y").to_string(),
        version,
    }
}

/// `N <category> guideline`, with a plural `s` only for N > 1.
fn guideline_summary(tally: &ComplianceTally, category: RuleCategory) -> String {
    let n = tally.distinct_violations(category);
    let plural = if n > 1 { "s" } else { "" };
    format!("{n} {} guideline{plural}", category.summary_name())
}

/// Produces the finished compliance document from a context and count table.
pub trait DocumentRenderer {
    /// Renders the document and returns the path of the produced artifact.
    ///
    /// # Errors
    ///
    /// Rendering failures (template IO, missing converter binary) are fatal
    /// for the reporting stage and propagate to the caller.
    fn render(
        &self,
        context: &RenderContext,
        counts: &[GuidelineCount],
    ) -> Result<PathBuf, RenderError>;
}

/// Supplies version-control metadata for the audited revision.
///
/// Implementations degrade to an empty [`VersionInfo`] instead of failing;
/// a report without commit metadata is still a valid report.
pub trait VersionInfoProvider {
    /// Returns the metadata, empty fields when unavailable.
    fn version_info(&self) -> VersionInfo;
}

/// Errors from the document renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// IO error reading the template or writing the artifact.
    #[error("Failed to write document {path}: {source}")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The external converter binary could not be run.
    #[error("Document converter `{binary}` failed: {message}")]
    Converter {
        /// Converter binary path.
        binary: PathBuf,
        /// Failure detail.
        message: String,
    },
}
