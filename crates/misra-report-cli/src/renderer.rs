//! HTML document renderer with named-slot templates.
//!
//! The template is ordinary HTML with `{{slot}}` placeholders; rendering is a
//! straight substitution of the structured context plus a generated table
//! body, so the template can be restyled freely without touching code. An
//! external converter binary (wkhtmltopdf-style `converter in.html out.pdf`)
//! optionally turns the HTML into a PDF.

use std::path::{Path, PathBuf};
use std::process::Command;

use misra_report_core::{DocumentRenderer, GuidelineCount, RenderContext, RenderError};

/// Built-in report template.
const DEFAULT_TEMPLATE: &str = include_str!("templates/report.html");

/// Renders the compliance document as HTML, optionally converting to PDF.
#[derive(Debug)]
pub struct HtmlRenderer {
    /// Path the HTML artifact is written to.
    output: PathBuf,
    /// Custom template path; the built-in template when `None`.
    template: Option<PathBuf>,
    /// External HTML-to-PDF converter binary, when PDF output is wanted.
    pdf_converter: Option<PathBuf>,
}

impl HtmlRenderer {
    /// Creates a renderer writing HTML to `output`.
    #[must_use]
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            template: None,
            pdf_converter: None,
        }
    }

    /// Uses a custom template file instead of the built-in one.
    #[must_use]
    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        self.template = template;
        self
    }

    /// Also converts the HTML to PDF with the given binary.
    #[must_use]
    pub fn with_pdf_converter(mut self, converter: Option<PathBuf>) -> Self {
        self.pdf_converter = converter;
        self
    }

    fn template_text(&self) -> Result<String, RenderError> {
        match &self.template {
            Some(path) => std::fs::read_to_string(path).map_err(|e| RenderError::Io {
                path: path.clone(),
                source: e,
            }),
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }

    fn convert_to_pdf(&self, binary: &Path) -> Result<PathBuf, RenderError> {
        let pdf = self.output.with_extension("pdf");
        let output = Command::new(binary)
            .arg(&self.output)
            .arg(&pdf)
            .output()
            .map_err(|e| RenderError::Converter {
                binary: binary.to_path_buf(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderError::Converter {
                binary: binary.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::info!("Converted document to {}", pdf.display());
        Ok(pdf)
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(
        &self,
        context: &RenderContext,
        counts: &[GuidelineCount],
    ) -> Result<PathBuf, RenderError> {
        let html = substitute(&self.template_text()?, context, counts);
        std::fs::write(&self.output, html).map_err(|e| RenderError::Io {
            path: self.output.clone(),
            source: e,
        })?;
        tracing::info!("Wrote document {}", self.output.display());

        match &self.pdf_converter {
            Some(binary) => self.convert_to_pdf(binary),
            None => Ok(self.output.clone()),
        }
    }
}

/// Fills every named slot of the template.
fn substitute(template: &str, context: &RenderContext, counts: &[GuidelineCount]) -> String {
    template
        .replace("{{compliance}}", &escape_html(&context.compliance))
        .replace("{{mandatory_summary}}", &escape_html(&context.mandatory_summary))
        .replace("{{required_summary}}", &escape_html(&context.required_summary))
        .replace("{{advisory_summary}}", &escape_html(&context.advisory_summary))
        .replace("{{note}}", &escape_html(&context.note))
        .replace("{{date}}", &escape_html(&context.date))
        .replace("{{commit_id}}", &escape_html(&context.version.commit_id))
        .replace("{{commit_date}}", &escape_html(&context.version.commit_date))
        .replace("{{commit_url}}", &escape_html(&context.version.commit_url))
        .replace("{{guideline_rows}}", &guideline_rows(counts))
}

/// One `<tr>` per catalog rule, in the order the counts arrive.
fn guideline_rows(counts: &[GuidelineCount]) -> String {
    let mut rows = String::new();
    for count in counts {
        rows.push_str("      <tr>\n");
        rows.push_str(&format!(
            "        <td>{}</td>\n",
            escape_html(&count.guideline)
        ));
        rows.push_str(&format!(
            "        <td>{}</td>\n",
            escape_html(&count.category.to_string())
        ));
        rows.push_str(&format!("        <td>{}</td>\n", count.violations));
        rows.push_str("      </tr>\n");
    }
    rows
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use misra_report_core::{RuleCategory, VersionInfo};
    use tempfile::TempDir;

    fn context() -> RenderContext {
        RenderContext {
            compliance: "Noncompliant".to_string(),
            mandatory_summary: "0 mandatory guideline".to_string(),
            required_summary: "1 required guideline".to_string(),
            advisory_summary: "2 advisory guidelines".to_string(),
            note: "N/A".to_string(),
            date: "Aug 28, 2026".to_string(),
            version: VersionInfo {
                commit_id: "abc123".to_string(),
                commit_date: "Aug 27, 2026".to_string(),
                commit_url: "https://example.com/commit/abc123".to_string(),
            },
        }
    }

    fn counts() -> Vec<GuidelineCount> {
        vec![
            GuidelineCount {
                guideline: "Rule 1.1".to_string(),
                category: RuleCategory::Required,
                violations: 2,
            },
            GuidelineCount {
                guideline: "Rule 8.2".to_string(),
                category: RuleCategory::Mandatory,
                violations: 0,
            },
        ]
    }

    #[test]
    fn every_slot_is_substituted() {
        let html = substitute(DEFAULT_TEMPLATE, &context(), &counts());
        assert!(!html.contains("{{"), "unfilled slot in: {html}");
        assert!(html.contains("Noncompliant"));
        assert!(html.contains("1 required guideline"));
        assert!(html.contains("abc123"));
    }

    #[test]
    fn table_rows_follow_count_order() {
        let html = substitute(DEFAULT_TEMPLATE, &context(), &counts());
        let first = html.find("Rule 1.1").unwrap();
        let second = html.find("Rule 8.2").unwrap();
        assert!(first < second);
        assert!(html.contains("<td>2</td>"));
        assert!(html.contains("<td>0</td>"));
    }

    #[test]
    fn values_are_html_escaped() {
        let mut ctx = context();
        ctx.note = "a < b & \"c\"".to_string();
        let html = substitute("{{note}}", &ctx, &[]);
        assert_eq!(html, "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn render_writes_html_artifact() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.html");
        let renderer = HtmlRenderer::new(out.clone());

        let produced = renderer.render(&context(), &counts()).unwrap();
        assert_eq!(produced, out);
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("Rule 8.2"));
    }

    #[test]
    fn missing_converter_binary_is_fatal() {
        let dir = TempDir::new().unwrap();
        let renderer = HtmlRenderer::new(dir.path().join("report.html"))
            .with_pdf_converter(Some(PathBuf::from("/nonexistent/wkhtmltopdf")));

        let err = renderer.render(&context(), &counts()).unwrap_err();
        assert!(matches!(err, RenderError::Converter { .. }));
        // The HTML artifact produced before conversion stays on disk.
        assert!(dir.path().join("report.html").exists());
    }

    #[test]
    fn missing_custom_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let renderer = HtmlRenderer::new(dir.path().join("report.html"))
            .with_template(Some(PathBuf::from("/nonexistent/template.html")));

        let err = renderer.render(&context(), &counts()).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
