//! Integration test: full pipeline from XML + catalog to CSV artifacts.
//!
//! Exercises multi-location errors, unknown rule ids, ignore-list filtering,
//! and the compliance determination, all through `Pipeline::run`.

use std::path::PathBuf;

use misra_report_core::{
    ComplianceStatus, DocumentRenderer, GuidelineCount, Pipeline, RenderContext, RenderError,
    ReportConfig,
};
use tempfile::TempDir;

const CATALOG: &str = "\
Rule 1.1 Required
The program shall contain no violations of the standard C syntax
and constraints.
Rule 8.2 Mandatory
Function types shall be in prototype form with named parameters.
";

const VIOLATIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<results version="2">
  <cppcheck version="2.12"/>
  <errors>
    <error id="misra-c2012-1.1" severity="style" msg="syntax violation">
      <location file="src/main.c" line="10" column="5"/>
      <location file="src/util.c" line="3" column="1"/>
    </error>
    <error id="misra-c2012-9.9" severity="style" msg="outside the catalog">
      <location file="src/main.c" line="20" column="2"/>
    </error>
  </errors>
</results>
"#;

fn write_inputs(dir: &TempDir, violations: &str) -> ReportConfig {
    let violations_file = dir.path().join("out1.xml");
    let catalog_file = dir.path().join("misra_rules.txt");
    std::fs::write(&violations_file, violations).unwrap();
    std::fs::write(&catalog_file, CATALOG).unwrap();

    ReportConfig {
        violations_file,
        catalog_file,
        output_dir: dir.path().to_path_buf(),
        ..ReportConfig::default()
    }
}

#[test]
fn worked_example_counts_and_status() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(&dir, VIOLATIONS);
    let summary = Pipeline::new(config).run(None, None).unwrap();

    // 2 locations for 1.1 plus 1 for the unknown 9.9 = 3 flat records.
    assert_eq!(summary.records, 3);
    assert_eq!(summary.rules, 2);
    assert_eq!(summary.status, ComplianceStatus::Noncompliant);
    // (mandatory, required, advisory) distinct violated rules.
    assert_eq!(summary.violated_by_category, (0, 1, 0));

    let flat = std::fs::read_to_string(&summary.violations_csv).unwrap();
    assert_eq!(flat.lines().count(), 4); // header + 3 records

    let counts = std::fs::read_to_string(&summary.compliance_csv).unwrap();
    let lines: Vec<&str> = counts.lines().collect();
    assert_eq!(
        lines,
        [
            "Guideline,Category,Violations",
            "Rule 1.1,Required,2",
            "Rule 8.2,Mandatory,0",
        ]
    );
}

#[test]
fn ignored_id_produces_no_rows_and_no_counts() {
    let violations = r#"
<results>
  <errors>
    <error id="misra-c2012-17.2" severity="style" msg="recursion">
      <location file="src/main.c" line="5" column="1"/>
    </error>
  </errors>
</results>"#;

    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(&dir, violations);
    config.ignored_ids.insert("misra-c2012-17.2".to_string());

    let summary = Pipeline::new(config).run(None, None).unwrap();
    assert_eq!(summary.records, 0);
    assert_eq!(summary.status, ComplianceStatus::Compliant);

    let flat = std::fs::read_to_string(&summary.violations_csv).unwrap();
    assert_eq!(flat.lines().count(), 1); // header only
}

#[test]
fn reruns_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(&dir, VIOLATIONS);
    let pipeline = Pipeline::new(config);

    let first = pipeline.run(None, None).unwrap();
    let flat_1 = std::fs::read_to_string(&first.violations_csv).unwrap();
    let counts_1 = std::fs::read_to_string(&first.compliance_csv).unwrap();

    let second = pipeline.run(None, None).unwrap();
    let flat_2 = std::fs::read_to_string(&second.violations_csv).unwrap();
    let counts_2 = std::fs::read_to_string(&second.compliance_csv).unwrap();

    assert_eq!(flat_1, flat_2);
    assert_eq!(counts_1, counts_2);
}

#[test]
fn missing_violations_file_is_fatal_with_path_context() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(&dir, VIOLATIONS);
    config.violations_file = dir.path().join("does-not-exist.xml");

    let err = Pipeline::new(config).run(None, None).unwrap_err();
    assert!(err.to_string().contains("does-not-exist.xml"));
}

#[test]
fn malformed_catalog_is_fatal_with_path_context() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(&dir, VIOLATIONS);
    std::fs::write(&config.catalog_file, "Rule 1.1\nheader has no category\n").unwrap();

    let err = Pipeline::new(config).run(None, None).unwrap_err();
    assert!(err.to_string().contains("misra_rules.txt"));
}

struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(
        &self,
        _context: &RenderContext,
        _counts: &[GuidelineCount],
    ) -> Result<PathBuf, RenderError> {
        Err(RenderError::Converter {
            binary: PathBuf::from("/usr/bin/wkhtmltopdf"),
            message: "No such file or directory".to_string(),
        })
    }
}

#[test]
fn renderer_failure_is_fatal_but_csvs_remain() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(&dir, VIOLATIONS);
    let violations_csv = config.violations_csv_path();
    let compliance_csv = config.compliance_csv_path();

    let err = Pipeline::new(config)
        .run(Some(&FailingRenderer), None)
        .unwrap_err();
    assert!(err.to_string().contains("wkhtmltopdf"));

    // Artifacts produced before the renderer ran are not rolled back.
    assert!(violations_csv.exists());
    assert!(compliance_csv.exists());
}

struct CapturingRenderer {
    out: PathBuf,
}

impl DocumentRenderer for CapturingRenderer {
    fn render(
        &self,
        context: &RenderContext,
        counts: &[GuidelineCount],
    ) -> Result<PathBuf, RenderError> {
        let body = format!(
            "{}|{}|{}|{}|{}",
            context.compliance,
            context.mandatory_summary,
            context.required_summary,
            context.advisory_summary,
            counts.len()
        );
        std::fs::write(&self.out, body).map_err(|e| RenderError::Io {
            path: self.out.clone(),
            source: e,
        })?;
        Ok(self.out.clone())
    }
}

#[test]
fn renderer_receives_context_and_full_count_table() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(&dir, VIOLATIONS);
    let renderer = CapturingRenderer {
        out: dir.path().join("report.html"),
    };

    let summary = Pipeline::new(config).run(Some(&renderer), None).unwrap();
    assert_eq!(summary.document.as_deref(), Some(renderer.out.as_path()));

    let body = std::fs::read_to_string(&renderer.out).unwrap();
    assert_eq!(
        body,
        "Noncompliant|0 mandatory guideline|1 required guideline|0 advisory guideline|2"
    );
}
