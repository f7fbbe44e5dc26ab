//! MISRA rule catalog loading.
//!
//! The catalog is a plain-text file of repeated blocks, each introduced by the
//! literal marker `Rule `. The first line of a block holds the rule id and its
//! compliance category; the remaining lines are free-form guideline text:
//!
//! ```text
//! Rule 1.1 Required
//! The program shall contain no violations of the standard C syntax
//! and constraints.
//! Rule 1.2 Advisory
//! Language extensions should not be used.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Marker introducing one rule block in the catalog text.
const RULE_MARKER: &str = "Rule ";

/// Compliance category of a MISRA guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    /// Must never be violated; no deviation possible.
    Mandatory,
    /// Must be complied with, subject to formal deviation.
    Required,
    /// Should be complied with; violations do not affect compliance.
    Advisory,
}

impl RuleCategory {
    /// All categories, in the order compliance summaries report them.
    pub const ALL: [Self; 3] = [Self::Mandatory, Self::Required, Self::Advisory];

    /// Lowercase name used in pluralized summary strings.
    #[must_use]
    pub fn summary_name(self) -> &'static str {
        match self {
            Self::Mandatory => "mandatory",
            Self::Required => "required",
            Self::Advisory => "advisory",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mandatory => write!(f, "Mandatory"),
            Self::Required => write!(f, "Required"),
            Self::Advisory => write!(f, "Advisory"),
        }
    }
}

impl FromStr for RuleCategory {
    type Err = CatalogParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mandatory" => Ok(Self::Mandatory),
            "Required" => Ok(Self::Required),
            "Advisory" => Ok(Self::Advisory),
            other => Err(CatalogParseError::UnknownCategory {
                value: other.to_string(),
            }),
        }
    }
}

/// One guideline from the rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Rule identifier, e.g. `"1.1"` or `"21.3"`.
    pub id: String,
    /// Compliance category.
    pub category: RuleCategory,
    /// Guideline text, whitespace-collapsed to a single line.
    pub text: String,
}

/// Immutable rule catalog keyed by rule id, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    entries: Vec<RuleEntry>,
    index: HashMap<String, usize>,
}

impl RuleCatalog {
    /// Loads a catalog from a plain-text file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a rule block is
    /// structurally invalid.
    pub fn from_file(path: &std::path::Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses catalog text into an ordered catalog.
    ///
    /// Content before the first `Rule ` marker is ignored. A duplicate rule id
    /// overwrites the earlier entry while keeping its original position
    /// (last write wins, as in a plain map insert).
    ///
    /// # Errors
    ///
    /// Returns an error if a block's first line is missing the category token
    /// or carries an unknown category.
    pub fn parse(content: &str) -> Result<Self, CatalogParseError> {
        let mut catalog = Self::default();

        let mut blocks = content.split(RULE_MARKER);
        // Preamble before the first marker (e.g. an appendix heading).
        blocks.next();

        for block in blocks {
            let mut lines = block.lines();
            let header = lines.next().unwrap_or_default();
            let mut tokens = header.split_whitespace();
            let (Some(id), Some(category)) = (tokens.next(), tokens.next()) else {
                return Err(CatalogParseError::MissingCategory {
                    header: header.trim().to_string(),
                });
            };
            let category = category.parse::<RuleCategory>()?;
            let text = lines
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            catalog.insert(RuleEntry {
                id: id.to_string(),
                category,
                text,
            });
        }

        tracing::debug!("Loaded {} catalog rules", catalog.len());
        Ok(catalog)
    }

    fn insert(&mut self, entry: RuleEntry) {
        match self.index.get(&entry.id) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Returns `true` if the catalog contains the given rule id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    /// Number of rules in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleCatalog {
    type Item = &'a RuleEntry;
    type IntoIter = std::slice::Iter<'a, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Structural errors in catalog text.
#[derive(Debug, thiserror::Error)]
pub enum CatalogParseError {
    /// A rule header line did not contain both an id and a category token.
    #[error("rule header `{header}` is missing the id or category token")]
    MissingCategory {
        /// The offending header line, trimmed.
        header: String,
    },

    /// A category token outside Mandatory/Required/Advisory.
    #[error("unknown category `{value}`, expected: Mandatory, Required, Advisory")]
    UnknownCategory {
        /// The invalid token.
        value: String,
    },
}

/// Errors loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    #[error("Failed to read rule catalog {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Structural error in the catalog text.
    #[error("Failed to parse rule catalog {path}: {source}")]
    Parse {
        /// Path being parsed.
        path: PathBuf,
        /// Underlying structural error.
        source: CatalogParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Appendix A Summary of guidelines

Rule 1.1 Required
The program shall contain no violations of the standard C syntax
and constraints.

Rule 1.2 Advisory
Language extensions should not be used.
Rule 8.2 Mandatory
Function types shall be in prototype form.
";

    #[test]
    fn parses_blocks_and_ignores_preamble() {
        let catalog = RuleCatalog::parse(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("1.1"));
        assert!(catalog.contains("1.2"));
        assert!(catalog.contains("8.2"));
        assert!(!catalog.contains("Appendix"));
    }

    #[test]
    fn joins_text_lines_and_drops_blanks() {
        let catalog = RuleCatalog::parse(SAMPLE).unwrap();
        let entry = catalog.get("1.1").unwrap();
        assert_eq!(
            entry.text,
            "The program shall contain no violations of the standard C syntax and constraints."
        );
    }

    #[test]
    fn categories_parse_into_enum() {
        let catalog = RuleCatalog::parse(SAMPLE).unwrap();
        assert_eq!(catalog.get("1.1").unwrap().category, RuleCategory::Required);
        assert_eq!(catalog.get("1.2").unwrap().category, RuleCategory::Advisory);
        assert_eq!(catalog.get("8.2").unwrap().category, RuleCategory::Mandatory);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let catalog = RuleCatalog::parse(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1.1", "1.2", "8.2"]);
    }

    #[test]
    fn duplicate_id_last_write_wins_keeping_position() {
        let text = "\
Rule 1.1 Required
Old text.
Rule 2.1 Advisory
Other.
Rule 1.1 Advisory
New text.
";
        let catalog = RuleCatalog::parse(text).unwrap();
        assert_eq!(catalog.len(), 2);

        let entry = catalog.get("1.1").unwrap();
        assert_eq!(entry.category, RuleCategory::Advisory);
        assert_eq!(entry.text, "New text.");

        // The overwritten entry keeps its first position.
        let ids: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1.1", "2.1"]);
    }

    #[test]
    fn header_without_category_is_an_error() {
        let err = RuleCatalog::parse("Rule 1.1\nSome text.\n").unwrap_err();
        assert!(matches!(err, CatalogParseError::MissingCategory { .. }));
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = RuleCatalog::parse("Rule 1.1 Optional\nSome text.\n").unwrap_err();
        match err {
            CatalogParseError::UnknownCategory { value } => assert_eq!(value, "Optional"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        let catalog = RuleCatalog::parse("").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn from_file_reports_path_on_missing_file() {
        let err = RuleCatalog::from_file(std::path::Path::new("/nonexistent/rules.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.txt"));
    }
}
