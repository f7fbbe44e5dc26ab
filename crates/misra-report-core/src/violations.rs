//! cppcheck violation XML parsing.
//!
//! cppcheck reports one `<error>` element per finding, with the interesting
//! detail spread over attributes and `<location>`/`<symbol>` children:
//!
//! ```xml
//! <results>
//!   <errors>
//!     <error id="misra-c2012-1.1" severity="style" msg="..." verbose="...">
//!       <location file="src/a.c" line="10" column="5"/>
//!       <location file="src/b.c" line="3" column="1" info="note"/>
//!       <symbol>x</symbol>
//!     </error>
//!   </errors>
//! </results>
//! ```
//!
//! The parser flattens this into one [`ViolationRecord`] per location so the
//! output is directly tabular. An error with no `<location>` children yields
//! no records at all; that is the documented shape of findings that have no
//! source position, not a parse defect.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// CSV column order for flattened violation records.
pub const VIOLATION_FIELDS: [&str; 10] = [
    "id", "severity", "msg", "verbose", "cwe", "file", "line", "column", "symbol", "info",
];

/// One rule violation at one source location.
///
/// Every field is always present; attributes missing from the XML normalize
/// to the empty string so CSV columns stay aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Analyzer-assigned identifier, e.g. `misra-c2012-10.4`.
    pub id: String,
    /// Analyzer severity classification (`style`, `warning`, ...).
    pub severity: String,
    /// Short message.
    pub msg: String,
    /// Verbose message.
    pub verbose: String,
    /// CWE number, when the check maps to one.
    pub cwe: String,
    /// Source file of this occurrence.
    pub file: String,
    /// Line of this occurrence.
    pub line: String,
    /// Column of this occurrence.
    pub column: String,
    /// Symbol associated with the finding, shared by all its locations.
    pub symbol: String,
    /// Free-text note from either the error or this location.
    pub info: String,
}

impl ViolationRecord {
    /// Field values in [`VIOLATION_FIELDS`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 10] {
        [
            self.id.as_str(),
            self.severity.as_str(),
            self.msg.as_str(),
            self.verbose.as_str(),
            self.cwe.as_str(),
            self.file.as_str(),
            self.line.as_str(),
            self.column.as_str(),
            self.symbol.as_str(),
            self.info.as_str(),
        ]
    }

    fn set_field(&mut self, key: &[u8], value: String) {
        match key {
            b"id" => self.id = value,
            b"severity" => self.severity = value,
            b"msg" => self.msg = value,
            b"verbose" => self.verbose = value,
            b"cwe" => self.cwe = value,
            b"file" => self.file = value,
            b"line" => self.line = value,
            b"column" => self.column = value,
            b"symbol" => self.symbol = value,
            b"info" => self.info = value,
            // Attributes outside the fixed schema (file0, inconclusive, ...)
            _ => {}
        }
    }
}

/// Location attributes captured from one `<location>` child.
#[derive(Debug, Clone, Default)]
struct LocationInfo {
    file: String,
    line: String,
    column: String,
    info: String,
}

/// An `<error>` element being accumulated during the event walk.
#[derive(Debug, Default)]
struct PendingError {
    base: ViolationRecord,
    locations: Vec<LocationInfo>,
    symbol: Option<String>,
}

impl PendingError {
    /// Flattens into one record per location, location fields winning over
    /// error-level values.
    fn flatten(self, out: &mut Vec<ViolationRecord>) {
        for loc in self.locations {
            let mut record = self.base.clone();
            record.file = loc.file;
            record.line = loc.line;
            record.column = loc.column;
            record.info = loc.info;
            if let Some(symbol) = &self.symbol {
                record.symbol.clone_from(symbol);
            }
            out.push(record);
        }
    }
}

/// Parser for cppcheck XML output with an ignore-list filter.
#[derive(Debug, Clone, Default)]
pub struct ViolationParser {
    ignored_ids: HashSet<String>,
}

impl ViolationParser {
    /// Creates a parser with no ignored ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that drops every error whose `id` is in the set.
    #[must_use]
    pub fn with_ignored_ids(ignored_ids: HashSet<String>) -> Self {
        Self { ignored_ids }
    }

    /// Parses a violations XML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the XML is malformed,
    /// carrying the file path for context.
    pub fn parse_file(&self, path: &std::path::Path) -> Result<Vec<ViolationRecord>, ViolationsError> {
        let content = std::fs::read_to_string(path).map_err(|e| ViolationsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_str(&content).map_err(|e| ViolationsError::Xml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses violations XML from a string.
    ///
    /// Records come out in document order: errors in order of appearance,
    /// locations in order within each error. Wrapper elements around the
    /// `<error>` list (`<results>`, `<errors>`) are skipped over, and
    /// unrecognized attributes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only for malformed XML; nothing about the content of
    /// a well-formed document aborts the parse.
    pub fn parse_str(&self, xml: &str) -> Result<Vec<ViolationRecord>, XmlParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut records = Vec::new();
        let mut current: Option<PendingError> = None;
        let mut in_symbol = false;
        let mut symbol_text = String::new();

        loop {
            match reader.read_event().map_err(XmlParseError::from_xml)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"error" => current = Some(Self::start_error(&e)?),
                    b"location" => {
                        if let Some(pending) = current.as_mut() {
                            pending.locations.push(Self::parse_location(&e)?);
                        }
                    }
                    b"symbol" => {
                        if current.is_some() {
                            in_symbol = true;
                            symbol_text.clear();
                        }
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    // A self-closing error has no locations and so no records,
                    // but run it through the same path for uniformity.
                    b"error" => self.finish_error(Self::start_error(&e)?, &mut records),
                    b"location" => {
                        if let Some(pending) = current.as_mut() {
                            pending.locations.push(Self::parse_location(&e)?);
                        }
                    }
                    _ => {}
                },
                Event::Text(t) => {
                    if in_symbol {
                        let text = t.unescape().map_err(XmlParseError::from_xml)?;
                        symbol_text.push_str(&text);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"error" => {
                        if let Some(pending) = current.take() {
                            self.finish_error(pending, &mut records);
                        }
                    }
                    b"symbol" => {
                        if in_symbol {
                            in_symbol = false;
                            // Last symbol child wins when there are several.
                            if let Some(pending) = current.as_mut() {
                                pending.symbol = Some(symbol_text.clone());
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        tracing::debug!("Parsed {} violation records", records.len());
        Ok(records)
    }

    fn start_error(element: &BytesStart<'_>) -> Result<PendingError, XmlParseError> {
        let mut pending = PendingError::default();
        for attr in element.attributes() {
            let attr = attr.map_err(XmlParseError::from_attr)?;
            let value = attr
                .unescape_value()
                .map_err(XmlParseError::from_xml)?
                .into_owned();
            pending.base.set_field(attr.key.as_ref(), value);
        }
        Ok(pending)
    }

    fn parse_location(element: &BytesStart<'_>) -> Result<LocationInfo, XmlParseError> {
        let mut loc = LocationInfo::default();
        for attr in element.attributes() {
            let attr = attr.map_err(XmlParseError::from_attr)?;
            let value = attr
                .unescape_value()
                .map_err(XmlParseError::from_xml)?
                .into_owned();
            match attr.key.as_ref() {
                b"file" => loc.file = value,
                b"line" => loc.line = value,
                b"column" => loc.column = value,
                b"info" => loc.info = value,
                _ => {}
            }
        }
        Ok(loc)
    }

    fn finish_error(&self, pending: PendingError, records: &mut Vec<ViolationRecord>) {
        if self.ignored_ids.contains(&pending.base.id) {
            tracing::debug!("Ignoring error id {}", pending.base.id);
            return;
        }
        pending.flatten(records);
    }
}

/// Malformed XML in the violations input.
#[derive(Debug, thiserror::Error)]
#[error("malformed XML: {message}")]
pub struct XmlParseError {
    message: String,
}

impl XmlParseError {
    fn from_xml(e: quick_xml::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }

    fn from_attr(e: quick_xml::events::attributes::AttrError) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

/// Errors parsing a violations file.
#[derive(Debug, thiserror::Error)]
pub enum ViolationsError {
    /// IO error reading the violations file.
    #[error("Failed to read violations file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Malformed XML.
    #[error("Failed to parse violations file {path}: {source}")]
    Xml {
        /// Path being parsed.
        path: PathBuf,
        /// Underlying XML error.
        source: XmlParseError,
    },
}
