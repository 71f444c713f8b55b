// ============================================================
// HEADER DETECTOR
// ============================================================
// Find the real header row in an export that may open with free-form notes

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::domain::contact::ImportConfig;
use crate::domain::error::{AppError, Result};

/// Header row plus every line that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTable<'a> {
    /// Column names in source order, trimmed and unquoted
    pub headers: Vec<String>,

    /// Lines after the header, `\r` already stripped. Blank lines are kept
    /// because they may sit inside a quoted multi-line value.
    pub data_lines: Vec<&'a str>,

    /// Number of non-empty lines discarded before the header
    pub preamble_lines: usize,
}

/// Locates the header line using a field-count plus keyword heuristic.
///
/// A preamble line that happens to have enough comma-separated fields and a
/// header keyword is accepted as the header; there is no stronger signal in
/// the input to tell it apart.
#[derive(Debug, Clone)]
pub struct HeaderDetector {
    config: ImportConfig,
}

impl HeaderDetector {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Split `content` into header and data lines, dropping any preamble
    pub fn detect<'a>(&self, content: &'a str) -> Result<DetectedTable<'a>> {
        let mut header: Option<Vec<String>> = None;
        let mut data_lines = Vec::new();
        let mut preamble_lines = 0usize;

        for line in content.split('\n').map(|l| l.trim_end_matches('\r')) {
            if header.is_some() {
                data_lines.push(line);
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            if self.is_header_line(line) {
                header = Some(Self::header_names(line));
            } else {
                debug!(line = %line, "Discarding preamble line");
                preamble_lines += 1;
            }
        }

        let headers = header.ok_or(AppError::NoHeaderFound)?;

        Ok(DetectedTable {
            headers,
            data_lines,
            preamble_lines,
        })
    }

    /// Whether a single line looks like a header row
    pub fn is_header_line(&self, line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').map(Self::clean_field).collect();

        fields.len() >= self.config.min_header_fields
            && fields.iter().any(|f| self.config.is_header_token(f))
    }

    fn clean_field(field: &str) -> &str {
        field.trim().trim_matches('"').trim()
    }

    /// Column names via a quote-aware parse, so they line up with data rows
    fn header_names(line: &str) -> Vec<String> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(line.as_bytes());

        match reader.records().next() {
            Some(Ok(record)) => record.iter().map(|f| f.to_string()).collect(),
            _ => line
                .split(',')
                .map(|f| Self::clean_field(f).to_string())
                .collect(),
        }
    }
}

impl Default for HeaderDetector {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}
