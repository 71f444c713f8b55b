// ============================================================
// CONTACT CSV PARSER
// ============================================================
// Turn a detected table into contact records, one result per data row

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use super::{ColumnResolver, ContactField, DetectedTable, HeaderDetector};
use crate::domain::contact::{ContactRecord, ImportConfig, ImportOutcome, RowResult, SkippedRow};
use crate::domain::error::Result;

/// Row number of the first data row; the header is row 1
const FIRST_DATA_ROW: usize = 2;

pub const MISSING_NAME: &str = "missing name";
pub const UNTERMINATED_QUOTE: &str = "unterminated quoted field";

/// CSV parser for contact exports
#[derive(Debug, Clone, Default)]
pub struct ContactCsvParser {
    detector: HeaderDetector,
}

impl ContactCsvParser {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            detector: HeaderDetector::new(config),
        }
    }

    /// Detect the header and map every data row
    pub fn parse_content(&self, content: &str) -> Result<ImportOutcome> {
        let table = self.detector.detect(content)?;
        debug!(
            preamble_lines = table.preamble_lines,
            columns = table.headers.len(),
            "Header row detected"
        );
        Ok(self.parse_table(&table))
    }

    /// Map every data row of an already detected table.
    ///
    /// Records are read one at a time. A quoted value may run over several
    /// lines; when such a record does not line up with the header, only its
    /// first line is reported and reading resumes on the line after it.
    /// Blank lines between records are not rows and get no number.
    pub fn parse_table(&self, table: &DetectedTable<'_>) -> ImportOutcome {
        let resolver = ColumnResolver::new(&table.headers);
        if !resolver.has(ContactField::Name)
            && !resolver.has(ContactField::FirstName)
            && !resolver.has(ContactField::LastName)
        {
            warn!(headers = ?table.headers, "No name column found, every row will be skipped");
        }

        let header_len = table.headers.len();
        let lines = &table.data_lines;
        let mut outcome = ImportOutcome::new();
        let mut row_number = FIRST_DATA_ROW;
        let mut start = 0;

        while start < lines.len() {
            if lines[start].trim().is_empty() {
                start += 1;
                continue;
            }

            let result = match Self::record_end(lines, start) {
                Some(end) => match Self::read_record(&lines[start..end]) {
                    Ok(record) if end - start > 1 && record.len() != header_len => {
                        start += 1;
                        Self::skip(row_number, UNTERMINATED_QUOTE.to_string())
                    }
                    Ok(record) => {
                        start = end;
                        self.parse_row(row_number, header_len, &resolver, &record)
                    }
                    Err(reason) => {
                        start += 1;
                        Self::skip(row_number, reason)
                    }
                },
                None => {
                    start += 1;
                    Self::skip(row_number, UNTERMINATED_QUOTE.to_string())
                }
            };

            outcome.push(result);
            row_number += 1;
        }

        outcome
    }

    /// End (exclusive) of the record opening at `start`: the first line where
    /// the quote count balances. `None` if the input runs out first.
    fn record_end(lines: &[&str], start: usize) -> Option<usize> {
        let mut quotes = 0usize;
        for (offset, line) in lines[start..].iter().enumerate() {
            quotes += line.matches('"').count();
            if quotes % 2 == 0 {
                return Some(start + offset + 1);
            }
        }
        None
    }

    fn read_record(lines: &[&str]) -> std::result::Result<StringRecord, String> {
        let text = lines.join("\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut record = StringRecord::new();
        reader
            .read_record(&mut record)
            .map_err(|e| e.to_string())?;
        Ok(record)
    }

    /// Map a single record to a contact or a skip reason
    pub fn parse_row(
        &self,
        row_number: usize,
        header_len: usize,
        resolver: &ColumnResolver,
        record: &StringRecord,
    ) -> RowResult {
        if record.len() != header_len {
            return Self::skip(
                row_number,
                format!("expected {} fields, found {}", header_len, record.len()),
            );
        }

        let name = Self::resolve_name(resolver, record);
        if name.is_empty() {
            return Self::skip(row_number, MISSING_NAME.to_string());
        }

        let mut contact = ContactRecord::new(name);
        contact.company = resolver.owned(ContactField::Company, record);
        contact.title = resolver.owned(ContactField::Title, record);
        contact.email = resolver.owned(ContactField::Email, record);
        contact.location = resolver.owned(ContactField::Location, record);
        contact.profile_url = resolver.owned(ContactField::ProfileUrl, record);

        RowResult::Imported(contact)
    }

    /// Direct name column, else "first last"
    fn resolve_name(resolver: &ColumnResolver, record: &StringRecord) -> String {
        if let Some(name) = resolver.value(ContactField::Name, record) {
            return name.to_string();
        }

        let first = resolver.value(ContactField::FirstName, record).unwrap_or("");
        let last = resolver.value(ContactField::LastName, record).unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    fn skip(row_number: usize, reason: String) -> RowResult {
        debug!(row = row_number, reason = %reason, "Skipping row");
        RowResult::Skipped(SkippedRow { row_number, reason })
    }
}
