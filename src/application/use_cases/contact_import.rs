// ============================================================
// CONTACT IMPORT USE CASE
// ============================================================
// Validate the upload, decode it, normalize rows, and store new contacts

use std::borrow::Cow;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};
use tracing::{info, warn};

use crate::domain::contact::{ImportConfig, ImportOutcome, ImportSummary};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::ContactCsvParser;
use crate::infrastructure::db::contacts::{ContactRepository, InsertOutcome};

/// Stateless normalizer: bytes + filename in, records and skip reasons out
#[derive(Debug, Clone)]
pub struct ContactImporter {
    config: ImportConfig,
    parser: ContactCsvParser,
}

impl ContactImporter {
    pub fn new(config: ImportConfig) -> Self {
        let parser = ContactCsvParser::new(config.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Extension check, done before any content is read
    pub fn check_filename(&self, filename: &str) -> Result<()> {
        if self.config.accepts_filename(filename) {
            return Ok(());
        }

        warn!(filename = %filename, "Rejected upload with unsupported extension");
        Err(AppError::UnsupportedFile(format!(
            "{} (expected one of: {})",
            filename,
            self.config.allowed_extensions.join(", ")
        )))
    }

    /// Run a whole import. Only whole-file problems are errors;
    /// bad rows end up in [`ImportOutcome::skipped`].
    pub fn import(&self, filename: &str, content: &[u8]) -> Result<ImportOutcome> {
        self.check_filename(filename)?;

        let text = decode_utf8(content).map_err(|e| {
            warn!(filename = %filename, error = %e, "Rejected undecodable upload");
            e
        })?;

        let outcome = self.parser.parse_content(&text).map_err(|e| {
            warn!(filename = %filename, error = %e, "Import failed");
            e
        })?;

        info!(
            filename = %filename,
            imported = outcome.imported_count(),
            skipped = outcome.total_errors(),
            "Contact file normalized"
        );

        Ok(outcome)
    }
}

impl Default for ContactImporter {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

/// Strict UTF-8 decode; a UTF-8 BOM is dropped, other BOMs are refused
pub fn decode_utf8(content: &[u8]) -> Result<Cow<'_, str>> {
    let mut body = content;

    if let Some((encoding, bom_len)) = Encoding::for_bom(content) {
        if encoding != UTF_8 {
            return Err(AppError::DecodeError(format!(
                "file is encoded as {}, expected UTF-8",
                encoding.name()
            )));
        }
        body = &content[bom_len..];
    }

    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            let bom_len = content.len() - body.len();
            let valid_up_to = std::str::from_utf8(body)
                .err()
                .map(|e| e.valid_up_to())
                .unwrap_or(0);
            AppError::DecodeError(format!("invalid UTF-8 at byte {}", bom_len + valid_up_to))
        })
}

/// Import for a user and store contacts they do not have yet
pub struct ContactImportUseCase {
    importer: Arc<ContactImporter>,
    repository: Arc<ContactRepository>,
}

impl ContactImportUseCase {
    pub fn new(importer: Arc<ContactImporter>, repository: Arc<ContactRepository>) -> Self {
        Self {
            importer,
            repository,
        }
    }

    pub fn importer(&self) -> &ContactImporter {
        &self.importer
    }

    pub async fn execute(
        &self,
        user_id: i64,
        filename: String,
        content: Vec<u8>,
    ) -> Result<ImportSummary> {
        // parsing is CPU-bound; keep it off the async workers
        let importer = Arc::clone(&self.importer);
        let outcome = tokio::task::spawn_blocking(move || importer.import(&filename, &content))
            .await
            .map_err(|e| AppError::Internal(format!("Import task failed: {}", e)))??;

        let inserted = self
            .repository
            .insert_if_absent(user_id, &outcome.imported)
            .await?;

        let duplicate_count = inserted
            .iter()
            .filter(|o| **o == InsertOutcome::Duplicate)
            .count();

        let mut summary = outcome.summary(self.importer.config().max_reported_errors);
        summary.imported_count = inserted.len() - duplicate_count;
        summary.duplicate_count = duplicate_count;

        info!(
            user_id,
            imported = summary.imported_count,
            duplicates = summary.duplicate_count,
            errors = summary.total_errors,
            "Contacts stored"
        );

        Ok(summary)
    }
}
