// ============================================================
// CONTACT DOMAIN LAYER
// ============================================================
// Value objects for contact list import
// No I/O, no async

mod contact_record;
mod import_config;
mod import_outcome;

pub use contact_record::{ContactRecord, StoredContact};
pub use import_config::ImportConfig;
pub use import_outcome::{ImportOutcome, ImportSummary, RowResult, SkippedRow};
