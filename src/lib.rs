//! Contact list import service.
//!
//! Normalizes uploaded contact exports (for example a LinkedIn
//! `Connections.csv` with its "Notes:" preamble) into contact records and
//! stores the ones a user does not have yet.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use application::{ContactImportUseCase, ContactImporter};
pub use domain::contact::{ContactRecord, ImportConfig, ImportOutcome, ImportSummary, SkippedRow};
pub use domain::error::{AppError, Result};
