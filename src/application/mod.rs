pub mod use_cases;

pub use use_cases::contact_import::{ContactImportUseCase, ContactImporter};
