// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Header detection, column resolution, and row mapping for contact exports

mod column_resolver;
mod csv_parser;
mod header_detector;

pub use column_resolver::{ColumnResolver, ContactField};
pub use csv_parser::ContactCsvParser;
pub use header_detector::{DetectedTable, HeaderDetector};
