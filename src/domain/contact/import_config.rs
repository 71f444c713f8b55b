// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Tunables for header detection and result shaping

use serde::{Deserialize, Serialize};

/// Configuration for contact list import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Accepted filename extensions, without the dot, compared case-insensitively
    pub allowed_extensions: Vec<String>,

    /// Column names that mark a line as the header row (lowercase)
    pub header_tokens: Vec<String>,

    /// Minimum comma-separated fields a header line must have (default: 3)
    pub min_header_fields: usize,

    /// Maximum number of row errors returned to the caller (default: 10)
    pub max_reported_errors: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string()],
            header_tokens: [
                "first name",
                "last name",
                "name",
                "full name",
                "company",
                "position",
                "title",
                "email address",
                "email",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            min_header_fields: 3,
            max_reported_errors: 10,
        }
    }
}

impl ImportConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `filename` ends with one of the allowed extensions
    pub fn accepts_filename(&self, filename: &str) -> bool {
        let lower = filename.trim().to_lowercase();
        self.allowed_extensions.iter().any(|ext| {
            let ext = ext.trim_start_matches('.').to_lowercase();
            lower.len() > ext.len() + 1 && lower.ends_with(&format!(".{}", ext))
        })
    }

    /// Whether `field` (already trimmed) is one of the header tokens
    pub fn is_header_token(&self, field: &str) -> bool {
        self.header_tokens
            .iter()
            .any(|token| token.eq_ignore_ascii_case(field))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_extensions.is_empty() {
            return Err("allowed_extensions must not be empty".to_string());
        }
        if self.header_tokens.is_empty() {
            return Err("header_tokens must not be empty".to_string());
        }
        if self.min_header_fields == 0 {
            return Err("min_header_fields must be > 0".to_string());
        }
        if self.max_reported_errors == 0 {
            return Err("max_reported_errors must be > 0".to_string());
        }
        Ok(())
    }
}
