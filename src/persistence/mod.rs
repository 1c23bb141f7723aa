//! Persistence of run results, configuration snapshots and error reports

pub mod normalizer;
pub mod writer;

pub use normalizer::{clean, decode_unicode_escapes, normalize, resolve, unwrap_raw_tuple};
pub use writer::ResultWriter;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of a single write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub file_path: String,
    pub error_message: Option<String>,
}

impl SaveOutcome {
    pub fn saved(path: &Path) -> Self {
        Self {
            success: true,
            file_path: path.display().to_string(),
            error_message: None,
        }
    }

    pub fn failed(path: &Path, error: impl ToString) -> Self {
        Self {
            success: false,
            file_path: path.display().to_string(),
            error_message: Some(error.to_string()),
        }
    }
}
