// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for PlantVision

use thiserror::Error;

/// Result type alias for PlantVision operations
pub type Result<T> = std::result::Result<T, PlantVisionError>;

/// PlantVision error types
#[derive(Error, Debug)]
pub enum PlantVisionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A write to the key-value substrate failed; never swallowed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Imported history data was rejected as a whole.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PlantVisionError {
    /// True for errors caused by caller-supplied data rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(self, PlantVisionError::Validation(_))
    }
}
