//! Unified application error type.
//! All modules (parser, core, settings, db, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Workbook / serialization
    // ---------------------------
    #[error("Cannot read workbook: {0}")]
    Workbook(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Extraction errors
    // ---------------------------
    #[error("Missing header rows: {} not found (found: {})", missing.join(", "), found.join(", "))]
    MissingHeaders {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },

    #[error("Could not determine the reporting month/year from file name or content")]
    UnknownMonth,

    #[error("No valid data found in the workbook")]
    NoValidData,

    // ---------------------------
    // Settings / snapshots
    // ---------------------------
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("No settings saved for organization '{0}'")]
    NoSettings(String),

    #[error("No saved month '{month}' for organization '{org}'")]
    NoSnapshot { org: String, month: String },

    #[error("Month '{0}' is already saved (use --force to overwrite)")]
    SnapshotExists(String),

    #[error("Scholar '{0}' not found in this month")]
    UnknownScholar(String),

    #[error("Session '{0}' is not configured")]
    UnknownSession(String),

    #[error("Day {day} is not a working day of {month}")]
    NotAWorkingDay { day: u32, month: String },

    #[error("Invalid month label: {0}")]
    InvalidMonth(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl From<calamine::Error> for AppError {
    fn from(e: calamine::Error) -> Self {
        AppError::Workbook(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
