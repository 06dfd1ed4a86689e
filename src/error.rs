//! Error types for the pdf2sheets library.
//!
//! A single fatal error type, [`Pdf2SheetsError`], covers every stage of a
//! run. Each pipeline stage fails with its own group of variants so the
//! binary can tell a download problem from an expired credential without
//! string matching:
//!
//! * config   : the YAML file is missing, malformed, or lacks a key
//! * fetch    : the PDF could not be downloaded ([`Pdf2SheetsError::Download`])
//! * extract  : the bytes are not a PDF, or the PDF cannot be parsed
//! * auth     : no valid credential could be produced ([`Pdf2SheetsError::Auth`])
//! * sheets   : the API client could not be built, or the write failed
//!
//! "No tables found" is not an error; see [`crate::output::RunOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2sheets library.
#[derive(Debug, Error)]
pub enum Pdf2SheetsError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// The YAML config file does not exist or cannot be read.
    #[error("Config file not found: '{path}'\nCreate it with spreadsheet_id, sheet_name and pdf_url.")]
    ConfigNotFound { path: PathBuf },

    /// The YAML config file exists but is not valid YAML.
    #[error("Failed to parse config '{path}': {detail}")]
    ConfigParse { path: PathBuf, detail: String },

    /// A required key is absent from the config file.
    #[error("Config is missing required key '{key}'")]
    MissingConfigKey { key: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The server answered with something other than HTTP 200.
    #[error("Failed to download PDF: {status}\nURL: {url}")]
    Download { url: String, status: u16 },

    /// The request never produced a response (DNS, TLS, connection reset…).
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadRequest { url: String, reason: String },

    // ── Extract errors ────────────────────────────────────────────────────
    /// No `%PDF` header in the first 1024 bytes of the download.
    #[error("Downloaded file is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    /// pdfplumber could not open the document or one of its pages.
    #[error("Failed to extract tables: {detail}")]
    Extract { detail: String },

    // ── Auth errors ───────────────────────────────────────────────────────
    /// No valid OAuth2 credential could be loaded, refreshed, or obtained.
    #[error("Authentication failed: {detail}")]
    Auth { detail: String },

    /// The refreshed or newly authorized credential could not be persisted.
    #[error("Failed to write credential file '{path}': {source}")]
    CredentialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Sheets errors ─────────────────────────────────────────────────────
    /// The Google Sheets client could not be constructed.
    #[error("Google Sheets API Error: {detail}")]
    ServiceInit { detail: String },

    /// The `values:batchUpdate` call failed.
    #[error("Upload to spreadsheet '{spreadsheet_id}' failed: {detail}")]
    Upload {
        spreadsheet_id: String,
        detail: String,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2SheetsError {
    /// Shorthand used by the auth module, which wraps many foreign error types.
    pub(crate) fn auth(detail: impl std::fmt::Display) -> Self {
        Pdf2SheetsError::Auth {
            detail: detail.to_string(),
        }
    }
}
