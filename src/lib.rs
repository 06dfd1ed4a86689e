//! # pdf2sheets
//!
//! Download a PDF, pull every table out of it, and write the rows into a
//! Google Sheets spreadsheet.
//!
//! ## Pipeline Overview
//!
//! ```text
//! config.yml ─┐
//!             ├─ 1. Fetch    GET pdf_url into memory (200 only)
//!             ├─ 2. Extract  pdfplumber table detection, flattened
//!             │              page → table → row
//!             └─ 3. Upload   one values:batchUpdate at <sheet_name>!A1
//! token.json ─── OAuth2 credential, refreshed and re-saved when expired
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2sheets::{connect, load_config, run, NoopProgressCallback, RunOutcome, RunPaths};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = RunPaths::default();
//!     let config = load_config(&paths.config).await?;
//!     let service = connect(&paths).await?;
//!     match run(&config, &service, &NoopProgressCallback).await? {
//!         RunOutcome::Uploaded { rows, .. } => println!("{rows} rows uploaded"),
//!         RunOutcome::NoTables { .. } => println!("no tables found"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2sheets` binary (clap + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod auth;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;
pub mod sheets;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use auth::{Credential, CredentialManager, CredentialStore};
pub use config::{load_config, RunPaths, SheetsConfig, SheetsConfigBuilder};
pub use error::Pdf2SheetsError;
pub use output::{RunOutcome, RunStats, UploadAck};
pub use progress::{NoopProgressCallback, RunProgressCallback, Stage};
pub use run::{connect, run};
pub use sheets::{GoogleSheetsService, SpreadsheetService};
pub use table::{Cell, Row, TableData};
