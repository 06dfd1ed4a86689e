//! End-to-end run: fetch → extract → upload.
//!
//! Stages run strictly one after another; each blocks the run until it
//! finishes. The only branch is the empty-result short-circuit: when the PDF
//! has no tables the spreadsheet service is never called.

use crate::auth::CredentialManager;
use crate::config::{RunPaths, SheetsConfig};
use crate::error::Pdf2SheetsError;
use crate::output::{RunOutcome, RunStats};
use crate::pipeline::{extract, fetch, upload};
use crate::progress::{RunProgressCallback, Stage};
use crate::sheets::{GoogleSheetsService, SpreadsheetService};
use std::time::Instant;
use tracing::{info, warn};

/// Run the pipeline for `config` against `service`.
///
/// # Errors
/// The first failing stage's error, unchanged: [`Pdf2SheetsError::Download`]
/// (and no extraction happens), [`Pdf2SheetsError::NotAPdf`] /
/// [`Pdf2SheetsError::Extract`], or [`Pdf2SheetsError::Upload`].
pub async fn run(
    config: &SheetsConfig,
    service: &dyn SpreadsheetService,
    progress: &dyn RunProgressCallback,
) -> Result<RunOutcome, Pdf2SheetsError> {
    let total_start = Instant::now();
    let mut stats = RunStats::default();
    info!("Starting run for spreadsheet {}", config.spreadsheet_id);

    // ── Step 1: Fetch ────────────────────────────────────────────────────
    progress.on_stage_start(Stage::Fetch);
    let fetch_start = Instant::now();
    let bytes = fetch::fetch(&config.pdf_url).await?;
    stats.fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;
    stats.bytes_downloaded = bytes.len();
    progress.on_stage_complete(Stage::Fetch);

    // ── Step 2: Extract ──────────────────────────────────────────────────
    progress.on_stage_start(Stage::Extract);
    let extract_start = Instant::now();
    let rows = extract::extract(bytes).await?;
    stats.extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    stats.rows_extracted = rows.len();
    progress.on_stage_complete(Stage::Extract);
    progress.on_rows_extracted(rows.len());

    if rows.is_empty() {
        warn!("No tables found in the PDF; spreadsheet left untouched");
        stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
        return Ok(RunOutcome::NoTables { stats });
    }

    // ── Step 3: Upload ───────────────────────────────────────────────────
    progress.on_stage_start(Stage::Upload);
    let upload_start = Instant::now();
    let ack = upload::upload(
        service,
        &rows,
        &config.target_range(),
        &config.spreadsheet_id,
    )
    .await?;
    stats.upload_duration_ms = upload_start.elapsed().as_millis() as u64;
    progress.on_stage_complete(Stage::Upload);

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Run complete: {} rows in {}ms",
        rows.len(),
        stats.total_duration_ms
    );

    Ok(RunOutcome::Uploaded {
        rows: rows.len(),
        ack,
        stats,
    })
}

/// Obtain a valid credential (refreshing or authorizing as needed) and build
/// the Google Sheets client from it.
pub async fn connect(paths: &RunPaths) -> Result<GoogleSheetsService, Pdf2SheetsError> {
    let credential = CredentialManager::from_paths(paths)
        .get_valid_credential()
        .await?;
    GoogleSheetsService::new(&credential)
}
