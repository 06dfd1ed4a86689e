//! Extract stage: turn PDF bytes into flattened table rows.
//!
//! Table detection itself belongs to `pdfplumber`; this stage only drives it
//! page by page and flattens the result. Pages are walked lazily through
//! [`Pdf::pages_iter`], so only one interpreted page is alive at a time.
//!
//! pdfplumber is synchronous and CPU-bound, so [`extract`] moves the byte
//! buffer into `spawn_blocking`. The buffer is dropped when the blocking task
//! returns, whether extraction succeeded or not.

use crate::error::Pdf2SheetsError;
use crate::table::{Row, TableData};
use bytes::Bytes;
use pdfplumber::{Pdf, TableSettings};
use tracing::{debug, info};

/// Extract every table row from an in-memory PDF.
///
/// Returns an empty [`TableData`] when no page has a detectable table.
pub async fn extract(bytes: Bytes) -> Result<TableData, Pdf2SheetsError> {
    tokio::task::spawn_blocking(move || extract_blocking(&bytes))
        .await
        .map_err(|e| Pdf2SheetsError::Internal(format!("extraction task failed: {e}")))?
}

/// Synchronous body of [`extract`].
pub fn extract_blocking(bytes: &[u8]) -> Result<TableData, Pdf2SheetsError> {
    check_magic(bytes)?;

    let pdf = Pdf::open(bytes, None).map_err(|e| Pdf2SheetsError::Extract {
        detail: e.to_string(),
    })?;
    info!("PDF has {} pages", pdf.page_count());

    let settings = TableSettings::default();
    let pages = pdf.pages_iter().enumerate().map(|(idx, page)| {
        let page = page.map_err(|e| Pdf2SheetsError::Extract {
            detail: format!("page {}: {e}", idx + 1),
        })?;
        let tables: Vec<Vec<Row>> = page
            .find_tables(&settings)
            .into_iter()
            .map(|table| {
                table
                    .rows
                    .into_iter()
                    .map(|row| row.into_iter().map(|cell| cell.text).collect())
                    .collect()
            })
            .collect();
        debug!("Page {}: {} table(s)", idx + 1, tables.len());
        Ok(tables)
    });

    let data = collect_rows(pages)?;
    info!("Extracted {} rows", data.len());
    Ok(data)
}

/// Flatten per-page tables into one row sequence: page order, then table
/// order, then row order. Stops at the first page that failed.
pub fn collect_rows<I>(pages: I) -> Result<TableData, Pdf2SheetsError>
where
    I: IntoIterator<Item = Result<Vec<Vec<Row>>, Pdf2SheetsError>>,
{
    let mut data = TableData::new();
    for page in pages {
        for table in page? {
            data.push_table(table);
        }
    }
    Ok(data)
}

/// Readers must accept a header preceded by up to this many bytes of junk.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Reject bodies with no `%PDF` header in their first 1024 bytes before
/// handing them to the parser.
fn check_magic(bytes: &[u8]) -> Result<(), Pdf2SheetsError> {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    if window.windows(4).any(|w| w == b"%PDF") {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(Pdf2SheetsError::NotAPdf { magic })
}
