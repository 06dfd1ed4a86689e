//! Upload stage: write all rows into the sheet with one batch call.
//!
//! The request always anchors at the configured target range (`<sheet>!A1`)
//! and uses `USER_ENTERED`, so Sheets applies its usual number, date and
//! formula parsing. Writing the same rows twice leaves the same content:
//! this is an overwrite, not an append.
//!
//! There is no chunking. Very large tables go out as one request and may
//! exceed the API payload limit.

use crate::error::Pdf2SheetsError;
use crate::output::UploadAck;
use crate::sheets::SpreadsheetService;
use crate::table::TableData;
use google_sheets4::api::{BatchUpdateValuesRequest, ValueRange};
use tracing::info;

/// Sheets parses values as if typed by a user.
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";
/// Each inner array of `values` is one row.
pub const MAJOR_DIMENSION: &str = "ROWS";

/// Build the single-range write request for `rows`.
pub fn build_request(rows: &TableData, range: &str) -> BatchUpdateValuesRequest {
    BatchUpdateValuesRequest {
        value_input_option: Some(VALUE_INPUT_OPTION.to_string()),
        data: Some(vec![ValueRange {
            major_dimension: Some(MAJOR_DIMENSION.to_string()),
            range: Some(range.to_string()),
            values: Some(rows.to_values()),
        }]),
        ..Default::default()
    }
}

/// Write `rows` at `range` in `spreadsheet_id`.
pub async fn upload(
    service: &dyn SpreadsheetService,
    rows: &TableData,
    range: &str,
    spreadsheet_id: &str,
) -> Result<UploadAck, Pdf2SheetsError> {
    info!("Uploading {} rows to {}", rows.len(), range);
    let ack = service
        .batch_update(spreadsheet_id, build_request(rows, range))
        .await?;
    info!("Updated {} cells", ack.updated_cells);
    Ok(ack)
}
