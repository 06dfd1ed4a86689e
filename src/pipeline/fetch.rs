//! Fetch stage: download the PDF into memory.
//!
//! One GET, no retries. The HTTP client keeps reqwest's defaults: its
//! redirect policy applies and no request timeout is set. Only an exact
//! `200 OK` counts as success; any other status (including other 2xx codes)
//! fails with [`Pdf2SheetsError::Download`] carrying the status code, so the
//! extractor never sees an error page.

use crate::error::Pdf2SheetsError;
use bytes::Bytes;
use reqwest::StatusCode;
use tracing::{debug, info};

/// Download `url` and return the response body.
pub async fn fetch(url: &str) -> Result<Bytes, Pdf2SheetsError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| Pdf2SheetsError::DownloadRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Pdf2SheetsError::DownloadRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(Pdf2SheetsError::Download {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2SheetsError::DownloadRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}
