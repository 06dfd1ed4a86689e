//! The remote spreadsheet, seen through one operation.
//!
//! The pipeline only ever issues a single `values:batchUpdate`, so the
//! service boundary is the [`SpreadsheetService`] trait with that one method.
//! [`GoogleSheetsService`] is the production implementation on top of
//! `google-sheets4`; tests substitute an in-memory sheet.

use crate::auth::Credential;
use crate::error::Pdf2SheetsError;
use crate::output::UploadAck;
use async_trait::async_trait;
use google_sheets4::api::{BatchUpdateValuesRequest, BatchUpdateValuesResponse};
use google_sheets4::{hyper, hyper_rustls, Sheets};
use tracing::debug;

/// A spreadsheet backend that accepts batched range writes.
#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    /// Submit `request` as one atomic `values:batchUpdate` call.
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> Result<UploadAck, Pdf2SheetsError>;
}

type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// Google Sheets v4 client authorized with a bearer token.
pub struct GoogleSheetsService {
    hub: Sheets<HttpsConnector>,
}

impl GoogleSheetsService {
    /// Build a client for `credential`.
    ///
    /// Fails with [`Pdf2SheetsError::ServiceInit`] when the credential carries
    /// no access token. The binary treats that as fatal and exits with code 1.
    pub fn new(credential: &Credential) -> Result<Self, Pdf2SheetsError> {
        let token = credential
            .access_token()
            .ok_or_else(|| Pdf2SheetsError::ServiceInit {
                detail: "credential has no access token".into(),
            })?
            .to_string();

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| Pdf2SheetsError::ServiceInit {
                detail: e.to_string(),
            })?
            .https_or_http()
            .enable_http1()
            .build();
        let client = hyper::Client::builder().build(connector);

        debug!("Sheets client ready");
        Ok(Self {
            hub: Sheets::new(client, token),
        })
    }
}

#[async_trait]
impl SpreadsheetService for GoogleSheetsService {
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> Result<UploadAck, Pdf2SheetsError> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_batch_update(request, spreadsheet_id)
            .doit()
            .await
            .map_err(|e| Pdf2SheetsError::Upload {
                spreadsheet_id: spreadsheet_id.to_string(),
                detail: e.to_string(),
            })?;

        Ok(ack_from_response(spreadsheet_id, response))
    }
}

fn ack_from_response(spreadsheet_id: &str, response: BatchUpdateValuesResponse) -> UploadAck {
    let count = |n: Option<i32>| n.unwrap_or(0).max(0) as u64;
    UploadAck {
        spreadsheet_id: response
            .spreadsheet_id
            .unwrap_or_else(|| spreadsheet_id.to_string()),
        updated_rows: count(response.total_updated_rows),
        updated_columns: count(response.total_updated_columns),
        updated_cells: count(response.total_updated_cells),
    }
}
