//! Helpers shared by unit tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one HTTP response on an ephemeral local port.
///
/// Returns the URL to request (path `/file.pdf`) and a handle resolving to
/// the raw request text the server received.
pub(crate) async fn serve_once(
    status: u16,
    content_type: &str,
    body: Vec<u8>,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let content_type = content_type.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            if status == 200 { "OK" } else { "Status" },
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/file.pdf"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// A sheet held in memory that applies writes the way Sheets does for an
/// `A1`-anchored range: cells are overwritten in place, `null` leaves the
/// existing cell untouched.
#[derive(Default)]
pub(crate) struct InMemorySheet {
    state: std::sync::Mutex<SheetState>,
    fail_with: Option<String>,
}

#[derive(Default)]
struct SheetState {
    requests: Vec<(String, google_sheets4::api::BatchUpdateValuesRequest)>,
    grid: Vec<Vec<serde_json::Value>>,
}

impl InMemorySheet {
    pub(crate) fn failing(detail: &str) -> Self {
        Self {
            fail_with: Some(detail.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn requests(&self) -> Vec<(String, google_sheets4::api::BatchUpdateValuesRequest)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn grid(&self) -> Vec<Vec<serde_json::Value>> {
        self.state.lock().unwrap().grid.clone()
    }
}

#[async_trait::async_trait]
impl crate::sheets::SpreadsheetService for InMemorySheet {
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: google_sheets4::api::BatchUpdateValuesRequest,
    ) -> Result<crate::output::UploadAck, crate::error::Pdf2SheetsError> {
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push((spreadsheet_id.to_string(), request.clone()));

        if let Some(detail) = &self.fail_with {
            return Err(crate::error::Pdf2SheetsError::Upload {
                spreadsheet_id: spreadsheet_id.to_string(),
                detail: detail.clone(),
            });
        }

        let mut ack = crate::output::UploadAck {
            spreadsheet_id: spreadsheet_id.to_string(),
            ..Default::default()
        };
        for range in request.data.unwrap_or_default() {
            let values = range.values.unwrap_or_default();
            ack.updated_rows += values.len() as u64;
            for (r, row) in values.into_iter().enumerate() {
                if state.grid.len() <= r {
                    state.grid.resize(r + 1, Vec::new());
                }
                ack.updated_columns = ack.updated_columns.max(row.len() as u64);
                for (c, value) in row.into_iter().enumerate() {
                    if value.is_null() {
                        continue;
                    }
                    let cells = &mut state.grid[r];
                    if cells.len() <= c {
                        cells.resize(c + 1, serde_json::Value::Null);
                    }
                    cells[c] = value;
                    ack.updated_cells += 1;
                }
            }
        }
        Ok(ack)
    }
}
