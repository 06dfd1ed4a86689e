//! Shared fixtures for integration tests: in-memory PDFs, a one-shot HTTP
//! responder, and a recording spreadsheet.

#![allow(dead_code)]

use async_trait::async_trait;
use google_sheets4::api::BatchUpdateValuesRequest;
use lopdf::{dictionary, Object, Stream};
use pdf2sheets::{Pdf2SheetsError, SpreadsheetService, UploadAck};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::EnvFilter;

/// Route library logs to the test harness; `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a PDF whose pages carry the given content streams.
pub fn pdf_with_contents(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A 2x2 ruled grid holding A | B over C | D.
pub const TABLE_2X2: &[u8] = b"
    1 w
    100 700 m 300 700 l S
    100 680 m 300 680 l S
    100 660 m 300 660 l S
    100 700 m 100 660 l S
    200 700 m 200 660 l S
    300 700 m 300 660 l S
    BT /F1 10 Tf 110 685 Td (A) Tj ET
    BT /F1 10 Tf 210 685 Td (B) Tj ET
    BT /F1 10 Tf 110 665 Td (C) Tj ET
    BT /F1 10 Tf 210 665 Td (D) Tj ET
";

/// A page with nothing on it.
pub const BLANK: &[u8] = b"";

/// Serve one HTTP response on an ephemeral port; returns its URL.
///
/// Same request handling as the library's unit-test responder: read the
/// head and any `Content-Length` body, then answer and close.
pub async fn serve_once(status: u16, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            if status == 200 { "OK" } else { "Status" },
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/report.pdf")
}

async fn read_request(socket: &mut TcpStream) -> String {
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

/// Records every request; answers with an ack sized to the request.
#[derive(Default)]
pub struct RecordingSheet {
    requests: Mutex<Vec<(String, BatchUpdateValuesRequest)>>,
}

impl RecordingSheet {
    pub fn requests(&self) -> Vec<(String, BatchUpdateValuesRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpreadsheetService for RecordingSheet {
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        request: BatchUpdateValuesRequest,
    ) -> Result<UploadAck, Pdf2SheetsError> {
        let rows = request
            .data
            .as_ref()
            .and_then(|d| d.first())
            .and_then(|r| r.values.as_ref())
            .map(|v| v.len() as u64)
            .unwrap_or(0);
        self.requests
            .lock()
            .unwrap()
            .push((spreadsheet_id.to_string(), request));
        Ok(UploadAck {
            spreadsheet_id: spreadsheet_id.to_string(),
            updated_rows: rows,
            ..Default::default()
        })
    }
}
