//! Pipeline stages for PDF-to-Sheets runs.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ extract ──▶ upload
//! (reqwest)  (pdfplumber)  (Sheets batchUpdate)
//! ```
//!
//! 1. [`fetch`]   : GET the PDF into memory; anything but 200 is an error
//! 2. [`extract`] : detect tables on every page and flatten them into rows;
//!    runs in `spawn_blocking` because parsing is CPU-bound
//! 3. [`upload`]  : one `USER_ENTERED` write anchored at `<sheet>!A1`

pub mod extract;
pub mod fetch;
pub mod upload;
