//! Result types returned by [`crate::run::run`].

use serde::{Deserialize, Serialize};

/// What the spreadsheet reported after a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    /// Spreadsheet the write was applied to.
    pub spreadsheet_id: String,
    pub updated_rows: u64,
    pub updated_columns: u64,
    pub updated_cells: u64,
}

/// How a run ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Rows were extracted and written.
    Uploaded {
        rows: usize,
        ack: UploadAck,
        stats: RunStats,
    },
    /// The PDF contained no detectable tables; the spreadsheet was not touched.
    NoTables { stats: RunStats },
}

impl RunOutcome {
    pub fn stats(&self) -> &RunStats {
        match self {
            RunOutcome::Uploaded { stats, .. } | RunOutcome::NoTables { stats } => stats,
        }
    }
}

/// Timing and size figures for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub bytes_downloaded: usize,
    pub rows_extracted: usize,
    pub fetch_duration_ms: u64,
    pub extract_duration_ms: u64,
    pub upload_duration_ms: u64,
    pub total_duration_ms: u64,
}
