//! Progress-callback trait for pipeline stage events.
//!
//! Pass a `&dyn RunProgressCallback` to [`crate::run::run`] to learn when
//! each stage starts and finishes. The CLI uses it to drive a
//! spinner; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2sheets::{RunProgressCallback, Stage};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct StageCounter(AtomicUsize);
//!
//! impl RunProgressCallback for StageCounter {
//!     fn on_stage_complete(&self, stage: Stage) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{stage} done");
//!     }
//! }
//! ```

use std::fmt;

/// The three sequential stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetch => "Downloading PDF",
            Stage::Extract => "Extracting tables",
            Stage::Upload => "Uploading rows",
        })
    }
}

/// Called by the pipeline as it moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait RunProgressCallback: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes without error.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once after extraction with the number of rows found.
    fn on_rows_extracted(&self, rows: usize) {
        let _ = rows;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}
