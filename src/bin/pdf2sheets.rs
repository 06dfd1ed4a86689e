//! CLI binary for pdf2sheets.
//!
//! A thin shim over the library crate: resolve file paths, authenticate,
//! run the pipeline, and report the outcome. Every flag has a default, so a
//! bare `pdf2sheets` in a directory holding `config.yml`, `credentials.json`
//! and (after the first run) `token.json` does the whole job.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2sheets::{
    connect, load_config, run, NoopProgressCallback, RunOutcome, RunPaths, RunProgressCallback,
    Stage,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// One spinner whose message follows the current stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.bar.println(format!("  {} {stage}", green("✓")));
    }

    fn on_rows_extracted(&self, rows: usize) {
        self.bar
            .println(format!("    {}", dim(&format!("{rows} rows found"))));
    }
}

/// Download a PDF, extract its tables, and upload the rows to Google Sheets.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2sheets",
    version,
    about = "Download a PDF, extract its tables, and upload the rows to Google Sheets",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// YAML file with spreadsheet_id, sheet_name and pdf_url.
    #[arg(long, env = "PDF2SHEETS_CONFIG", default_value = "config.yml")]
    config: PathBuf,

    /// OAuth client secret, used for the first interactive authorization.
    #[arg(long, env = "PDF2SHEETS_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Where the authorized credential is stored and refreshed.
    #[arg(long, env = "PDF2SHEETS_TOKEN", default_value = "token.json")]
    token: PathBuf,

    /// Disable the progress spinner.
    #[arg(long, env = "PDF2SHEETS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2SHEETS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2SHEETS_QUIET")]
    quiet: bool,
}

impl Cli {
    fn paths(&self) -> RunPaths {
        RunPaths {
            config: self.config.clone(),
            client_secret: self.credentials.clone(),
            token: self.token.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers stage feedback, so library INFO logs are muted
    // while it is active.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match execute(&cli, show_progress).await {
        Ok(outcome) => {
            if !cli.quiet {
                report(&outcome);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} Error: {e:#}", red("❌"));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli, show_progress: bool) -> Result<RunOutcome> {
    let paths = cli.paths();
    let config = load_config(&paths.config)
        .await
        .context("Failed to load config")?;

    // Authentication may print a consent URL, so it runs before the spinner.
    let service = connect(&paths)
        .await
        .context("Failed to connect to Google Sheets")?;

    if show_progress {
        let progress = CliProgressCallback::new();
        let outcome = run(&config, &service, &progress).await;
        progress.finish();
        outcome.context("Run failed")
    } else {
        run(&config, &service, &NoopProgressCallback)
            .await
            .context("Run failed")
    }
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Uploaded { rows, ack, stats } => {
            println!("✅ Data successfully uploaded!");
            eprintln!(
                "   {}",
                dim(&format!(
                    "{rows} rows, {} cells updated, {}ms total",
                    ack.updated_cells, stats.total_duration_ms
                ))
            );
        }
        RunOutcome::NoTables { .. } => {
            println!("⚠️ No tables found in the PDF.");
        }
    }
}
