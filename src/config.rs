//! Configuration types for a PDF-to-Sheets run.
//!
//! Two pieces of configuration exist:
//!
//! * [`SheetsConfig`]: *what* to do: which PDF to fetch and which
//!   spreadsheet/sheet to write into. Loaded once from a YAML file with the
//!   keys `spreadsheet_id`, `sheet_name` and `pdf_url`.
//! * [`RunPaths`]: *where* the local files live: the YAML file itself, the
//!   OAuth client secret, and the persisted token.
//!
//! Both are immutable once built and passed by reference to each stage.

use crate::error::Pdf2SheetsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the YAML config file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
/// Default location of the OAuth client secret (installed-app JSON).
pub const DEFAULT_CLIENT_SECRET_PATH: &str = "credentials.json";
/// Default location of the persisted authorized-user credential.
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Destination and source of a run.
///
/// # Example
/// ```rust
/// use pdf2sheets::SheetsConfig;
///
/// let config = SheetsConfig::builder()
///     .spreadsheet_id("X")
///     .sheet_name("Sheet1")
///     .pdf_url("http://x/f.pdf")
///     .build()
///     .unwrap();
/// assert_eq!(config.target_range(), "Sheet1!A1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetsConfig {
    /// Google spreadsheet ID (the long token in the spreadsheet URL).
    pub spreadsheet_id: String,
    /// Tab name inside the spreadsheet.
    pub sheet_name: String,
    /// HTTP/HTTPS URL of the PDF to download.
    pub pdf_url: String,
}

/// Raw shape of the YAML file. Every key is optional here so a missing key
/// can be reported by name instead of as a generic serde error. Values stay
/// untyped so `sheet_name: 2024` is read as the tab `2024`.
#[derive(Debug, Default, Deserialize)]
struct RawSheetsConfig {
    spreadsheet_id: Option<serde_yaml::Value>,
    sheet_name: Option<serde_yaml::Value>,
    pdf_url: Option<serde_yaml::Value>,
}

/// Render a scalar config value as text. Absent and `null` keys are missing.
fn scalar_key(
    value: Option<serde_yaml::Value>,
    key: &'static str,
    origin: &Path,
) -> Result<String, Pdf2SheetsError> {
    use serde_yaml::Value;

    match value {
        None | Some(Value::Null) => Err(Pdf2SheetsError::MissingConfigKey { key }),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(Pdf2SheetsError::ConfigParse {
            path: origin.to_path_buf(),
            detail: format!("'{key}' must be a string"),
        }),
    }
}

impl SheetsConfig {
    /// Create a new builder for `SheetsConfig`.
    pub fn builder() -> SheetsConfigBuilder {
        SheetsConfigBuilder::default()
    }

    /// Parse a config from YAML text.
    ///
    /// `origin` is only used in error messages.
    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self, Pdf2SheetsError> {
        let raw: RawSheetsConfig =
            serde_yaml::from_str(yaml).map_err(|e| Pdf2SheetsError::ConfigParse {
                path: origin.to_path_buf(),
                detail: e.to_string(),
            })?;

        let spreadsheet_id = scalar_key(raw.spreadsheet_id, "spreadsheet_id", origin)?;
        let sheet_name = scalar_key(raw.sheet_name, "sheet_name", origin)?;
        let pdf_url = scalar_key(raw.pdf_url, "pdf_url", origin)?;

        Self::builder()
            .spreadsheet_id(spreadsheet_id)
            .sheet_name(sheet_name)
            .pdf_url(pdf_url)
            .build()
    }

    /// The A1 anchor every run writes to: `"<sheet_name>!A1"`.
    pub fn target_range(&self) -> String {
        format!("{}!A1", self.sheet_name)
    }
}

/// Load and validate the YAML config at `path`.
pub async fn load_config(path: impl AsRef<Path>) -> Result<SheetsConfig, Pdf2SheetsError> {
    let path = path.as_ref();
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Pdf2SheetsError::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => Pdf2SheetsError::ConfigParse {
                path: path.to_path_buf(),
                detail: e.to_string(),
            },
        })?;

    let config = SheetsConfig::from_yaml_str(&yaml, path)?;
    debug!(
        "Loaded config from {}: sheet '{}' in spreadsheet {}",
        path.display(),
        config.sheet_name,
        config.spreadsheet_id
    );
    Ok(config)
}

/// Builder for [`SheetsConfig`].
#[derive(Debug, Default)]
pub struct SheetsConfigBuilder {
    spreadsheet_id: String,
    sheet_name: String,
    pdf_url: String,
}

impl SheetsConfigBuilder {
    pub fn spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.spreadsheet_id = id.into();
        self
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SheetsConfig, Pdf2SheetsError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(Pdf2SheetsError::InvalidConfig(
                "spreadsheet_id must not be empty".into(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(Pdf2SheetsError::InvalidConfig(
                "sheet_name must not be empty".into(),
            ));
        }
        if !is_url(&self.pdf_url) {
            return Err(Pdf2SheetsError::InvalidConfig(format!(
                "pdf_url must be an HTTP/HTTPS URL, got '{}'",
                self.pdf_url
            )));
        }
        Ok(SheetsConfig {
            spreadsheet_id: self.spreadsheet_id,
            sheet_name: self.sheet_name,
            pdf_url: self.pdf_url,
        })
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Local files a run reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// YAML config file.
    pub config: PathBuf,
    /// OAuth client secret, needed only for the first interactive authorization.
    pub client_secret: PathBuf,
    /// Persisted authorized-user credential, rewritten after every refresh.
    pub token: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            client_secret: PathBuf::from(DEFAULT_CLIENT_SECRET_PATH),
            token: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}
