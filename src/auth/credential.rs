//! The OAuth2 authorized-user credential and its expiry rules.
//!
//! Serialized in the same JSON shape Google's client libraries write to
//! `token.json`, so an existing token file keeps working. Unknown keys
//! (`universe_domain`, `account`) are ignored on read.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope needed to write values into any spreadsheet the user can edit.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Google's OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A token is treated as expired this long before its real expiry, so it
/// cannot lapse between the check and the API call.
fn refresh_threshold() -> Duration {
    Duration::seconds(3 * 60 + 45)
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// An OAuth2 token bundle for the installed-app flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer access token.
    #[serde(default)]
    pub token: Option<String>,
    /// Long-lived token used to mint new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// When `token` stops being accepted. `None` means no known expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            token: None,
            refresh_token: None,
            token_uri: default_token_uri(),
            client_id: String::new(),
            client_secret: String::new(),
            scopes: vec![SHEETS_SCOPE.to_string()],
            expiry: None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credential")
            .field("token", &redact(&self.token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl Credential {
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether the access token is past (or within the threshold of) its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| now >= expiry - refresh_threshold())
            .unwrap_or(false)
    }

    /// Whether the credential can be used as-is.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_expired_at(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
