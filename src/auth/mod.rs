//! OAuth2 credentials for the Sheets API.
//!
//! The pipeline only asks [`CredentialManager::get_valid_credential`] for a
//! usable token. Behind it three capabilities do the work, each swappable
//! for tests:
//!
//! | Capability | Production impl | Job |
//! |------------|-----------------|-----|
//! | [`CredentialStore`]   | [`FileCredentialStore`] | load/save `token.json` |
//! | [`TokenRefresher`]    | [`OAuthRefresher`]      | refresh-token grant |
//! | [`AuthorizationFlow`] | [`InstalledAppFlow`]    | first-run browser consent |
//!
//! Decision order: a stored, unexpired token is used as-is; an expired one
//! with a refresh token is refreshed; anything else (no file, unreadable
//! file, no refresh token) goes through the interactive flow. Every new
//! token is written back to the store before it is returned.

mod credential;
mod flow;
mod refresh;
mod store;

pub use credential::{Credential, GOOGLE_TOKEN_URI, SHEETS_SCOPE};
pub use flow::{AuthorizationFlow, InstalledAppFlow};
pub use refresh::{OAuthRefresher, TokenRefresher};
pub use store::{CredentialStore, FileCredentialStore};

use crate::config::RunPaths;
use crate::error::Pdf2SheetsError;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Produces a valid credential, refreshing or authorizing as needed.
pub struct CredentialManager {
    store: Box<dyn CredentialStore>,
    refresher: Box<dyn TokenRefresher>,
    flow: Box<dyn AuthorizationFlow>,
    scopes: Vec<String>,
}

impl CredentialManager {
    pub fn new(
        store: Box<dyn CredentialStore>,
        refresher: Box<dyn TokenRefresher>,
        flow: Box<dyn AuthorizationFlow>,
    ) -> Self {
        Self {
            store,
            refresher,
            flow,
            scopes: vec![SHEETS_SCOPE.to_string()],
        }
    }

    /// The production wiring: `token.json`, HTTP refresh, installed-app flow.
    pub fn from_paths(paths: &RunPaths) -> Self {
        Self::new(
            Box::new(FileCredentialStore::new(&paths.token)),
            Box::new(OAuthRefresher::default()),
            Box::new(InstalledAppFlow::new(&paths.client_secret)),
        )
    }

    pub async fn get_valid_credential(&self) -> Result<Credential, Pdf2SheetsError> {
        self.get_valid_credential_at(Utc::now()).await
    }

    /// [`Self::get_valid_credential`] with an explicit clock.
    pub async fn get_valid_credential_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Credential, Pdf2SheetsError> {
        let stored = match self.store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring stored credential: {}", e);
                None
            }
        };

        match stored {
            Some(credential)
                if credential.is_valid_at(now)
                    || (credential.is_expired_at(now) && credential.can_refresh()) =>
            {
                self.refresh_if_needed(credential, now).await
            }
            _ => {
                let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
                let credential = self.flow.authorize(&scopes).await?;
                self.store.save(&credential).await?;
                info!("Authorization complete; credential saved");
                Ok(credential)
            }
        }
    }

    /// Return `credential` unchanged while valid; otherwise refresh it and
    /// persist the result. Never falls back to the interactive flow.
    pub async fn refresh_if_needed(
        &self,
        credential: Credential,
        now: DateTime<Utc>,
    ) -> Result<Credential, Pdf2SheetsError> {
        if credential.is_valid_at(now) {
            debug!("Stored credential is valid");
            return Ok(credential);
        }
        if !credential.can_refresh() {
            return Err(Pdf2SheetsError::auth(
                "credential expired and has no refresh token",
            ));
        }

        let refreshed = self.refresher.refresh(&credential).await?;
        self.store.save(&refreshed).await?;
        info!("Access token refreshed; credential saved");
        Ok(refreshed)
    }
}
