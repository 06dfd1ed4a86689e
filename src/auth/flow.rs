//! First-run interactive authorization.
//!
//! Delegates the installed-app flow to the `oauth2` module google-sheets4
//! re-exports (yup-oauth2): it prints the consent URL, listens for the
//! redirect on an ephemeral localhost port and exchanges the code. The
//! authenticator hands the resulting token to its storage hook, which
//! here just captures it so it can be persisted in our own
//! [`Credential`] format.

use super::credential::Credential;
use crate::error::Pdf2SheetsError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use google_sheets4::oauth2::storage::{TokenInfo, TokenStorage};
use google_sheets4::oauth2::{
    self, ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};

/// Obtains a brand-new credential, typically with user interaction.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    async fn authorize(&self, scopes: &[&str]) -> Result<Credential, Pdf2SheetsError>;
}

/// Browser consent + localhost redirect, configured by a client secret file.
#[derive(Debug, Clone)]
pub struct InstalledAppFlow {
    client_secret_path: PathBuf,
}

impl InstalledAppFlow {
    pub fn new(client_secret_path: impl Into<PathBuf>) -> Self {
        Self {
            client_secret_path: client_secret_path.into(),
        }
    }
}

#[async_trait]
impl AuthorizationFlow for InstalledAppFlow {
    async fn authorize(&self, scopes: &[&str]) -> Result<Credential, Pdf2SheetsError> {
        let secret = oauth2::read_application_secret(&self.client_secret_path)
            .await
            .map_err(|e| {
                Pdf2SheetsError::auth(format!(
                    "cannot read client secret '{}': {e}",
                    self.client_secret_path.display()
                ))
            })?;

        info!("Starting interactive authorization");
        let slot = Arc::new(Mutex::new(None));
        let authenticator =
            InstalledFlowAuthenticator::builder(secret.clone(), InstalledFlowReturnMethod::HTTPRedirect)
                .with_storage(Box::new(CapturedToken {
                    slot: Arc::clone(&slot),
                }))
                .build()
                .await
                .map_err(Pdf2SheetsError::auth)?;

        authenticator
            .token(scopes)
            .await
            .map_err(Pdf2SheetsError::auth)?;

        let info = slot
            .lock()
            .map_err(|_| Pdf2SheetsError::Internal("token slot poisoned".into()))?
            .take()
            .ok_or_else(|| Pdf2SheetsError::auth("authorization finished without a token"))?;

        Ok(credential_from_token(&secret, scopes, info))
    }
}

/// Storage hook that keeps the last token the authenticator produced.
struct CapturedToken {
    slot: Arc<Mutex<Option<TokenInfo>>>,
}

#[async_trait]
impl TokenStorage for CapturedToken {
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("token slot poisoned"))?;
        *slot = Some(token);
        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        None
    }
}

fn credential_from_token(secret: &ApplicationSecret, scopes: &[&str], info: TokenInfo) -> Credential {
    Credential {
        token: info.access_token,
        refresh_token: info.refresh_token,
        token_uri: secret.token_uri.clone(),
        client_id: secret.client_id.clone(),
        client_secret: secret.client_secret.clone(),
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        expiry: info
            .expires_at
            .and_then(|at| DateTime::<Utc>::from_timestamp(at.unix_timestamp(), 0)),
    }
}
