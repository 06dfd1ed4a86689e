//! Persistence of the authorized-user credential.

use super::credential::Credential;
use crate::error::Pdf2SheetsError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Somewhere a credential survives between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<Credential>, Pdf2SheetsError>;

    /// Replace the stored credential.
    async fn save(&self, credential: &Credential) -> Result<(), Pdf2SheetsError>;
}

/// A JSON file such as `token.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, Pdf2SheetsError> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Pdf2SheetsError::auth(format!(
                    "cannot read '{}': {e}",
                    self.path.display()
                )))
            }
        };

        let credential = Credential::from_json(&json).map_err(|e| {
            Pdf2SheetsError::auth(format!("'{}' is not a credential: {e}", self.path.display()))
        })?;
        debug!("Loaded credential from {}", self.path.display());
        Ok(Some(credential))
    }

    /// Atomic write: temp file next to the target, then rename.
    async fn save(&self, credential: &Credential) -> Result<(), Pdf2SheetsError> {
        let json = credential
            .to_json()
            .map_err(|e| Pdf2SheetsError::Internal(format!("credential serialisation: {e}")))?;

        let write_err = |source| Pdf2SheetsError::CredentialWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        debug!("Saved credential to {}", self.path.display());
        Ok(())
    }
}
