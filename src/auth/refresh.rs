//! Refresh-token grant against the credential's `token_uri`.

use super::credential::Credential;
use crate::error::Pdf2SheetsError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Return `credential` with a fresh access token and expiry.
    async fn refresh(&self, credential: &Credential) -> Result<Credential, Pdf2SheetsError>;
}

/// Standard OAuth2 `grant_type=refresh_token` over HTTP.
#[derive(Debug, Clone, Default)]
pub struct OAuthRefresher {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    /// Present only when the server rotates the refresh token.
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthRefresher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRefresher for OAuthRefresher {
    async fn refresh(&self, credential: &Credential) -> Result<Credential, Pdf2SheetsError> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| Pdf2SheetsError::auth("credential has no refresh token"))?;

        info!("Refreshing access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
        ];
        let response = self
            .client
            .post(&credential.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| Pdf2SheetsError::auth(format!("token refresh request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {desc}", err.error),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(Pdf2SheetsError::auth(format!(
                "token refresh rejected ({status}): {reason}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Pdf2SheetsError::auth(format!("malformed token response: {e}")))?;

        let mut refreshed = credential.clone();
        refreshed.token = Some(token.access_token);
        refreshed.expiry = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        if let Some(rotated) = token.refresh_token {
            refreshed.refresh_token = Some(rotated);
        }
        if let Some(scope) = token.scope {
            refreshed.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    fn expired(token_uri: String) -> Credential {
        Credential {
            token: Some("old".into()),
            refresh_token: Some("refresh-me".into()),
            token_uri,
            client_id: "cid".into(),
            client_secret: "csecret".into(),
            expiry: Some(Utc::now() - Duration::hours(1)),
            ..Credential::default()
        }
    }

    #[tokio::test]
    async fn refresh_replaces_token_and_expiry() {
        let body = br#"{"access_token":"new","expires_in":3599,"token_type":"Bearer"}"#;
        let (url, server) = serve_once(200, "application/json", body.to_vec()).await;

        let refreshed = OAuthRefresher::default()
            .refresh(&expired(url))
            .await
            .unwrap();

        assert_eq!(refreshed.access_token(), Some("new"));
        assert_eq!(refreshed.refresh_token.as_deref(), Some("refresh-me"));
        assert!(refreshed.is_valid_at(Utc::now()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST "), "got: {request}");
        assert!(request.contains("grant_type=refresh_token"), "got: {request}");
        assert!(request.contains("refresh_token=refresh-me"), "got: {request}");
    }

    #[tokio::test]
    async fn rotated_refresh_token_is_kept() {
        let body = br#"{"access_token":"new","expires_in":60,"refresh_token":"rotated"}"#;
        let (url, _server) = serve_once(200, "application/json", body.to_vec()).await;

        let refreshed = OAuthRefresher::default()
            .refresh(&expired(url))
            .await
            .unwrap();
        assert_eq!(refreshed.refresh_token.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn rejected_grant_is_an_auth_error() {
        let body = br#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#;
        let (url, _server) = serve_once(400, "application/json", body.to_vec()).await;

        let err = OAuthRefresher::default()
            .refresh(&expired(url))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Pdf2SheetsError::Auth { .. }));
        assert!(msg.contains("invalid_grant"), "got: {msg}");
    }

    #[tokio::test]
    async fn no_refresh_token_fails_without_network() {
        let credential = Credential {
            refresh_token: None,
            ..expired("http://127.0.0.1:9/unused".into())
        };
        let err = OAuthRefresher::default()
            .refresh(&credential)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no refresh token"));
    }
}
