//! Bearer token acquisition for the FHIR service
//!
//! The upstream requires a bearer token obtained from a separate
//! token-issuing endpoint via a client-credentials request. The token
//! request carries its own explicit timeout and its failure is fatal for
//! the whole sync cycle. Tokens are cached until shortly before expiry.

use crate::config::FhirConfig;
use crate::domain::{CareSyncError, FhirError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Refresh margin so a token is never used right at its expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Client-credentials token provider with in-memory caching
pub struct TokenProvider {
    client: Client,
    token_url: String,
    client_id: String,
    authorization: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider from the FHIR configuration
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(config.token_timeout_seconds))
            .build()
            .map_err(|e| {
                CareSyncError::Fhir(FhirError::ConnectionFailed(format!(
                    "Failed to build token HTTP client: {e}"
                )))
            })?;

        let credentials = format!(
            "{}:{}",
            config.client_id,
            config.client_secret.expose_secret().as_ref()
        );
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());

        Ok(Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            authorization: format!("Basic {encoded}"),
            cached: Mutex::new(None),
        })
    }

    /// Current bearer token, fetching a fresh one when the cache is
    /// empty or stale
    ///
    /// # Errors
    ///
    /// Token acquisition failure is propagated; callers treat it as fatal.
    pub async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!(client_id = %self.client_id, "Requesting bearer token");

        let response = self
            .client
            .post(&self.token_url)
            .header("Authorization", &self.authorization)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    FhirError::Timeout(format!("Token request timed out: {e}"))
                } else {
                    FhirError::AuthenticationFailed(format!("Token request failed: {e}"))
                };
                CareSyncError::Fhir(message)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CareSyncError::Fhir(FhirError::AuthenticationFailed(
                format!("Token endpoint returned {status}: {body}"),
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            CareSyncError::Fhir(FhirError::AuthenticationFailed(format!(
                "Invalid token response: {e}"
            )))
        })?;

        let expires_at =
            Utc::now() + Duration::seconds((token.expires_in - EXPIRY_MARGIN_SECS).max(0));

        tracing::info!(expires_at = %expires_at, "Acquired bearer token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn test_config(token_url: String) -> FhirConfig {
        FhirConfig {
            base_url: "https://fhir.example.com/api".to_string(),
            token_url,
            client_id: "caresync".to_string(),
            client_secret: secret_string("s3cret".to_string()),
            timeout_seconds: 30,
            token_timeout_seconds: 5,
            page_size: 100,
            max_records: 500,
            id_batch_size: 50,
            tls_verify: true,
        }
    }

    #[tokio::test]
    async fn test_token_fetched_and_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "abc123", "expires_in": 3600}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = TokenProvider::new(&test_config(format!("{}/token", server.url()))).unwrap();

        let first = provider.bearer_token().await.unwrap();
        let second = provider.bearer_token().await.unwrap();
        assert_eq!(first, "abc123");
        assert_eq!(second, "abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_failure_is_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let provider = TokenProvider::new(&test_config(format!("{}/token", server.url()))).unwrap();

        let err = provider.bearer_token().await.unwrap_err();
        assert!(matches!(
            err,
            CareSyncError::Fhir(FhirError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_token_body_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = TokenProvider::new(&test_config(format!("{}/token", server.url()))).unwrap();
        assert!(provider.bearer_token().await.is_err());
    }
}
