//! FHIR search client with paginated and batched-by-id fetching
//!
//! Collection fetches walk the bundle's `next` link until the link is
//! absent or the configured record cap is reached. The next-page URL
//! already embeds the original filters, so follow-up requests never
//! re-apply query parameters. A failed page request during a collection
//! fetch is logged and treated as end-of-pagination; single-resource
//! fetches propagate failures to the caller.

use crate::adapters::fhir::token::TokenProvider;
use crate::config::FhirConfig;
use crate::core::transform::{transform_appointment, transform_patient, transform_practitioner};
use crate::domain::{
    Appointment, CareSyncError, DateWindow, FhirError, Nurse, NurseId, Patient, PatientId, Result,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Read side of the sync pipeline
///
/// The coordinator depends on this trait rather than the HTTP client so
/// tests can substitute a scripted gateway.
#[async_trait]
pub trait FhirGateway: Send + Sync {
    /// Fetch all appointments inside a date window (best-effort, capped)
    async fn fetch_appointments(&self, window: &DateWindow) -> Result<Vec<Appointment>>;

    /// Fetch the patients with the given ids, batched per request
    async fn fetch_patients_by_ids(&self, ids: &[PatientId]) -> Result<Vec<Patient>>;

    /// Fetch the nurses with the given ids, batched per request
    async fn fetch_nurses_by_ids(&self, ids: &[NurseId]) -> Result<Vec<Nurse>>;

    /// Fetch a single patient by id; failures are propagated
    async fn fetch_patient(&self, id: &PatientId) -> Result<Patient>;

    /// Fetch a single nurse by id; failures are propagated
    async fn fetch_nurse(&self, id: &NurseId) -> Result<Nurse>;
}

/// HTTP implementation of [`FhirGateway`]
pub struct FhirClient {
    client: Client,
    base_url: String,
    tokens: TokenProvider,
    page_size: usize,
    max_records: usize,
    id_batch_size: usize,
}

impl FhirClient {
    /// Create a client from the FHIR configuration
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            CareSyncError::Fhir(FhirError::ConnectionFailed(format!(
                "Failed to build HTTP client: {e}"
            )))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens: TokenProvider::new(config)?,
            page_size: config.page_size,
            max_records: config.max_records,
            id_batch_size: config.id_batch_size,
        })
    }

    /// Walk a paginated search, accumulating raw resources up to the cap
    ///
    /// Page-level request failures end the walk with a partial result;
    /// only token acquisition failure is propagated.
    async fn fetch_collection(
        &self,
        resource_type: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Value>> {
        let token = self.tokens.bearer_token().await?;

        let count = self.page_size.to_string();
        let mut params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        params.push(("_count", count.as_str()));
        let first_url =
            Url::parse_with_params(&format!("{}/{}", self.base_url, resource_type), &params)
                .map_err(|e| {
                    CareSyncError::Fhir(FhirError::InvalidResponse(format!(
                        "Failed to build search URL: {e}"
                    )))
                })?;

        let mut resources: Vec<Value> = Vec::new();
        let mut next_url = Some(first_url.to_string());
        let mut pages = 0usize;

        while let Some(url) = next_url.take() {
            let bundle = match self.fetch_page(&url, &token).await {
                Ok(bundle) => bundle,
                Err(e) => {
                    tracing::warn!(
                        resource_type,
                        url = %url,
                        error = %e,
                        "Page request failed, returning partial results"
                    );
                    break;
                }
            };
            pages += 1;

            if let Some(entries) = bundle.get("entry").and_then(Value::as_array) {
                for entry in entries {
                    if let Some(resource) = entry.get("resource") {
                        resources.push(resource.clone());
                        if resources.len() >= self.max_records {
                            break;
                        }
                    }
                }
            }

            if resources.len() >= self.max_records {
                tracing::info!(
                    resource_type,
                    cap = self.max_records,
                    "Record cap reached, stopping pagination"
                );
                break;
            }

            next_url = next_link(&bundle);
        }

        tracing::debug!(
            resource_type,
            pages,
            count = resources.len(),
            "Collection fetch finished"
        );

        Ok(resources)
    }

    /// Fetch a single resource by id; failures ARE propagated
    async fn fetch_resource(&self, resource_type: &str, id: &str) -> Result<Value> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/{}/{}", self.base_url, resource_type, id);
        self.fetch_page(&url, &token).await.map_err(|e| match e {
            CareSyncError::Fhir(FhirError::ClientError { status: 404, .. }) => {
                CareSyncError::Fhir(FhirError::ResourceNotFound(format!("{resource_type}/{id}")))
            }
            other => other,
        })
    }

    /// Issue one GET and parse the body, unwrapping string-encoded JSON
    async fn fetch_page(&self, url: &str, token: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/fhir+json")
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    FhirError::Timeout(e.to_string())
                } else {
                    FhirError::ConnectionFailed(e.to_string())
                };
                CareSyncError::Fhir(message)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            CareSyncError::Fhir(FhirError::InvalidResponse(format!(
                "Failed to read response body: {e}"
            )))
        })?;

        match status {
            StatusCode::OK => parse_fhir_body(&body),
            s if s.is_client_error() => Err(CareSyncError::Fhir(FhirError::ClientError {
                status: s.as_u16(),
                message: body,
            })),
            s => Err(CareSyncError::Fhir(FhirError::ServerError {
                status: s.as_u16(),
                message: body,
            })),
        }
    }

    /// Run a batched `_id` search over id chunks, sequentially
    async fn fetch_by_id_batches(&self, resource_type: &str, ids: &[&str]) -> Result<Vec<Value>> {
        let mut resources = Vec::new();
        for chunk in ids.chunks(self.id_batch_size) {
            let joined = chunk.join(",");
            let batch = self
                .fetch_collection(resource_type, &[("_id", joined)])
                .await?;
            resources.extend(batch);
        }
        Ok(resources)
    }
}

#[async_trait]
impl FhirGateway for FhirClient {
    async fn fetch_appointments(&self, window: &DateWindow) -> Result<Vec<Appointment>> {
        let resources = self
            .fetch_collection(
                "Appointment",
                &[("date", window.ge_param()), ("date", window.le_param())],
            )
            .await?;

        tracing::info!(count = resources.len(), "Fetched appointments");
        Ok(resources.iter().map(transform_appointment).collect())
    }

    async fn fetch_patients_by_ids(&self, ids: &[PatientId]) -> Result<Vec<Patient>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strs: Vec<&str> = ids.iter().map(PatientId::as_str).collect();
        let resources = self.fetch_by_id_batches("Patient", &id_strs).await?;

        tracing::info!(
            requested = ids.len(),
            fetched = resources.len(),
            "Fetched patients by id"
        );
        Ok(resources.iter().map(transform_patient).collect())
    }

    async fn fetch_nurses_by_ids(&self, ids: &[NurseId]) -> Result<Vec<Nurse>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strs: Vec<&str> = ids.iter().map(NurseId::as_str).collect();
        let resources = self.fetch_by_id_batches("Practitioner", &id_strs).await?;

        tracing::info!(
            requested = ids.len(),
            fetched = resources.len(),
            "Fetched nurses by id"
        );
        Ok(resources.iter().map(transform_practitioner).collect())
    }

    async fn fetch_patient(&self, id: &PatientId) -> Result<Patient> {
        let resource = self.fetch_resource("Patient", id.as_str()).await?;
        Ok(transform_patient(&resource))
    }

    async fn fetch_nurse(&self, id: &NurseId) -> Result<Nurse> {
        let resource = self.fetch_resource("Practitioner", id.as_str()).await?;
        Ok(transform_practitioner(&resource))
    }
}

/// Parse a response body that may be JSON or a JSON-encoded string
///
/// The upstream occasionally double-encodes bundles, delivering
/// `"{\"resourceType\":...}"`; a string value is parsed a second time.
fn parse_fhir_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        CareSyncError::Fhir(FhirError::InvalidResponse(format!("Invalid JSON: {e}")))
    })?;

    match value {
        Value::String(inner) => serde_json::from_str(&inner).map_err(|e| {
            CareSyncError::Fhir(FhirError::InvalidResponse(format!(
                "Invalid string-encoded JSON: {e}"
            )))
        }),
        parsed => Ok(parsed),
    }
}

/// Full URL of the bundle's `next` link, if any
fn next_link(bundle: &Value) -> Option<String> {
    bundle
        .get("link")
        .and_then(Value::as_array)?
        .iter()
        .find(|link| link.get("relation").and_then(Value::as_str) == Some("next"))
        .and_then(|link| link.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fhir_body_plain_json() {
        let parsed = parse_fhir_body(r#"{"resourceType": "Bundle"}"#).unwrap();
        assert_eq!(parsed["resourceType"], "Bundle");
    }

    #[test]
    fn test_parse_fhir_body_string_encoded() {
        let body = serde_json::to_string(&json!({"resourceType": "Bundle"}).to_string()).unwrap();
        let parsed = parse_fhir_body(&body).unwrap();
        assert_eq!(parsed["resourceType"], "Bundle");
    }

    #[test]
    fn test_parse_fhir_body_invalid() {
        assert!(parse_fhir_body("not json at all").is_err());
    }

    #[test]
    fn test_next_link_found() {
        let bundle = json!({"link": [
            {"relation": "self", "url": "https://fhir/Appointment?page=1"},
            {"relation": "next", "url": "https://fhir/Appointment?page=2"}
        ]});
        assert_eq!(
            next_link(&bundle),
            Some("https://fhir/Appointment?page=2".to_string())
        );
    }

    #[test]
    fn test_next_link_absent() {
        assert_eq!(next_link(&json!({"link": [{"relation": "self", "url": "x"}]})), None);
        assert_eq!(next_link(&json!({})), None);
    }
}
