//! HTTP implementation of [`PatientApi`] on top of `reqwest`.
//!
//! Works natively and on `wasm32`, where `reqwest` goes through the browser
//! fetch API.

mod config;

pub use config::{ClientConfig, ConfigError, DEFAULT_API_BASE_URL};

use async_trait::async_trait;
use patientor_core::{ApiError, ApiResult, Diagnosis, EntryDraft, Patient, PatientApi};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpPatientApi {
    client: Client,
    config: ClientConfig,
}

impl HttpPatientApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        decode(response).await
    }
}

impl Default for HttpPatientApi {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[async_trait(?Send)]
impl PatientApi for HttpPatientApi {
    async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        let url = self.config.endpoint("patients");
        tracing::debug!(%url, "GET patient list");
        let patients: Vec<Patient> = self.send(self.client.get(url)).await?;
        Ok(patients.into_iter().map(Patient::into_summary).collect())
    }

    async fn fetch_patient(&self, id: &str) -> ApiResult<Patient> {
        let url = self.config.endpoint(&format!("patients/{id}"));
        tracing::debug!(%url, "GET patient");
        self.send(self.client.get(url)).await
    }

    async fn list_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
        let url = self.config.endpoint("diagnoses");
        tracing::debug!(%url, "GET diagnoses");
        self.send(self.client.get(url)).await
    }

    async fn add_entry(&self, patient_id: &str, draft: &EntryDraft) -> ApiResult<Patient> {
        let url = self.config.endpoint(&format!("patients/{patient_id}/entries"));
        tracing::debug!(%url, entry_type = draft.entry_type().as_str(), "POST entry");
        self.send(self.client.post(url).json(draft)).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }

    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Pulls the human-readable message out of an error body.
///
/// Servers answer with a bare string, a JSON string, or an object carrying the
/// message under `data` or `error`. Anything else is passed through unchanged.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(map)) => ["data", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_body_is_kept_verbatim() {
        assert_eq!(
            error_detail("Incorrect or missing date: 2021-13-45 "),
            "Incorrect or missing date: 2021-13-45 "
        );
    }

    #[test]
    fn json_string_body_is_unquoted() {
        assert_eq!(error_detail("\"Malformatted id\""), "Malformatted id");
    }

    #[test]
    fn object_body_prefers_data_then_error() {
        assert_eq!(
            error_detail(r#"{"data":"Missing specialist","error":"ignored"}"#),
            "Missing specialist"
        );
        assert_eq!(error_detail(r#"{"error":"unknown endpoint"}"#), "unknown endpoint");
        assert_eq!(error_detail(r#"{"status":500}"#), r#"{"status":500}"#);
    }

    #[test]
    fn api_uses_configured_base() {
        let api = HttpPatientApi::new(ClientConfig::new("http://10.0.0.5:3001/api/").expect("url"));
        assert_eq!(api.config().api_base_url(), "http://10.0.0.5:3001/api");
        assert_eq!(
            HttpPatientApi::default().config().api_base_url(),
            DEFAULT_API_BASE_URL
        );
    }
}
