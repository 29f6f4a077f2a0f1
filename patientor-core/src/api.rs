//! Seam to the remote patient API.

use async_trait::async_trait;

use crate::model::{Diagnosis, EntryDraft, Patient};

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable part of the failure, shown to the user as-is.
    pub fn display_detail(&self) -> &str {
        match self {
            ApiError::Transport(detail)
            | ApiError::Rejected { detail, .. }
            | ApiError::Decode(detail) => detail,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The four endpoints the client consumes.
///
/// Futures are not `Send`: everything runs on one event loop, and the browser
/// fetch client cannot be moved across threads anyway.
#[async_trait(?Send)]
pub trait PatientApi {
    /// `GET /patients`
    async fn list_patients(&self) -> ApiResult<Vec<Patient>>;
    /// `GET /patients/{id}`
    async fn fetch_patient(&self, id: &str) -> ApiResult<Patient>;
    /// `GET /diagnoses`
    async fn list_diagnoses(&self) -> ApiResult<Vec<Diagnosis>>;
    /// `POST /patients/{id}/entries`
    async fn add_entry(&self, patient_id: &str, draft: &EntryDraft) -> ApiResult<Patient>;
}
