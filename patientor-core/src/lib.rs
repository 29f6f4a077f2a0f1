//! Client-side core of the patient records viewer: domain types, the state
//! store, the add-entry form controller and the patient detail presenter.
//!
//! Nothing here renders markup or performs I/O directly; the network sits
//! behind [`PatientApi`] and UI frameworks drive the controllers.

pub mod api;
pub mod form;
pub mod model;
pub mod presenter;
pub mod state;

pub use api::{ApiError, ApiResult, PatientApi};
pub use form::{EntryFormState, EntryFormValues, FieldErrors, FormError, FormField};
pub use model::{
    BaseEntry, Diagnosis, Discharge, DraftBase, Entry, EntryDraft, EntryType, Gender,
    HealthCheckEntry, HealthCheckRating, HospitalEntry, OccupationalHealthcareEntry, Patient,
    SickLeave,
};
pub use presenter::{
    bootstrap, should_fetch, submit_entry, DetailPhase, DetailView, EntryView, PatientDetail,
    PatientView, SubmitOutcome,
};
pub use state::{reduce, Action, State, Store};
