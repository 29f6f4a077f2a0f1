//! Patient detail page logic: when to fetch, what to show, how to submit.

mod render;

pub use render::{
    diagnosis_lines, render_entry, render_patient, EntryView, PatientView, RatingView,
};

use crate::api::{ApiError, PatientApi};
use crate::form::EntryFormState;
use crate::model::{EntryDraft, Patient};
use crate::state::{Action, State, Store};

/// Load progress of the mounted patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailPhase {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    /// The detail fetch failed; cached data keeps rendering and no retry happens.
    Failed,
}

/// What the page should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// The bulk patient list has not arrived and the id is not cached.
    Loading,
    /// The list has arrived and does not contain the id.
    NotFound,
    Patient(PatientView),
}

/// Whether a detail fetch is needed for `id`.
///
/// True for a cached summary, and for an absent id while the bulk list is still
/// pending. Absent after the list arrived is terminal.
pub fn should_fetch(state: &State, id: &str) -> bool {
    match state.patient(id) {
        Some(patient) => patient.is_summary(),
        None => !state.patient_list_loaded(),
    }
}

/// State machine for one mounted patient view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDetail {
    patient_id: String,
    phase: DetailPhase,
}

impl PatientDetail {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            phase: DetailPhase::Unloaded,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    /// Navigating to another patient starts over.
    pub fn set_patient_id(&mut self, patient_id: &str) {
        if self.patient_id != patient_id {
            self.patient_id = patient_id.to_string();
            self.phase = DetailPhase::Unloaded;
        }
    }

    /// Called on mount and on id change. Returns the id to fetch, at most once
    /// per mounted id.
    pub fn begin_load(&mut self, state: &State) -> Option<String> {
        if self.phase != DetailPhase::Unloaded {
            return None;
        }
        if should_fetch(state, &self.patient_id) {
            tracing::debug!(patient_id = %self.patient_id, "fetching patient detail");
            self.phase = DetailPhase::Loading;
            Some(self.patient_id.clone())
        } else {
            if state.patient(&self.patient_id).is_some() {
                self.phase = DetailPhase::Loaded;
            }
            None
        }
    }

    /// Applies the outcome of the detail fetch for `requested_id`.
    ///
    /// A response for an id other than the mounted one still produces its
    /// id-keyed action but leaves this view's phase alone.
    pub fn finish_load(
        &mut self,
        state: &State,
        requested_id: &str,
        result: Result<Patient, ApiError>,
    ) -> Option<Action> {
        let current = requested_id == self.patient_id && self.phase == DetailPhase::Loading;
        match result {
            Ok(patient) => {
                if current {
                    self.phase = DetailPhase::Loaded;
                }
                let patient = patient.into_full();
                if state.patient(&patient.id).is_some() {
                    Some(Action::update_patient(patient))
                } else {
                    Some(Action::add_patient(patient))
                }
            }
            Err(err) => {
                tracing::warn!(patient_id = %requested_id, error = %err, "patient detail fetch failed");
                if current {
                    self.phase = DetailPhase::Failed;
                }
                None
            }
        }
    }

    pub fn view(&self, state: &State) -> DetailView {
        match state.patient(&self.patient_id) {
            Some(patient) => DetailView::Patient(render_patient(patient, state)),
            None if state.patient_list_loaded() => DetailView::NotFound,
            None => DetailView::Loading,
        }
    }

    /// Runs the whole load against `api`, dispatching into `store`.
    pub async fn load<A: PatientApi + ?Sized>(&mut self, api: &A, store: &mut Store) {
        let Some(id) = self.begin_load(&store.state()) else {
            return;
        };
        let result = api.fetch_patient(&id).await;
        if let Some(action) = self.finish_load(&store.state(), &id, result) {
            store.dispatch(action);
        }
    }
}

/// Result of one entry submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The full patient returned by the server.
    Accepted(Patient),
    /// Message for the form's error slot.
    Rejected(String),
}

impl SubmitOutcome {
    /// Feeds the outcome into the form and returns the action to dispatch, if any.
    pub fn apply(self, form: &mut EntryFormState) -> Option<Action> {
        match self {
            SubmitOutcome::Accepted(patient) => {
                form.complete_submission();
                Some(Action::update_patient(patient))
            }
            SubmitOutcome::Rejected(message) => {
                form.fail_submission(message);
                None
            }
        }
    }
}

/// Text shown in the form when a submission fails.
pub fn submission_message(err: &ApiError) -> String {
    format!("Error: {}", err.display_detail())
}

/// Sends `draft` once for `patient_id`. No retries.
pub async fn submit_entry<A: PatientApi + ?Sized>(
    api: &A,
    patient_id: &str,
    draft: &EntryDraft,
) -> SubmitOutcome {
    match api.add_entry(patient_id, draft).await {
        Ok(patient) => {
            tracing::debug!(patient_id, entries = patient.entries.len(), "entry accepted");
            SubmitOutcome::Accepted(patient)
        }
        Err(err) => {
            tracing::warn!(patient_id, error = %err, "entry submission failed");
            SubmitOutcome::Rejected(submission_message(&err))
        }
    }
}

/// Loads diagnoses and the patient list concurrently and hands the resulting
/// actions to `dispatch`. The two loads target disjoint parts of the state, so
/// their order does not matter; a failed load is logged and skipped.
pub async fn bootstrap<A, F>(api: &A, mut dispatch: F)
where
    A: PatientApi + ?Sized,
    F: FnMut(Action),
{
    let (diagnoses, patients) = futures::join!(api.list_diagnoses(), api.list_patients());

    match diagnoses {
        Ok(diagnoses) => dispatch(Action::set_diagnosis_list(diagnoses)),
        Err(err) => tracing::error!(error = %err, "loading diagnoses failed"),
    }
    match patients {
        Ok(patients) => dispatch(Action::set_patient_list(patients)),
        Err(err) => tracing::error!(error = %err, "loading patient list failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use async_trait::async_trait;

    use super::*;
    use crate::api::ApiResult;
    use crate::form::FormField;
    use crate::model::{BaseEntry, Diagnosis, Discharge, Entry, EntryType, Gender, HospitalEntry};

    #[derive(Default)]
    struct FakeApi {
        patients: Vec<Patient>,
        detail: Option<Patient>,
        reject_with: Option<ApiError>,
        fetches: Cell<usize>,
        submitted: RefCell<Vec<(String, EntryDraft)>>,
    }

    #[async_trait(?Send)]
    impl PatientApi for FakeApi {
        async fn list_patients(&self) -> ApiResult<Vec<Patient>> {
            Ok(self.patients.clone())
        }

        async fn fetch_patient(&self, id: &str) -> ApiResult<Patient> {
            self.fetches.set(self.fetches.get() + 1);
            match &self.detail {
                Some(patient) if patient.id == id => Ok(patient.clone()),
                _ => Err(ApiError::Rejected {
                    status: 404,
                    detail: format!("no patient {id}"),
                }),
            }
        }

        async fn list_diagnoses(&self) -> ApiResult<Vec<Diagnosis>> {
            Err(ApiError::Transport("connection refused".to_string()))
        }

        async fn add_entry(&self, patient_id: &str, draft: &EntryDraft) -> ApiResult<Patient> {
            self.submitted
                .borrow_mut()
                .push((patient_id.to_string(), draft.clone()));
            if let Some(err) = &self.reject_with {
                return Err(err.clone());
            }
            let mut patient = self.detail.clone().ok_or(ApiError::Rejected {
                status: 400,
                detail: "unknown patient".to_string(),
            })?;
            patient.entries.push(Entry::Hospital(HospitalEntry {
                base: BaseEntry {
                    id: "server-assigned".to_string(),
                    date: draft.base().date.clone(),
                    description: draft.base().description.clone(),
                    specialist: draft.base().specialist.clone(),
                    diagnosis_codes: None,
                },
                discharge: Discharge::default(),
            }));
            Ok(patient)
        }
    }

    fn summary(id: &str) -> Patient {
        Patient {
            id: id.to_string(),
            name: "Martin Riggs".to_string(),
            occupation: "Cop".to_string(),
            gender: Gender::Male,
            ssn: None,
            date_of_birth: None,
            entries: Vec::new(),
            public_patient: Some(true),
        }
    }

    fn full(id: &str) -> Patient {
        let mut patient = summary(id);
        patient.public_patient = None;
        patient.entries.push(Entry::Hospital(HospitalEntry {
            base: BaseEntry {
                id: "e1".to_string(),
                date: "2015-01-02".to_string(),
                description: "Dislocated thumb".to_string(),
                specialist: "MD House".to_string(),
                diagnosis_codes: None,
            },
            discharge: Discharge {
                date: "2015-01-16".to_string(),
                criteria: "Thumb has healed.".to_string(),
            },
        }));
        patient
    }

    fn store_with_list(patients: Vec<Patient>) -> Store {
        let mut store = Store::new();
        store.dispatch(Action::set_patient_list(patients));
        store
    }

    #[tokio::test(flavor = "current_thread")]
    async fn summary_patient_is_fetched_once_and_becomes_full() {
        let api = FakeApi {
            detail: Some(full("p1")),
            ..FakeApi::default()
        };
        let mut store = store_with_list(vec![summary("p1")]);
        let mut detail = PatientDetail::new("p1");

        detail.load(&api, &mut store).await;
        detail.load(&api, &mut store).await;

        assert_eq!(api.fetches.get(), 1);
        assert_eq!(detail.phase(), DetailPhase::Loaded);
        let state = store.state();
        let cached = state.patient("p1").expect("cached");
        assert_eq!(cached.public_patient, Some(false));
        assert_eq!(cached.entries.len(), 1);
        let DetailView::Patient(view) = detail.view(&state) else {
            panic!("expected patient view");
        };
        assert_eq!(view.entries.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn full_record_skips_fetch() {
        let api = FakeApi::default();
        let mut store = store_with_list(Vec::new());
        store.dispatch(Action::add_patient(full("p1").into_full()));
        let mut detail = PatientDetail::new("p1");

        detail.load(&api, &mut store).await;
        assert_eq!(api.fetches.get(), 0);
        assert_eq!(detail.phase(), DetailPhase::Loaded);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn fetch_failure_keeps_cached_summary() {
        let api = FakeApi::default();
        let mut store = store_with_list(vec![summary("p1")]);
        let before = store.state();
        let mut detail = PatientDetail::new("p1");

        detail.load(&api, &mut store).await;
        detail.load(&api, &mut store).await;

        assert_eq!(api.fetches.get(), 1);
        assert_eq!(detail.phase(), DetailPhase::Failed);
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
        let DetailView::Patient(view) = detail.view(&store.state()) else {
            panic!("summary should still render");
        };
        assert!(view.entries_pending);
    }

    #[test]
    fn missing_patient_after_list_is_not_found() {
        let store = store_with_list(vec![summary("p1")]);
        let mut detail = PatientDetail::new("p2");
        assert!(!should_fetch(&store.state(), "p2"));
        assert_eq!(detail.begin_load(&store.state()), None);
        assert_eq!(detail.view(&store.state()), DetailView::NotFound);
    }

    #[test]
    fn list_record_without_flag_still_fetches_details() {
        let mut bare = summary("p1");
        bare.public_patient = None;
        let store = store_with_list(vec![bare]);
        let mut detail = PatientDetail::new("p1");

        assert!(should_fetch(&store.state(), "p1"));
        let DetailView::Patient(view) = detail.view(&store.state()) else {
            panic!("expected patient view");
        };
        assert!(view.entries_pending);
        assert_eq!(detail.begin_load(&store.state()).as_deref(), Some("p1"));
        assert_eq!(detail.phase(), DetailPhase::Loading);
    }

    #[test]
    fn pending_list_renders_loading() {
        let store = Store::new();
        let detail = PatientDetail::new("p1");
        assert!(should_fetch(&store.state(), "p1"));
        assert_eq!(detail.view(&store.state()), DetailView::Loading);
    }

    #[test]
    fn fetched_patient_is_inserted_before_list_arrives() {
        let mut store = Store::new();
        let mut detail = PatientDetail::new("p1");
        let id = detail.begin_load(&store.state()).expect("fetch");
        let action = detail.finish_load(&store.state(), &id, Ok(full("p1")));
        assert!(matches!(action, Some(Action::AddPatient(_))));
        store.dispatch(action.expect("action"));

        // A later list refresh keeps the full record.
        store.dispatch(Action::set_patient_list(vec![summary("p1")]));
        assert_eq!(
            store.state().patient("p1").and_then(|p| p.public_patient),
            Some(false)
        );
    }

    #[test]
    fn late_response_for_previous_id_leaves_phase_alone() {
        let store = store_with_list(vec![summary("p1"), summary("p2")]);
        let mut detail = PatientDetail::new("p1");
        let first = detail.begin_load(&store.state()).expect("fetch p1");
        detail.set_patient_id("p2");
        assert_eq!(detail.phase(), DetailPhase::Unloaded);
        assert_eq!(detail.begin_load(&store.state()).as_deref(), Some("p2"));

        let action = detail.finish_load(&store.state(), &first, Ok(full("p1")));
        assert!(matches!(action, Some(Action::UpdatePatient(ref p)) if p.id == "p1"));
        assert_eq!(detail.phase(), DetailPhase::Loading);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejected_submission_shows_error_and_keeps_input() {
        let api = FakeApi {
            detail: Some(full("p1")),
            reject_with: Some(ApiError::Rejected {
                status: 400,
                detail: "Incorrect or missing date: ".to_string(),
            }),
            ..FakeApi::default()
        };
        let mut store = store_with_list(vec![full("p1")]);
        let before = store.state();
        let mut form = EntryFormState::new();
        form.set_entry_type(EntryType::Hospital);
        form.set_text(FormField::Description, "Checkup");
        form.set_text(FormField::Date, "not a date");
        form.set_text(FormField::Specialist, "Dr Who");
        let values = form.values().clone();

        let draft = form.draft().expect("valid draft");
        let outcome = submit_entry(&api, "p1", &draft).await;
        if let Some(action) = outcome.apply(&mut form) {
            store.dispatch(action);
        }

        assert_eq!(form.error(), Some("Error: Incorrect or missing date: "));
        assert_eq!(form.values(), &values);
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
        assert_eq!(api.submitted.borrow().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn accepted_submission_updates_store_with_server_patient() {
        let api = FakeApi {
            detail: Some(full("p1")),
            ..FakeApi::default()
        };
        let mut store = store_with_list(vec![full("p1")]);
        let mut form = EntryFormState::new();
        form.set_text(FormField::Description, "Yearly control visit");
        form.set_text(FormField::Date, "2019-10-20");
        form.set_text(FormField::Specialist, "MD House");

        let draft = form.draft().expect("valid draft");
        let outcome = submit_entry(&api, "p1", &draft).await;
        let action = outcome.apply(&mut form).expect("update action");
        assert!(store.dispatch(action));

        let state = store.state();
        let cached = state.patient("p1").expect("cached");
        assert_eq!(cached.entries.len(), 2);
        assert_eq!(
            cached.entries[1].base().map(|b| b.id.as_str()),
            Some("server-assigned")
        );
        assert!(!form.is_dirty());
        assert_eq!(form.error(), None);
        assert_eq!(api.submitted.borrow()[0].0, "p1");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn bootstrap_survives_one_failed_load() {
        let api = FakeApi {
            patients: vec![summary("p1"), summary("p2")],
            ..FakeApi::default()
        };
        let mut store = Store::new();
        bootstrap(&api, |action| {
            store.dispatch(action);
        })
        .await;

        let state = store.state();
        assert!(state.patient_list_loaded());
        assert_eq!(state.patient_count(), 2);
        assert_eq!(state.diagnoses().count(), 0);
    }
}
