//! Client-side cache of patients and diagnoses, changed only through [`Action`]s.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::model::{Diagnosis, Patient};

/// Snapshot of everything the client has loaded so far.
///
/// Patients sit behind `Rc` so that a transition touching one record leaves the
/// others pointer-equal to the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    patients: BTreeMap<String, Rc<Patient>>,
    diagnoses: Rc<BTreeMap<String, Diagnosis>>,
    patient_list_loaded: bool,
}

impl State {
    pub fn patient(&self, id: &str) -> Option<&Rc<Patient>> {
        self.patients.get(id)
    }

    /// Patients ordered by id.
    pub fn patients(&self) -> impl Iterator<Item = &Rc<Patient>> {
        self.patients.values()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    pub fn diagnosis(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.get(code)
    }

    /// Diagnoses ordered by code.
    pub fn diagnoses(&self) -> impl Iterator<Item = &Diagnosis> {
        self.diagnoses.values()
    }

    /// Whether the bulk patient list has been received at least once.
    pub fn patient_list_loaded(&self) -> bool {
        self.patient_list_loaded
    }
}

/// The closed set of state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPatientList(Vec<Patient>),
    SetDiagnosisList(Vec<Diagnosis>),
    AddPatient(Patient),
    UpdatePatient(Patient),
}

impl Action {
    pub fn set_patient_list(patients: Vec<Patient>) -> Self {
        Action::SetPatientList(patients)
    }

    pub fn set_diagnosis_list(diagnoses: Vec<Diagnosis>) -> Self {
        Action::SetDiagnosisList(diagnoses)
    }

    pub fn add_patient(patient: Patient) -> Self {
        Action::AddPatient(patient)
    }

    pub fn update_patient(patient: Patient) -> Self {
        Action::UpdatePatient(patient)
    }

    fn name(&self) -> &'static str {
        match self {
            Action::SetPatientList(_) => "set_patient_list",
            Action::SetDiagnosisList(_) => "set_diagnosis_list",
            Action::AddPatient(_) => "add_patient",
            Action::UpdatePatient(_) => "update_patient",
        }
    }
}

/// Applies `action` to `state` and returns the next snapshot.
///
/// The input is never mutated. When nothing changes the same `Rc` is returned,
/// so `Rc::ptr_eq(&before, &after)` tells callers they can skip a re-render.
pub fn reduce(state: Rc<State>, action: Action) -> Rc<State> {
    match action {
        Action::SetPatientList(incoming) => {
            let fresh: Vec<Patient> = incoming
                .into_iter()
                .filter(|patient| !state.patients.contains_key(&patient.id))
                .map(Patient::into_summary)
                .collect();
            if fresh.is_empty() && state.patient_list_loaded {
                return state;
            }

            let mut next = (*state).clone();
            for patient in fresh {
                // First occurrence wins within one batch as well.
                next.patients
                    .entry(patient.id.clone())
                    .or_insert_with(|| Rc::new(patient));
            }
            next.patient_list_loaded = true;
            Rc::new(next)
        }
        Action::SetDiagnosisList(diagnoses) => {
            let mut next = (*state).clone();
            next.diagnoses = Rc::new(
                diagnoses
                    .into_iter()
                    .map(|diagnosis| (diagnosis.code.clone(), diagnosis))
                    .collect(),
            );
            Rc::new(next)
        }
        Action::AddPatient(patient) => {
            let mut next = (*state).clone();
            next.patients.insert(patient.id.clone(), Rc::new(patient));
            Rc::new(next)
        }
        Action::UpdatePatient(patient) => {
            if !state.patients.contains_key(&patient.id) {
                tracing::debug!(patient_id = %patient.id, "ignoring update for patient not in cache");
                return state;
            }
            let mut next = (*state).clone();
            next.patients.insert(patient.id.clone(), Rc::new(patient));
            Rc::new(next)
        }
    }
}

/// Owner of the current snapshot for callers without a UI framework.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Rc<State>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Rc<State> {
        Rc::clone(&self.state)
    }

    /// Runs the reducer and reports whether the snapshot changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let next = reduce(Rc::clone(&self.state), action);
        let changed = !Rc::ptr_eq(&self.state, &next);
        tracing::debug!(action = name, changed, "dispatched");
        self.state = next;
        changed
    }
}
