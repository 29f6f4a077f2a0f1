use std::fs;
use std::rc::Rc;

use patientor_core::{
    reduce, Action, DetailView, Diagnosis, Entry, EntryFormState, EntryType, FormField,
    HealthCheckRating, Patient, PatientDetail, State,
};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture should be readable")
}

fn loaded_state() -> Rc<State> {
    let patients: Vec<Patient> =
        serde_json::from_str(&read_fixture("patient_list.json")).expect("patient list");
    let diagnoses: Vec<Diagnosis> =
        serde_json::from_str(&read_fixture("diagnoses.json")).expect("diagnoses");

    let state = reduce(Rc::new(State::default()), Action::set_diagnosis_list(diagnoses));
    reduce(state, Action::set_patient_list(patients))
}

#[test]
fn patient_list_decodes_as_summaries() {
    let state = loaded_state();
    assert_eq!(state.patient_count(), 3);
    assert!(state.patients().all(|patient| patient.is_summary()));
    assert!(state.patients().all(|patient| patient.entries.is_empty()));
}

#[test]
fn list_without_public_flag_is_still_summary() {
    let patients: Vec<Patient> =
        serde_json::from_str(&read_fixture("patient_list_unflagged.json")).expect("patient list");
    assert!(patients.iter().all(|patient| patient.public_patient.is_none()));

    let state = reduce(Rc::new(State::default()), Action::set_patient_list(patients));
    assert!(state.patients().all(|patient| patient.is_summary()));

    let mut view = PatientDetail::new("d2773598-f723-11e9-8f0b-362b9e155667");
    assert_eq!(
        view.begin_load(&state).as_deref(),
        Some("d2773598-f723-11e9-8f0b-362b9e155667")
    );
}

#[test]
fn detail_fixture_renders_known_entries_only() {
    let detail: Patient =
        serde_json::from_str(&read_fixture("patient_detail.json")).expect("patient detail");
    assert_eq!(detail.entries.len(), 4);
    assert_eq!(detail.entries[3], Entry::Unknown);

    let state = loaded_state();
    let mut view = PatientDetail::new(detail.id.clone());
    let fetch = view.begin_load(&state).expect("summary should be fetched");
    let action = view
        .finish_load(&state, &fetch, Ok(detail))
        .expect("update action");
    let state = reduce(state, action);

    let DetailView::Patient(page) = view.view(&state) else {
        panic!("expected a patient page");
    };
    let kinds: Vec<&str> = page.entries.iter().map(|entry| entry.kind_label).collect();
    assert_eq!(kinds, vec!["Hospital", "Occupational", "Health check"]);
    assert_eq!(
        page.entries[0].diagnosis_lines,
        vec!["S62.5: Fracture of thumb (Fractura [ossis/ossium] pollicis)"]
    );
    assert_eq!(
        page.entries[1].diagnosis_lines,
        vec![
            "Z57.1: Occupational exposure to radiation",
            "Z74.3: Need for continuous supervision",
            "M51.2: Other specified intervertebral disc displacement (Alia dislocatio disci intervertebralis specificata)",
        ]
    );
    assert_eq!(
        page.entries[2].rating.map(|rating| rating.rating),
        Some(HealthCheckRating::LowRisk)
    );
}

#[test]
fn hospital_draft_matches_golden_body() {
    let mut form = EntryFormState::new();
    form.set_rating(HealthCheckRating::CriticalRisk);
    form.set_entry_type(EntryType::Hospital);
    form.set_text(FormField::Description, "Dislocated thumb while playing baseball.");
    form.set_text(FormField::Date, "2021-04-11");
    form.set_text(FormField::Specialist, "MD House");
    form.set_text(FormField::DischargeDate, "2021-04-25");
    form.set_text(FormField::DischargeCriteria, "Thumb has healed.");
    form.toggle_diagnosis("S62.5");

    let actual = serde_json::to_value(form.draft().expect("valid draft")).expect("serialize");
    let expected: Value =
        serde_json::from_str(&read_fixture("hospital_draft.json")).expect("golden body");
    assert_eq!(actual, expected);
}
