//! Markup-free view models for the patient detail page.

use crate::model::{
    BaseEntry, Entry, Gender, HealthCheckEntry, HealthCheckRating, HospitalEntry,
    OccupationalHealthcareEntry, Patient,
};
use crate::state::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientView {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub gender_icon: &'static str,
    /// `"ssn: …"` when the record carries one.
    pub ssn_line: Option<String>,
    pub occupation_line: String,
    pub entries: Vec<EntryView>,
    /// Entries are withheld until the full record arrives.
    pub entries_pending: bool,
}

/// One rendered entry card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: String,
    pub date: String,
    pub kind_label: &'static str,
    /// Tag colour of the card header.
    pub kind_color: &'static str,
    pub specialist: String,
    pub description: String,
    pub rating: Option<RatingView>,
    pub diagnosis_lines: Vec<String>,
    pub detail_line: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingView {
    pub rating: HealthCheckRating,
    pub icon_color: &'static str,
}

pub fn render_patient(patient: &Patient, state: &State) -> PatientView {
    let entries_pending = patient.is_summary();
    let entries = if entries_pending {
        Vec::new()
    } else {
        patient
            .entries
            .iter()
            .filter_map(|entry| render_entry(entry, state))
            .collect()
    };

    PatientView {
        id: patient.id.clone(),
        name: patient.name.clone(),
        gender: patient.gender,
        gender_icon: patient.gender.icon(),
        ssn_line: patient.ssn.as_ref().map(|ssn| format!("ssn: {ssn}")),
        occupation_line: format!("Occupation: {}", patient.occupation),
        entries,
        entries_pending,
    }
}

/// Picks a renderer by discriminator. Unknown kinds render nothing.
pub fn render_entry(entry: &Entry, state: &State) -> Option<EntryView> {
    match entry {
        Entry::Hospital(entry) => Some(render_hospital(entry, state)),
        Entry::OccupationalHealthcare(entry) => Some(render_occupational(entry, state)),
        Entry::HealthCheck(entry) => Some(render_health_check(entry, state)),
        Entry::Unknown => None,
    }
}

fn render_hospital(entry: &HospitalEntry, state: &State) -> EntryView {
    let mut view = base_view(&entry.base, "Hospital", "red", state);
    view.detail_line = Some(format!(
        "{} - {}",
        entry.discharge.date, entry.discharge.criteria
    ));
    view
}

fn render_occupational(entry: &OccupationalHealthcareEntry, state: &State) -> EntryView {
    let mut view = base_view(&entry.base, "Occupational", "teal", state);
    let parts: Vec<String> = entry
        .employer_name
        .iter()
        .cloned()
        .chain(entry.sick_leave.as_ref().map(|leave| {
            format!("Sick leave from {} to {}", leave.start_date, leave.end_date)
        }))
        .collect();
    view.detail_line = (!parts.is_empty()).then(|| parts.join(" - "));
    view
}

fn render_health_check(entry: &HealthCheckEntry, state: &State) -> EntryView {
    let mut view = base_view(&entry.base, "Health check", "green", state);
    view.rating = Some(RatingView {
        rating: entry.health_check_rating,
        icon_color: entry.health_check_rating.color(),
    });
    view
}

fn base_view(
    base: &BaseEntry,
    kind_label: &'static str,
    kind_color: &'static str,
    state: &State,
) -> EntryView {
    EntryView {
        id: base.id.clone(),
        date: base.date.clone(),
        kind_label,
        kind_color,
        specialist: base.specialist.clone(),
        description: base.description.clone(),
        rating: None,
        diagnosis_lines: base
            .diagnosis_codes
            .as_deref()
            .map(|codes| diagnosis_lines(codes, state))
            .unwrap_or_default(),
        detail_line: None,
    }
}

/// `"{code}: {name}"`, with ` ({latin})` appended when known. Codes missing from
/// the reference set are skipped.
pub fn diagnosis_lines(codes: &[String], state: &State) -> Vec<String> {
    codes
        .iter()
        .filter_map(|code| state.diagnosis(code))
        .map(|diagnosis| match &diagnosis.latin {
            Some(latin) => format!("{}: {} ({latin})", diagnosis.code, diagnosis.name),
            None => format!("{}: {}", diagnosis.code, diagnosis.name),
        })
        .collect()
}
