//! Controller behind the "add entry" form.
//!
//! One set of values covers all three entry variants. Which of them are shown
//! and submitted depends on the selected [`EntryType`]; values typed into a
//! variant that is no longer selected are kept but never reach the payload.

use std::collections::BTreeMap;

use crate::model::{
    Diagnosis, Discharge, DraftBase, EntryDraft, EntryType, HealthCheckRating, SickLeave,
};

pub const REQUIRED_MESSAGE: &str = "Field is required";

/// Every input the form can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Description,
    Date,
    Specialist,
    HealthCheckRating,
    DischargeDate,
    DischargeCriteria,
    EmployerName,
    SickLeaveStart,
    SickLeaveEnd,
}

impl FormField {
    const COMMON: [FormField; 3] = [FormField::Description, FormField::Date, FormField::Specialist];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Description => "Description",
            FormField::Date => "Date of entry",
            FormField::Specialist => "Specialist",
            FormField::HealthCheckRating => "Health check rating",
            FormField::DischargeDate => "Discharge date",
            FormField::DischargeCriteria => "Discharge criteria",
            FormField::EmployerName => "Employer name",
            FormField::SickLeaveStart => "Sick leave start",
            FormField::SickLeaveEnd => "Sick leave end",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Date
            | FormField::DischargeDate
            | FormField::SickLeaveStart
            | FormField::SickLeaveEnd => "YYYY-MM-DD",
            FormField::DischargeCriteria => "Criteria",
            FormField::EmployerName => "Name",
            other => other.label(),
        }
    }

    /// Rating is picked from a list; everything else is free text.
    pub fn is_text(self) -> bool {
        self != FormField::HealthCheckRating
    }

    fn variant_fields(kind: EntryType) -> &'static [FormField] {
        match kind {
            EntryType::HealthCheck => &[FormField::HealthCheckRating],
            EntryType::Hospital => &[FormField::DischargeDate, FormField::DischargeCriteria],
            EntryType::OccupationalHealthcare => &[
                FormField::EmployerName,
                FormField::SickLeaveStart,
                FormField::SickLeaveEnd,
            ],
        }
    }
}

/// Raw form values. Empty strings mean "not filled in".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryFormValues {
    pub entry_type: EntryType,
    pub description: String,
    pub date: String,
    pub specialist: String,
    pub diagnosis_codes: Vec<String>,
    pub health_check_rating: HealthCheckRating,
    pub discharge_date: String,
    pub discharge_criteria: String,
    pub employer_name: String,
    pub sick_leave_start: String,
    pub sick_leave_end: String,
}

impl EntryFormValues {
    pub fn text(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Description => &self.description,
            FormField::Date => &self.date,
            FormField::Specialist => &self.specialist,
            FormField::DischargeDate => &self.discharge_date,
            FormField::DischargeCriteria => &self.discharge_criteria,
            FormField::EmployerName => &self.employer_name,
            FormField::SickLeaveStart => &self.sick_leave_start,
            FormField::SickLeaveEnd => &self.sick_leave_end,
            FormField::HealthCheckRating => return None,
        };
        Some(value)
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        let value = match field {
            FormField::Description => &mut self.description,
            FormField::Date => &mut self.date,
            FormField::Specialist => &mut self.specialist,
            FormField::DischargeDate => &mut self.discharge_date,
            FormField::DischargeCriteria => &mut self.discharge_criteria,
            FormField::EmployerName => &mut self.employer_name,
            FormField::SickLeaveStart => &mut self.sick_leave_start,
            FormField::SickLeaveEnd => &mut self.sick_leave_end,
            FormField::HealthCheckRating => return None,
        };
        Some(value)
    }
}

/// Field → inline message.
pub type FieldErrors = BTreeMap<FormField, &'static str>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("nothing has been entered yet")]
    Pristine,
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),
}

/// Selectable option for one of the form's pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
}

pub fn entry_type_options() -> Vec<SelectOption<EntryType>> {
    EntryType::ALL
        .into_iter()
        .map(|kind| SelectOption {
            value: kind,
            label: kind.label().to_string(),
        })
        .collect()
}

/// Ratings from most to least severe, the order the picker lists them.
pub fn rating_options() -> Vec<SelectOption<HealthCheckRating>> {
    HealthCheckRating::ALL
        .into_iter()
        .rev()
        .map(|rating| SelectOption {
            value: rating,
            label: rating.label().to_string(),
        })
        .collect()
}

/// Multi-select options built from the whole diagnosis reference set.
pub fn diagnosis_options<'a>(
    diagnoses: impl IntoIterator<Item = &'a Diagnosis>,
) -> Vec<SelectOption<String>> {
    diagnoses
        .into_iter()
        .map(|diagnosis| SelectOption {
            value: diagnosis.code.clone(),
            label: format!("{} ({})", diagnosis.name, diagnosis.code),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryFormState {
    values: EntryFormValues,
    error: Option<String>,
}

impl EntryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &EntryFormValues {
        &self.values
    }

    pub fn entry_type(&self) -> EntryType {
        self.values.entry_type
    }

    /// Submission error supplied by the caller, verbatim.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fields to show for the selected type, common ones first.
    pub fn visible_fields(&self) -> Vec<FormField> {
        FormField::COMMON
            .iter()
            .chain(FormField::variant_fields(self.values.entry_type))
            .copied()
            .collect()
    }

    pub fn set_entry_type(&mut self, kind: EntryType) {
        self.values.entry_type = kind;
    }

    /// Sets a text input. Returns `false` for the rating field, which is not text.
    pub fn set_text(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.values.text_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_rating(&mut self, rating: HealthCheckRating) {
        self.values.health_check_rating = rating;
    }

    pub fn set_diagnosis_codes(&mut self, codes: Vec<String>) {
        self.values.diagnosis_codes = codes;
    }

    /// Adds `code` if it is not selected yet, removes it otherwise.
    pub fn toggle_diagnosis(&mut self, code: &str) {
        let codes = &mut self.values.diagnosis_codes;
        match codes.iter().position(|selected| selected == code) {
            Some(index) => {
                codes.remove(index);
            }
            None => codes.push(code.to_string()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.values != EntryFormValues::default()
    }

    pub fn errors(&self) -> FieldErrors {
        FormField::COMMON
            .into_iter()
            .filter(|field| {
                self.values
                    .text(*field)
                    .map_or(false, |value| value.is_empty())
            })
            .map(|field| (field, REQUIRED_MESSAGE))
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.is_dirty() && self.errors().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builds the payload for the selected variant only.
    pub fn draft(&self) -> Result<EntryDraft, FormError> {
        if !self.is_dirty() {
            return Err(FormError::Pristine);
        }
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }

        let values = &self.values;
        let base = DraftBase {
            description: values.description.clone(),
            date: values.date.clone(),
            specialist: values.specialist.clone(),
            diagnosis_codes: values.diagnosis_codes.clone(),
        };

        let draft = match values.entry_type {
            EntryType::HealthCheck => EntryDraft::HealthCheck {
                base,
                health_check_rating: values.health_check_rating,
            },
            EntryType::Hospital => EntryDraft::Hospital {
                base,
                discharge: Discharge {
                    date: values.discharge_date.clone(),
                    criteria: values.discharge_criteria.clone(),
                },
            },
            EntryType::OccupationalHealthcare => EntryDraft::OccupationalHealthcare {
                base,
                employer_name: non_empty(&values.employer_name),
                sick_leave: if values.sick_leave_start.is_empty() && values.sick_leave_end.is_empty() {
                    None
                } else {
                    Some(SickLeave {
                        start_date: values.sick_leave_start.clone(),
                        end_date: values.sick_leave_end.clone(),
                    })
                },
            },
        };
        Ok(draft)
    }

    /// Shows `message` exactly as given. Field values stay as they are.
    pub fn fail_submission(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn complete_submission(&mut self) {
        self.reset();
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn filled(kind: EntryType) -> EntryFormState {
        let mut form = EntryFormState::new();
        form.set_entry_type(kind);
        form.set_text(FormField::Description, "Back pain after lifting");
        form.set_text(FormField::Date, "2015-01-02");
        form.set_text(FormField::Specialist, "MD House");
        form
    }

    #[test]
    fn starts_as_pristine_health_check() {
        let form = EntryFormState::new();
        assert_eq!(form.entry_type(), EntryType::HealthCheck);
        assert_eq!(form.values().health_check_rating, HealthCheckRating::Healthy);
        assert!(form.values().diagnosis_codes.is_empty());
        assert!(!form.is_dirty());
        assert!(!form.can_submit());
        assert_eq!(form.draft(), Err(FormError::Pristine));
        assert_eq!(
            form.visible_fields(),
            vec![
                FormField::Description,
                FormField::Date,
                FormField::Specialist,
                FormField::HealthCheckRating
            ]
        );
    }

    #[test]
    fn empty_description_blocks_submit() {
        let mut form = EntryFormState::new();
        form.set_text(FormField::Date, "2019-10-20");
        form.set_text(FormField::Specialist, "MD House");
        assert!(form.is_dirty());
        assert!(!form.can_submit());
        assert_eq!(
            form.errors().get(&FormField::Description),
            Some(&REQUIRED_MESSAGE)
        );

        form.set_text(FormField::Description, "Yearly control visit");
        assert!(form.errors().is_empty());
        assert!(form.can_submit());
    }

    #[test]
    fn switching_to_hospital_drops_rating() {
        let mut form = filled(EntryType::HealthCheck);
        form.set_rating(HealthCheckRating::HighRisk);
        form.set_entry_type(EntryType::Hospital);
        form.set_text(FormField::DischargeDate, "2015-01-16");
        form.set_text(FormField::DischargeCriteria, "Thumb has healed.");

        let draft = form.draft().expect("draft");
        let body = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(body["type"], "Hospital");
        assert_eq!(body["discharge"]["date"], "2015-01-16");
        assert_eq!(body["discharge"]["criteria"], "Thumb has healed.");
        assert!(body.get("healthCheckRating").is_none());
        assert!(body.get("diagnosisCodes").is_none());
    }

    #[test]
    fn occupational_payload_omits_empty_optionals() {
        let mut form = filled(EntryType::OccupationalHealthcare);
        form.set_text(FormField::DischargeDate, "2015-01-16");
        let body = serde_json::to_value(form.draft().expect("draft")).expect("serialize");
        let keys: Vec<&str> = body
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys.len(), 4, "unexpected keys: {keys:?}");
        assert!(body.get("discharge").is_none());

        form.set_text(FormField::EmployerName, "HyPD");
        form.set_text(FormField::SickLeaveStart, "2019-08-05");
        form.set_text(FormField::SickLeaveEnd, "2019-08-28");
        let body = serde_json::to_value(form.draft().expect("draft")).expect("serialize");
        assert_eq!(body["employerName"], "HyPD");
        assert_eq!(body["sickLeave"]["startDate"], "2019-08-05");
        assert_eq!(body["sickLeave"]["endDate"], "2019-08-28");
    }

    #[test]
    fn diagnosis_selection_is_independent_of_type() {
        let mut form = filled(EntryType::HealthCheck);
        form.toggle_diagnosis("M51.2");
        form.toggle_diagnosis("J10.1");
        form.toggle_diagnosis("M51.2");
        form.set_entry_type(EntryType::Hospital);

        let body = serde_json::to_value(form.draft().expect("draft")).expect("serialize");
        assert_eq!(body["diagnosisCodes"], Value::from(vec!["J10.1"]));
    }

    #[test]
    fn failure_keeps_values_and_message() {
        let mut form = filled(EntryType::Hospital);
        form.set_text(FormField::DischargeCriteria, "Healed");
        let before = form.values().clone();

        form.fail_submission("Error: Malformatted date: 2015-13-45 ");
        assert_eq!(form.values(), &before);
        assert_eq!(form.error(), Some("Error: Malformatted date: 2015-13-45 "));
        assert!(form.can_submit());
    }

    #[test]
    fn reset_discards_everything() {
        let mut form = filled(EntryType::OccupationalHealthcare);
        form.toggle_diagnosis("Z57.1");
        form.fail_submission("Error: boom");
        form.reset();
        assert_eq!(form, EntryFormState::new());
    }

    #[test]
    fn rating_is_not_a_text_field() {
        let mut form = EntryFormState::new();
        assert!(!form.set_text(FormField::HealthCheckRating, "3"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn option_lists_match_labels() {
        let ratings: Vec<String> = rating_options().into_iter().map(|o| o.label).collect();
        assert_eq!(ratings, vec!["Critical risk", "High risk", "Low risk", "Healthy"]);

        let diagnoses = [Diagnosis {
            code: "M51.2".to_string(),
            name: "Other disc disorders".to_string(),
            latin: None,
        }];
        let options = diagnosis_options(&diagnoses);
        assert_eq!(options[0].value, "M51.2");
        assert_eq!(options[0].label, "Other disc disorders (M51.2)");
        assert_eq!(entry_type_options().len(), 3);
    }
}
