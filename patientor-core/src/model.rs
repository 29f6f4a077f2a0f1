//! Wire-compatible domain types: patients, diagnoses and the entry variants.

use serde::{Deserialize, Serialize};

/// Reference diagnosis, keyed by `code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Icon name shown next to the patient name.
    pub fn icon(self) -> &'static str {
        match self {
            Gender::Male => "mars",
            Gender::Female => "venus",
            Gender::Other => "genderless",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub occupation: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_patient: Option<bool>,
}

impl Patient {
    /// A list-endpoint record that has not been replaced by a detail fetch yet.
    pub fn is_summary(&self) -> bool {
        self.public_patient == Some(true)
    }

    /// Marks the record as a list-endpoint summary. The list never carries
    /// entries, whether or not the server sends `publicPatient`.
    pub fn into_summary(mut self) -> Self {
        self.public_patient = Some(true);
        self
    }

    /// Marks the record as fully loaded.
    pub fn into_full(mut self) -> Self {
        self.public_patient = Some(false);
        self
    }
}

/// Ordinal severity of a health check; the wire value is the integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    #[default]
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "Low risk",
            HealthCheckRating::HighRisk => "High risk",
            HealthCheckRating::CriticalRisk => "Critical risk",
        }
    }

    /// Heart icon colour used by the entry renderer.
    pub fn color(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "green",
            HealthCheckRating::LowRisk => "yellow",
            HealthCheckRating::HighRisk => "orange",
            HealthCheckRating::CriticalRisk => "red",
        }
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating as u8
    }
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HealthCheckRating::ALL
            .into_iter()
            .find(|rating| *rating as u8 == value)
            .ok_or_else(|| format!("health check rating out of range: {value}"))
    }
}

/// Entry discriminator values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EntryType {
    #[default]
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [
        EntryType::HealthCheck,
        EntryType::Hospital,
        EntryType::OccupationalHealthcare,
    ];

    /// The `type` string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::HealthCheck => "HealthCheck",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        EntryType::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Label used in the entry type selector.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::HealthCheck => "Health check",
            EntryType::Hospital => "Hospital",
            EntryType::OccupationalHealthcare => "Occupational healthcare",
        }
    }
}

/// Fields shared by every stored entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntry {
    pub id: String,
    pub date: String,
    pub description: String,
    pub specialist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub health_check_rating: HealthCheckRating,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HospitalEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub discharge: Discharge,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupationalHealthcareEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave: Option<SickLeave>,
}

/// A stored medical entry, tagged by `type`.
///
/// Tags this client does not know decode into [`Entry::Unknown`] so a newer
/// server cannot break rendering of the entries we do understand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Entry {
    HealthCheck(HealthCheckEntry),
    Hospital(HospitalEntry),
    OccupationalHealthcare(OccupationalHealthcareEntry),
    #[serde(other)]
    Unknown,
}

impl Entry {
    pub fn entry_type(&self) -> Option<EntryType> {
        match self {
            Entry::HealthCheck(_) => Some(EntryType::HealthCheck),
            Entry::Hospital(_) => Some(EntryType::Hospital),
            Entry::OccupationalHealthcare(_) => Some(EntryType::OccupationalHealthcare),
            Entry::Unknown => None,
        }
    }

    pub fn base(&self) -> Option<&BaseEntry> {
        match self {
            Entry::HealthCheck(entry) => Some(&entry.base),
            Entry::Hospital(entry) => Some(&entry.base),
            Entry::OccupationalHealthcare(entry) => Some(&entry.base),
            Entry::Unknown => None,
        }
    }
}

/// Fields shared by every new-entry payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DraftBase {
    pub description: String,
    pub date: String,
    pub specialist: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnosis_codes: Vec<String>,
}

/// Body of `POST /patients/{id}/entries`. The server assigns the `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EntryDraft {
    #[serde(rename_all = "camelCase")]
    HealthCheck {
        #[serde(flatten)]
        base: DraftBase,
        health_check_rating: HealthCheckRating,
    },
    Hospital {
        #[serde(flatten)]
        base: DraftBase,
        discharge: Discharge,
    },
    #[serde(rename_all = "camelCase")]
    OccupationalHealthcare {
        #[serde(flatten)]
        base: DraftBase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        employer_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
}

impl EntryDraft {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryDraft::HealthCheck { .. } => EntryType::HealthCheck,
            EntryDraft::Hospital { .. } => EntryType::Hospital,
            EntryDraft::OccupationalHealthcare { .. } => EntryType::OccupationalHealthcare,
        }
    }

    pub fn base(&self) -> &DraftBase {
        match self {
            EntryDraft::HealthCheck { base, .. }
            | EntryDraft::Hospital { base, .. }
            | EntryDraft::OccupationalHealthcare { base, .. } => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_entry_type_decodes_as_unknown() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "p1",
            "name": "Dana Scully",
            "occupation": "Forensic Pathologist",
            "gender": "female",
            "entries": [
                { "type": "Telehealth", "id": "e0", "date": "2020-01-01" },
                {
                    "type": "HealthCheck",
                    "id": "e1",
                    "date": "2019-10-20",
                    "description": "Yearly control visit.",
                    "specialist": "MD House",
                    "healthCheckRating": 1
                }
            ]
        }))
        .expect("patient should decode");

        assert_eq!(patient.entries.len(), 2);
        assert_eq!(patient.entries[0], Entry::Unknown);
        assert_eq!(patient.entries[1].entry_type(), Some(EntryType::HealthCheck));
        assert!(!patient.is_summary());
    }

    #[test]
    fn rating_rejects_values_outside_range() {
        let result: Result<HealthCheckRating, _> = serde_json::from_value(json!(4));
        assert!(result.is_err());
        let rating: HealthCheckRating = serde_json::from_value(json!(3)).expect("rating");
        assert_eq!(rating, HealthCheckRating::CriticalRisk);
        assert!(HealthCheckRating::Healthy < HealthCheckRating::CriticalRisk);
    }

    #[test]
    fn entry_type_parses_wire_strings() {
        for kind in EntryType::ALL {
            assert_eq!(EntryType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntryType::parse("healthcheck"), None);
    }

    #[test]
    fn gender_icons_follow_gender() {
        assert_eq!(Gender::Male.icon(), "mars");
        assert_eq!(Gender::Female.icon(), "venus");
        assert_eq!(Gender::Other.icon(), "genderless");
    }
}
