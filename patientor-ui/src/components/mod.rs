mod entry_card;
mod entry_form;
mod patient_details;
mod patient_list;

pub use entry_card::EntryCard;
pub use entry_form::{AddEntryForm, FormModel, FormMsg};
pub use patient_details::PatientDetails;
pub use patient_list::PatientList;
