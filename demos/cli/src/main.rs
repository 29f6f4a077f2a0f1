use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use patientor_client::{ClientConfig, HttpPatientApi, DEFAULT_API_BASE_URL};
use patientor_core::form::FormField;
use patientor_core::{
    bootstrap, submit_entry, DetailView, EntryFormState, EntryType, FormError, HealthCheckRating,
    PatientDetail, PatientView, Store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "patientor", about = "Browse patients and add medical entries.")]
struct Args {
    /// Base URL of the patient API.
    #[arg(long, env = "PATIENTOR_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List patient summaries
    Patients,
    /// List the diagnosis reference set
    Diagnoses,
    /// Show one patient with entries
    Show {
        id: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an entry to a patient
    AddEntry(AddEntryArgs),
}

#[derive(clap::Args, Debug)]
struct AddEntryArgs {
    id: String,
    #[arg(long = "type", value_enum, default_value_t = KindArg::HealthCheck)]
    kind: KindArg,
    #[arg(long, default_value = "")]
    description: String,
    /// Date of entry (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    specialist: String,
    /// Diagnosis code, repeatable
    #[arg(long = "diagnosis")]
    diagnoses: Vec<String>,
    #[arg(long, value_enum, default_value_t = RatingArg::Healthy)]
    rating: RatingArg,
    #[arg(long, default_value = "")]
    discharge_date: String,
    #[arg(long, default_value = "")]
    discharge_criteria: String,
    #[arg(long, default_value = "")]
    employer: String,
    #[arg(long, default_value = "")]
    sick_leave_start: String,
    #[arg(long, default_value = "")]
    sick_leave_end: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    HealthCheck,
    Hospital,
    Occupational,
}

impl From<KindArg> for EntryType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::HealthCheck => EntryType::HealthCheck,
            KindArg::Hospital => EntryType::Hospital,
            KindArg::Occupational => EntryType::OccupationalHealthcare,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RatingArg {
    Healthy,
    LowRisk,
    HighRisk,
    CriticalRisk,
}

impl From<RatingArg> for HealthCheckRating {
    fn from(rating: RatingArg) -> Self {
        match rating {
            RatingArg::Healthy => HealthCheckRating::Healthy,
            RatingArg::LowRisk => HealthCheckRating::LowRisk,
            RatingArg::HighRisk => HealthCheckRating::HighRisk,
            RatingArg::CriticalRisk => HealthCheckRating::CriticalRisk,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ClientConfig::new(&args.api_url)
        .with_context(|| format!("Invalid API URL {:?}", args.api_url))?;
    let api = HttpPatientApi::new(config);

    let mut store = Store::new();
    bootstrap(&api, |action| {
        store.dispatch(action);
    })
    .await;

    match args.command {
        Command::Patients => {
            let state = store.state();
            if !state.patient_list_loaded() {
                bail!("Could not load the patient list from {}", args.api_url);
            }
            for patient in state.patients() {
                println!("{}\t{}\t{}", patient.id, patient.name, patient.occupation);
            }
        }
        Command::Diagnoses => {
            for diagnosis in store.state().diagnoses() {
                match &diagnosis.latin {
                    Some(latin) => println!("{}: {} ({latin})", diagnosis.code, diagnosis.name),
                    None => println!("{}: {}", diagnosis.code, diagnosis.name),
                }
            }
        }
        Command::Show { id, json } => {
            let mut detail = PatientDetail::new(id.clone());
            detail.load(&api, &mut store).await;
            if json {
                let state = store.state();
                let patient = state
                    .patient(&id)
                    .with_context(|| format!("Patient {id} not found"))?;
                println!("{}", serde_json::to_string_pretty(patient.as_ref())?);
            } else {
                print_view(detail.view(&store.state()))?;
            }
        }
        Command::AddEntry(entry) => {
            let mut detail = PatientDetail::new(entry.id.clone());
            detail.load(&api, &mut store).await;
            if let DetailView::NotFound = detail.view(&store.state()) {
                bail!("Patient {} not found", entry.id);
            }

            let mut form = fill_form(&entry);
            let draft = match form.draft() {
                Ok(draft) => draft,
                Err(FormError::Invalid(errors)) => {
                    for (field, message) in errors {
                        eprintln!("{}: {message}", field.label());
                    }
                    bail!("Entry is incomplete");
                }
                Err(err) => bail!("Entry is incomplete: {err}"),
            };

            let outcome = submit_entry(&api, &entry.id, &draft).await;
            if let Some(action) = outcome.apply(&mut form) {
                store.dispatch(action);
            }
            if let Some(message) = form.error() {
                bail!("{message}");
            }
            tracing::info!(patient_id = %entry.id, entry_type = draft.entry_type().as_str(), "entry added");
            print_view(detail.view(&store.state()))?;
        }
    }

    Ok(())
}

fn fill_form(args: &AddEntryArgs) -> EntryFormState {
    let mut form = EntryFormState::new();
    form.set_entry_type(args.kind.into());
    form.set_rating(args.rating.into());
    let texts = [
        (FormField::Description, &args.description),
        (FormField::Date, &args.date),
        (FormField::Specialist, &args.specialist),
        (FormField::DischargeDate, &args.discharge_date),
        (FormField::DischargeCriteria, &args.discharge_criteria),
        (FormField::EmployerName, &args.employer),
        (FormField::SickLeaveStart, &args.sick_leave_start),
        (FormField::SickLeaveEnd, &args.sick_leave_end),
    ];
    for (field, value) in texts {
        form.set_text(field, value.as_str());
    }
    form.set_diagnosis_codes(args.diagnoses.clone());
    form
}

fn print_view(view: DetailView) -> anyhow::Result<()> {
    match view {
        DetailView::Loading => bail!("Patient list is not available"),
        DetailView::NotFound => bail!("Patient not found"),
        DetailView::Patient(page) => print_patient(&page),
    }
    Ok(())
}

fn print_patient(page: &PatientView) {
    println!("{} ({})", page.name, page.gender_icon);
    if let Some(ssn) = &page.ssn_line {
        println!("{ssn}");
    }
    println!("{}", page.occupation_line);
    if page.entries_pending {
        println!("(entries not loaded)");
        return;
    }
    for entry in &page.entries {
        println!();
        println!("{} [{}] {}", entry.date, entry.kind_label, entry.specialist);
        match entry.rating {
            Some(rating) => println!("  {} ({})", entry.description, rating.rating.label()),
            None => println!("  {}", entry.description),
        }
        for line in &entry.diagnosis_lines {
            println!("  - {line}");
        }
        if let Some(detail) = &entry.detail_line {
            println!("  {detail}");
        }
    }
}
