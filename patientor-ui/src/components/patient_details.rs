use std::rc::Rc;

use patientor_core::{submit_entry, Action, DetailView, Diagnosis, PatientApi, PatientDetail, State, SubmitOutcome};
use wasm_bindgen::JsValue;
use web_sys::console;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::{AddEntryForm, EntryCard, FormModel, FormMsg};
use crate::wasm_ui::{ApiContext, StoreContext};
use crate::Snapshot;

#[derive(Properties, PartialEq)]
pub struct PatientDetailsProps {
    pub patient_id: String,
}

#[function_component(PatientDetails)]
pub fn patient_details(props: &PatientDetailsProps) -> Html {
    let store = use_context::<StoreContext>();
    let api = use_context::<ApiContext>();
    let detail = use_mut_ref(|| PatientDetail::new(props.patient_id.clone()));
    // Snapshot seen by the latest render, read back when a fetch completes.
    let latest = use_mut_ref(|| Rc::new(State::default()));
    let form = use_reducer(FormModel::default);

    if let Some(store) = &store {
        *latest.borrow_mut() = Rc::clone(&store.0);
    }

    {
        let deps = (
            props.patient_id.clone(),
            store.as_ref().map(|store| Snapshot(Rc::clone(&store.0))),
        );
        let detail = detail.clone();
        let latest = latest.clone();
        let store = store.clone();
        let api = api.clone();
        let form = form.clone();
        use_effect_with(deps, move |(patient_id, _)| {
            let mut current = detail.borrow_mut();
            if current.patient_id() != patient_id.as_str() {
                current.set_patient_id(patient_id);
                form.dispatch(FormMsg::Reset);
            }
            let state = Rc::clone(&latest.borrow());
            if let (Some(store), Some(api), Some(fetch_id)) = (store, api, current.begin_load(&state)) {
                let detail = detail.clone();
                spawn_local(async move {
                    let result = api.0.fetch_patient(&fetch_id).await;
                    if let Err(err) = &result {
                        console::error_1(&JsValue::from_str(&format!(
                            "Fetching patient {fetch_id} failed: {err}"
                        )));
                    }
                    let state = Rc::clone(&latest.borrow());
                    let action = detail.borrow_mut().finish_load(&state, &fetch_id, result);
                    if let Some(action) = action {
                        store.dispatch(action);
                    }
                });
            }
            || ()
        });
    }

    let (Some(store), Some(api)) = (store, api) else {
        return Html::default();
    };

    let view = detail.borrow().view(&store.0);
    let page = match view {
        DetailView::Loading => return html! { <section class="patient-details"><h1>{"Loading"}</h1></section> },
        DetailView::NotFound => return html! { <section class="patient-details"><h1>{"Patient not found"}</h1></section> },
        DetailView::Patient(page) => page,
    };

    let diagnoses: Rc<Vec<Diagnosis>> = Rc::new(store.0.diagnoses().cloned().collect());

    let on_msg = {
        let form = form.clone();
        Callback::from(move |msg: FormMsg| form.dispatch(msg))
    };

    let on_submit = {
        let form = form.clone();
        let patient_id = props.patient_id.clone();
        Callback::from(move |_: ()| {
            let draft = match form.0.draft() {
                Ok(draft) => draft,
                Err(_) => return,
            };
            let form = form.clone();
            let store = store.clone();
            let api = api.clone();
            let patient_id = patient_id.clone();
            spawn_local(async move {
                match submit_entry(&*api.0, &patient_id, &draft).await {
                    SubmitOutcome::Accepted(patient) => {
                        form.dispatch(FormMsg::Submitted);
                        store.dispatch(Action::update_patient(patient));
                    }
                    SubmitOutcome::Rejected(message) => {
                        console::error_1(&JsValue::from_str(&message));
                        form.dispatch(FormMsg::Failed(message));
                    }
                }
            });
        })
    };

    html! {
        <section class="patient-details">
            <h3 class="patient-name">
                { page.name.clone() }
                <span class="gender-icon" data-icon={page.gender_icon} aria-label={page.gender_icon}></span>
            </h3>
            { page.ssn_line.clone().map(|line| html! { <p class="patient-ssn">{ line }</p> }).unwrap_or_default() }
            <p class="patient-occupation">{ page.occupation_line.clone() }</p>
            {
                if page.entries_pending {
                    html! { <p class="entries-pending">{"Loading entries…"}</p> }
                } else {
                    html! { for page.entries.iter().map(|entry| html! { <EntryCard key={entry.id.clone()} entry={entry.clone()} /> }) }
                }
            }
            <AddEntryForm
                form={form.0.clone()}
                diagnoses={diagnoses}
                on_msg={on_msg}
                on_submit={on_submit}
            />
        </section>
    }
}
