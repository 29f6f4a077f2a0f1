use yew::prelude::*;

use crate::wasm_ui::StoreContext;

#[derive(Properties, PartialEq)]
pub struct PatientListProps {
    pub selected: Option<String>,
    pub on_select: Callback<String>,
}

#[function_component(PatientList)]
pub fn patient_list(props: &PatientListProps) -> Html {
    let Some(store) = use_context::<StoreContext>() else {
        return Html::default();
    };
    let state = &store.0;

    html! {
        <aside class="patient-list">
            <h2>{"Patients"}</h2>
            {
                if !state.patient_list_loaded() && state.patient_count() == 0 {
                    html! { <p class="patient-list-empty">{"Loading patients…"}</p> }
                } else {
                    html! {
                        <ul>
                            {
                                for state.patients().map(|patient| {
                                    let id = patient.id.clone();
                                    let is_active = props.selected.as_deref() == Some(patient.id.as_str());
                                    let onclick = {
                                        let on_select = props.on_select.clone();
                                        Callback::from(move |_: MouseEvent| on_select.emit(id.clone()))
                                    };
                                    html! {
                                        <li key={patient.id.clone()}>
                                            <button
                                                type="button"
                                                class={classes!("patient-row", is_active.then_some("is-active"))}
                                                onclick={onclick}
                                            >
                                                <span class="patient-row-name">{ patient.name.clone() }</span>
                                                <span class="patient-row-meta">{ patient.occupation.clone() }</span>
                                            </button>
                                        </li>
                                    }
                                })
                            }
                        </ul>
                    }
                }
            }
        </aside>
    }
}
