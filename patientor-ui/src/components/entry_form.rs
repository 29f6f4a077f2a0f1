use std::rc::Rc;

use patientor_core::form::{diagnosis_options, entry_type_options, rating_options};
use patientor_core::{Diagnosis, EntryFormState, EntryType, FormField, HealthCheckRating};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew::TargetCast;

/// Messages understood by the form reducer.
pub enum FormMsg {
    SetType(EntryType),
    SetText(FormField, String),
    SetRating(HealthCheckRating),
    ToggleDiagnosis(String),
    Reset,
    Submitted,
    Failed(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct FormModel(pub EntryFormState);

impl Reducible for FormModel {
    type Action = FormMsg;

    fn reduce(self: Rc<Self>, msg: FormMsg) -> Rc<Self> {
        let mut form = self.0.clone();
        match msg {
            FormMsg::SetType(kind) => form.set_entry_type(kind),
            FormMsg::SetText(field, value) => {
                form.set_text(field, value);
            }
            FormMsg::SetRating(rating) => form.set_rating(rating),
            FormMsg::ToggleDiagnosis(code) => form.toggle_diagnosis(&code),
            FormMsg::Reset => form.reset(),
            FormMsg::Submitted => form.complete_submission(),
            FormMsg::Failed(message) => form.fail_submission(message),
        }
        Rc::new(FormModel(form))
    }
}

#[derive(Properties, PartialEq)]
pub struct AddEntryFormProps {
    pub form: EntryFormState,
    pub diagnoses: Rc<Vec<Diagnosis>>,
    pub on_msg: Callback<FormMsg>,
    pub on_submit: Callback<()>,
}

#[function_component(AddEntryForm)]
pub fn add_entry_form(props: &AddEntryFormProps) -> Html {
    let form = &props.form;
    let errors = form.errors();
    let show_errors = form.is_dirty();

    let on_type = {
        let on_msg = props.on_msg.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Some(kind) = EntryType::parse(&select.value()) {
                on_msg.emit(FormMsg::SetType(kind));
            }
        })
    };

    let on_rating = {
        let on_msg = props.on_msg.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            let parsed = select
                .value()
                .parse::<u8>()
                .ok()
                .and_then(|value| HealthCheckRating::try_from(value).ok());
            if let Some(rating) = parsed {
                on_msg.emit(FormMsg::SetRating(rating));
            }
        })
    };

    let on_reset = {
        let on_msg = props.on_msg.clone();
        Callback::from(move |_: MouseEvent| on_msg.emit(FormMsg::Reset))
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let fields = form.visible_fields().into_iter().map(|field| {
        if field.is_text() {
            render_text_field(form, field, errors.get(&field).filter(|_| show_errors).copied(), &props.on_msg)
        } else {
            render_rating_field(form, on_rating.clone())
        }
    });

    html! {
        <section class="entry-form-card">
            <h3>{"Add new entry for patient"}</h3>
            { form.error().map(|message| html! { <div class="form-error" role="alert">{ message.to_string() }</div> }).unwrap_or_default() }
            <form class="entry-form" onsubmit={on_submit}>
                <label class="form-field">
                    <span>{"Entry type"}</span>
                    <select onchange={on_type}>
                        {
                            for entry_type_options().into_iter().map(|option| html! {
                                <option
                                    value={option.value.as_str()}
                                    selected={option.value == form.entry_type()}
                                >{ option.label }</option>
                            })
                        }
                    </select>
                </label>
                { for fields }
                { render_diagnosis_selection(form, &props.diagnoses, &props.on_msg) }
                <div class="form-actions">
                    <button type="button" class="button-reset" onclick={on_reset}>{"Reset"}</button>
                    <button type="submit" class="button-add" disabled={!form.can_submit()}>{"Add"}</button>
                </div>
            </form>
        </section>
    }
}

fn render_text_field(
    form: &EntryFormState,
    field: FormField,
    error: Option<&'static str>,
    on_msg: &Callback<FormMsg>,
) -> Html {
    let oninput = {
        let on_msg = on_msg.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_msg.emit(FormMsg::SetText(field, input.value()));
        })
    };
    let value = form.values().text(field).unwrap_or_default().to_string();

    html! {
        <label class={classes!("form-field", error.map(|_| "has-error"))}>
            <span>{ field.label() }</span>
            <input type="text" placeholder={field.placeholder()} value={value} oninput={oninput} />
            { error.map(|message| html! { <span class="field-error">{ message }</span> }).unwrap_or_default() }
        </label>
    }
}

fn render_rating_field(form: &EntryFormState, onchange: Callback<Event>) -> Html {
    let current = form.values().health_check_rating;
    html! {
        <label class="form-field">
            <span>{ FormField::HealthCheckRating.label() }</span>
            <select onchange={onchange}>
                {
                    for rating_options().into_iter().map(|option| html! {
                        <option
                            value={u8::from(option.value).to_string()}
                            selected={option.value == current}
                        >{ option.label }</option>
                    })
                }
            </select>
        </label>
    }
}

fn render_diagnosis_selection(
    form: &EntryFormState,
    diagnoses: &[Diagnosis],
    on_msg: &Callback<FormMsg>,
) -> Html {
    let selected = &form.values().diagnosis_codes;
    html! {
        <fieldset class="diagnosis-selection">
            <legend>{"Diagnoses"}</legend>
            {
                for diagnosis_options(diagnoses).into_iter().map(|option| {
                    let checked = selected.contains(&option.value);
                    let onchange = {
                        let on_msg = on_msg.clone();
                        let code = option.value.clone();
                        Callback::from(move |_: Event| on_msg.emit(FormMsg::ToggleDiagnosis(code.clone())))
                    };
                    html! {
                        <label class="diagnosis-option" key={option.value.clone()}>
                            <input type="checkbox" checked={checked} onchange={onchange} />
                            <span>{ option.label }</span>
                        </label>
                    }
                })
            }
        </fieldset>
    }
}
