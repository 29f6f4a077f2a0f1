//! Patient records UI for WebAssembly, built on yew.

mod config;
mod snapshot;

pub use config::JsAppConfig;
pub use snapshot::Snapshot;

#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::components::{PatientDetails, PatientList};
    use crate::config::JsAppConfig;
    use crate::styles;
    use patientor_client::{ClientConfig, HttpPatientApi};
    use patientor_core::{bootstrap, reduce, Action, State};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, Window};
    use yew::platform::spawn_local;
    use yew::prelude::*;

    /// yew-side holder of the core state snapshot.
    #[derive(Debug, Default)]
    pub struct AppState(pub Rc<State>);

    impl PartialEq for AppState {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    impl Reducible for AppState {
        type Action = Action;

        fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
            let next = reduce(Rc::clone(&self.0), action);
            if Rc::ptr_eq(&next, &self.0) {
                self
            } else {
                Rc::new(AppState(next))
            }
        }
    }

    pub type StoreContext = UseReducerHandle<AppState>;

    /// Shared API client. Compared by pointer so the context never re-renders
    /// consumers on its own.
    #[derive(Clone)]
    pub struct ApiContext(pub Rc<HttpPatientApi>);

    impl PartialEq for ApiContext {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct AppProps {
        pub config: ClientConfig,
    }

    #[function_component(App)]
    fn app(props: &AppProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let store = use_reducer(AppState::default);
        let api = use_memo(props.config.clone(), |config| HttpPatientApi::new(config.clone()));
        let selected = use_state(|| None::<String>);

        {
            let store = store.clone();
            let api = Rc::clone(&api);
            use_effect_with((), move |_| {
                spawn_local(async move {
                    bootstrap(&*api, |action| store.dispatch(action)).await;
                });
                || ()
            });
        }

        let on_select = {
            let selected = selected.clone();
            Callback::from(move |id: String| selected.set(Some(id)))
        };

        html! {
            <ContextProvider<StoreContext> context={store}>
                <ContextProvider<ApiContext> context={ApiContext(api)}>
                    <div class="patientor-root">
                        <header class="patientor-header">
                            <h1>{"Patientor"}</h1>
                        </header>
                        <div class="patientor-body">
                            <PatientList selected={(*selected).clone()} on_select={on_select} />
                            {
                                match (*selected).clone() {
                                    Some(patient_id) => html! { <PatientDetails patient_id={patient_id} /> },
                                    None => html! {
                                        <section class="patient-placeholder">{"Select a patient to see their entries."}</section>
                                    },
                                }
                            }
                        </div>
                    </div>
                </ContextProvider<ApiContext>>
            </ContextProvider<StoreContext>>
        }
    }

    #[wasm_bindgen]
    pub fn mount_patientor(selector: &str, config: JsValue) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Cannot access document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches selector"))?;

        let js_config: JsAppConfig = if config.is_undefined() || config.is_null() {
            JsAppConfig::default()
        } else {
            from_value(config)
                .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?
        };
        let config = ClientConfig::try_from(js_config)
            .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?;

        yew::Renderer::<App>::with_root_and_props(target, AppProps { config }).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_patientor;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_patientor(_: &str, _: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "patientor-ui only supports the wasm32 target",
    ))
}
