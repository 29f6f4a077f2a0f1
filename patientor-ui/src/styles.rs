#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-patientor-ui]";

/// Default CSS for the app along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --patientor-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --patientor-bg: #f8fafc;
  --patientor-card-bg: #ffffff;
  --patientor-card-border: rgba(148, 163, 184, 0.28);
  --patientor-radius: 12px;
  --patientor-text: #1f2933;
  --patientor-muted: #52606d;
  --patientor-accent: #2563eb;
  --patientor-error: #b42318;
  --patientor-error-bg: rgba(180, 35, 24, 0.08);
  --patientor-green: #067647;
  --patientor-yellow: #ca8a04;
  --patientor-orange: #dc6803;
  --patientor-red: #b42318;
  --patientor-teal: #0f766e;
}

.patientor-root {
  font-family: var(--patientor-font-family);
  background: var(--patientor-bg);
  color: var(--patientor-text);
  padding: 24px;
  min-height: 100%;
}

.patientor-header h1 {
  margin: 0 0 20px;
  font-size: 1.6rem;
}

.patientor-body {
  display: grid;
  gap: 24px;
  grid-template-columns: minmax(220px, 0.6fr) minmax(420px, 1.6fr);
}

.patient-list,
.patient-details,
.patient-placeholder {
  background: var(--patientor-card-bg);
  border: 1px solid var(--patientor-card-border);
  border-radius: var(--patientor-radius);
  padding: 20px;
}

.patient-list ul {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 6px;
}

.patient-row {
  width: 100%;
  text-align: left;
  background: none;
  border: 1px solid transparent;
  border-radius: 8px;
  padding: 8px 10px;
  cursor: pointer;
  display: flex;
  flex-direction: column;
}

.patient-row.is-active {
  border-color: var(--patientor-accent);
  background: rgba(37, 99, 235, 0.06);
}

.patient-row-meta,
.patient-list-empty,
.entry-specialist,
.entries-pending {
  color: var(--patientor-muted);
  font-size: 0.9rem;
}

.gender-icon::after {
  margin-left: 8px;
  font-size: 0.95em;
}

.gender-icon[data-icon="mars"]::after { content: "♂"; }
.gender-icon[data-icon="venus"]::after { content: "♀"; }
.gender-icon[data-icon="genderless"]::after { content: "⚲"; }

.entry-card {
  border: 1px solid var(--patientor-card-border);
  border-radius: var(--patientor-radius);
  padding: 14px 16px;
  margin-bottom: 14px;
}

.entry-card-header {
  display: flex;
  align-items: center;
  gap: 10px;
  font-weight: 600;
}

.entry-tag {
  font-size: 0.75rem;
  padding: 2px 8px;
  border-radius: 999px;
  color: #ffffff;
}

.entry-tag[data-color="red"] { background: var(--patientor-red); }
.entry-tag[data-color="teal"] { background: var(--patientor-teal); }
.entry-tag[data-color="green"] { background: var(--patientor-green); }

.rating-heart {
  margin-right: 6px;
}

.rating-heart[data-color="green"] { color: var(--patientor-green); }
.rating-heart[data-color="yellow"] { color: var(--patientor-yellow); }
.rating-heart[data-color="orange"] { color: var(--patientor-orange); }
.rating-heart[data-color="red"] { color: var(--patientor-red); }

.entry-diagnoses h4 {
  margin: 8px 0 4px;
}

.entry-form-card {
  border-top: 1px solid var(--patientor-card-border);
  margin-top: 20px;
  padding-top: 16px;
}

.entry-form {
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.form-field {
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.form-field input,
.form-field select {
  padding: 8px 10px;
  border: 1px solid var(--patientor-card-border);
  border-radius: 8px;
  font: inherit;
}

.form-field.has-error input {
  border-color: var(--patientor-error);
}

.field-error {
  color: var(--patientor-error);
  font-size: 0.8rem;
}

.form-error {
  background: var(--patientor-error-bg);
  color: var(--patientor-error);
  border-radius: 8px;
  padding: 10px 12px;
  margin-bottom: 12px;
}

.diagnosis-selection {
  border: 1px solid var(--patientor-card-border);
  border-radius: 8px;
  max-height: 180px;
  overflow-y: auto;
}

.diagnosis-option {
  display: flex;
  gap: 8px;
  align-items: center;
  font-size: 0.9rem;
}

.form-actions {
  display: flex;
  justify-content: space-between;
}

.button-reset,
.button-add {
  border: none;
  border-radius: 8px;
  padding: 8px 18px;
  color: #ffffff;
  cursor: pointer;
}

.button-reset { background: var(--patientor-red); }
.button-add { background: var(--patientor-green); }

.button-add:disabled {
  opacity: 0.45;
  cursor: not-allowed;
}

@media (max-width: 860px) {
  .patientor-body {
    grid-template-columns: 1fr;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-patientor-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
