use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reasons a page effect could not attach. Only `Config` ever reaches the
/// host; the rest downgrade the affected effect to an inert handle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MountError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("2d context unavailable")]
    NoContext,
    #[error("js error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<JsValue> for MountError {
    fn from(v: JsValue) -> Self {
        MountError::Js(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

impl From<MountError> for JsValue {
    fn from(e: MountError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
