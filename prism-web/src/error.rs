//! Errors raised while mounting and drawing the WebGL scene.

use prism_core::{ConfigError, ViewError};
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    MissingCanvas(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("could not create a WebGL2 context")]
    ContextUnavailable,
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
    #[error("shader program link failed: {0}")]
    ProgramLink(String),
    #[error("vertex attribute '{0}' is missing from the shader program")]
    MissingAttribute(&'static str),
    #[error("failed to create a GPU buffer")]
    Buffer,
    #[error("JavaScript error: {0}")]
    Js(String),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<WebError> for JsValue {
    fn from(error: WebError) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}
