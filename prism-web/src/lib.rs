//! Browser front end for the trackball prism viewer
//!
//! Mounts a WebGL2 renderer on a canvas and routes pointer drags and wheel
//! zoom through the shared [`prism_core::Rotator`].
//!
//! ```js
//! import init, { PrismApp } from "./pkg/prism_web.js";
//! await init();
//! const app = PrismApp.mount("glCanvas");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use prism_core::SceneConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

pub mod app;
pub mod error;
pub mod events;
pub mod renderer;
pub mod shaders;

pub use app::AppContext;
pub use error::WebError;
pub use events::EventBindings;
pub use renderer::{CanvasSurface, SceneRenderer};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(())
}

fn find_canvas(canvas_id: &str) -> Result<HtmlCanvasElement, WebError> {
    let document = web_sys::window()
        .ok_or(WebError::NoWindow)?
        .document()
        .ok_or(WebError::NoDocument)?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| WebError::MissingCanvas(canvas_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| WebError::NotACanvas(canvas_id.to_string()))
}

/// A prism viewer mounted on one canvas. Dropping it (`free()` from
/// JavaScript) removes its event listeners.
#[wasm_bindgen]
pub struct PrismApp {
    context: Rc<RefCell<AppContext>>,
    _bindings: EventBindings,
}

#[wasm_bindgen]
impl PrismApp {
    /// Mount with the default scene.
    pub fn mount(canvas_id: &str) -> Result<PrismApp, JsValue> {
        Ok(Self::mount_config(canvas_id, SceneConfig::default())?)
    }

    /// Mount with a TOML scene description; missing fields use defaults.
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub fn mount_with_config(canvas_id: &str, config_toml: &str) -> Result<PrismApp, JsValue> {
        let config = SceneConfig::from_toml_str(config_toml).map_err(WebError::from)?;
        Ok(Self::mount_config(canvas_id, config)?)
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) -> Result<(), JsValue> {
        Ok(self.context.borrow_mut().reset_view()?)
    }

    #[wasm_bindgen(js_name = setLighting)]
    pub fn set_lighting(&self, enabled: bool) {
        self.context.borrow_mut().set_lighting(enabled);
    }

    #[wasm_bindgen(js_name = setAxesVisible)]
    pub fn set_axes_visible(&self, visible: bool) {
        self.context.borrow_mut().set_axes_visible(visible);
    }

    /// Column-major view matrix as a `Float32Array`.
    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> js_sys::Float32Array {
        let values = self.context.borrow().rotator.view_matrix_array();
        js_sys::Float32Array::from(&values[..])
    }

    /// Column-major view matrix as a plain array of numbers.
    #[wasm_bindgen(js_name = viewMatrixArray)]
    pub fn view_matrix_array(&self) -> js_sys::Array {
        self.context
            .borrow()
            .rotator
            .view_matrix_vec()
            .into_iter()
            .map(|value| JsValue::from_f64(value as f64))
            .collect()
    }

    #[wasm_bindgen(js_name = viewDistance)]
    pub fn view_distance(&self) -> f64 {
        self.context.borrow().rotator.view_distance()
    }

    /// Set the camera distance directly, bypassing the zoom bounds.
    #[wasm_bindgen(js_name = setViewDistance)]
    pub fn set_view_distance(&self, distance: f64) {
        let mut context = self.context.borrow_mut();
        context.rotator.set_view_distance(distance);
        context.repaint();
    }

    pub fn repaint(&self) {
        self.context.borrow_mut().repaint();
    }
}

impl PrismApp {
    fn mount_config(canvas_id: &str, config: SceneConfig) -> Result<PrismApp, WebError> {
        let canvas = find_canvas(canvas_id)?;
        let context = Rc::new(RefCell::new(AppContext::new(canvas, config)?));
        let bindings = EventBindings::install(&context)?;
        log::info!("prism viewer mounted on #{canvas_id}");
        Ok(Self {
            context,
            _bindings: bindings,
        })
    }
}
