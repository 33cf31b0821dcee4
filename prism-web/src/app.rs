//! Shared state behind the browser event handlers.

use std::cell::RefCell;
use std::rc::Rc;

use prism_core::{Renderer, Rotator, SceneConfig, ZoomPolicy};
use web_sys::HtmlCanvasElement;

use crate::error::WebError;
use crate::renderer::{CanvasSurface, SceneRenderer};

pub struct AppContext {
    pub config: SceneConfig,
    pub rotator: Rotator,
    pub zoom: ZoomPolicy,
    renderer: Rc<RefCell<SceneRenderer>>,
}

impl AppContext {
    /// Build the renderer and rotator for a canvas and draw the first frame.
    ///
    /// The control region is taken from the canvas size at this point and is
    /// not rebuilt when the page resizes.
    pub fn new(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<Self, WebError> {
        config.validate()?;
        let rotator = Rotator::new(&CanvasSurface(&canvas), config.view.options())?;
        let renderer = Rc::new(RefCell::new(SceneRenderer::new(canvas, &config)?));

        let repaint_target = Rc::clone(&renderer);
        let rotator = rotator.with_repaint(move |view| {
            if let Err(err) = repaint_target.borrow_mut().draw(view) {
                log::error!("repaint failed: {err}");
            }
        });

        let mut context = Self {
            zoom: config.zoom.policy(),
            config,
            rotator,
            renderer,
        };
        context.rotator.notify_repaint();
        Ok(context)
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.renderer.borrow().canvas().clone()
    }

    pub fn repaint(&mut self) {
        self.rotator.notify_repaint();
    }

    /// Return to the configured orientation, keeping the current zoom.
    pub fn reset_view(&mut self) -> Result<(), WebError> {
        let options = self.config.view.options();
        let distance = self.rotator.view_distance();
        self.rotator
            .set_view(options.direction, options.up, Some(distance))?;
        self.rotator.notify_repaint();
        Ok(())
    }

    /// Apply one wheel delta through the zoom policy.
    pub fn zoom_by(&mut self, delta_y: f64) {
        let distance = self.zoom.apply(self.rotator.view_distance(), delta_y);
        self.rotator.set_view_distance(distance);
        log::debug!("zoom distance {distance:.2}");
        self.rotator.notify_repaint();
    }

    pub fn set_lighting(&mut self, enabled: bool) {
        self.renderer.borrow_mut().set_lighting(enabled);
        self.rotator.notify_repaint();
    }

    pub fn set_axes_visible(&mut self, visible: bool) {
        self.renderer.borrow_mut().set_axes_visible(visible);
        self.rotator.notify_repaint();
    }
}
