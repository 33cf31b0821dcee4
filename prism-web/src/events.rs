//! DOM listeners that feed pointer and wheel input to the rotator.
//!
//! Only `pointerdown` and `wheel` live on the canvas. Move and end listeners
//! go on the document while a drag is active, so a drag keeps tracking after
//! the pointer leaves the canvas and stops tracking as soon as it is released
//! or cancelled.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Event, HtmlCanvasElement, MouseEvent, PointerEvent,
    WheelEvent, Window,
};

use crate::app::AppContext;
use crate::error::WebError;

/// Document events that end a drag. A cancelled touch counts as a release.
pub const DRAG_END_EVENTS: [&str; 2] = ["pointerup", "pointercancel"];

/// Change to the document listeners called for by one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTransition {
    Attach,
    Detach,
    Keep,
}

/// Decide the listener change for `event_type`.
///
/// `session_changed` is what the rotator reported for the event (a session
/// started or ended) and `attached` whether the document listeners are live.
pub fn drag_transition(event_type: &str, session_changed: bool, attached: bool) -> DragTransition {
    match event_type {
        "pointerdown" if session_changed && !attached => DragTransition::Attach,
        t if attached && DRAG_END_EVENTS.contains(&t) => DragTransition::Detach,
        _ => DragTransition::Keep,
    }
}

/// Pointer position relative to the canvas' top-left corner, in CSS pixels.
fn local_pointer(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    )
}

/// Document listeners that exist only during a drag.
///
/// The end handler reaches back here through a `Weak`, so dropping the
/// owning `Rc` frees both closures.
struct DragTracking {
    document: Document,
    attached: Cell<bool>,
    on_move: Closure<dyn FnMut(PointerEvent)>,
    on_end: Closure<dyn FnMut(PointerEvent)>,
}

impl DragTracking {
    fn new(
        document: Document,
        context: &Rc<RefCell<AppContext>>,
        canvas: &HtmlCanvasElement,
    ) -> Rc<Self> {
        Rc::new_cyclic(|tracking: &Weak<Self>| {
            let on_move = {
                let context = Rc::clone(context);
                let canvas = canvas.clone();
                Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                    let (x, y) = local_pointer(&canvas, &event);
                    context.borrow_mut().rotator.pointer_move(x, y);
                })
            };

            let on_end = {
                let context = Rc::clone(context);
                let tracking = tracking.clone();
                Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                    let ended = context.borrow_mut().rotator.pointer_up();
                    if let Some(tracking) = tracking.upgrade() {
                        tracking.handle(&event.type_(), ended);
                    }
                })
            };

            Self {
                document,
                attached: Cell::new(false),
                on_move,
                on_end,
            }
        })
    }

    fn handle(&self, event_type: &str, session_changed: bool) {
        let result = match drag_transition(event_type, session_changed, self.attached.get()) {
            DragTransition::Attach => self.attach(),
            DragTransition::Detach => self.detach(),
            DragTransition::Keep => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("failed to update drag listeners on {event_type}: {err:?}");
        }
    }

    fn attach(&self) -> Result<(), JsValue> {
        self.document
            .add_event_listener_with_callback("pointermove", self.on_move.as_ref().unchecked_ref())?;
        for event in DRAG_END_EVENTS {
            self.document
                .add_event_listener_with_callback(event, self.on_end.as_ref().unchecked_ref())?;
        }
        self.attached.set(true);
        Ok(())
    }

    fn detach(&self) -> Result<(), JsValue> {
        self.attached.set(false);
        self.document.remove_event_listener_with_callback(
            "pointermove",
            self.on_move.as_ref().unchecked_ref(),
        )?;
        for event in DRAG_END_EVENTS {
            self.document
                .remove_event_listener_with_callback(event, self.on_end.as_ref().unchecked_ref())?;
        }
        Ok(())
    }
}

/// Owns every registered closure; dropping it unregisters them all.
pub struct EventBindings {
    canvas: HtmlCanvasElement,
    window: Window,
    drag: Rc<DragTracking>,
    on_pointer_down: Closure<dyn FnMut(PointerEvent)>,
    on_wheel: Closure<dyn FnMut(WheelEvent)>,
    on_resize: Closure<dyn FnMut(Event)>,
}

impl EventBindings {
    pub fn install(context: &Rc<RefCell<AppContext>>) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let canvas = context.borrow().canvas();

        let drag = DragTracking::new(document, context, &canvas);

        let on_pointer_down = {
            let context = Rc::clone(context);
            let canvas = canvas.clone();
            let drag = Rc::clone(&drag);
            Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                let (x, y) = local_pointer(&canvas, &event);
                let started = context.borrow_mut().rotator.pointer_down(x, y);
                drag.handle(&event.type_(), started);
            })
        };

        let on_wheel = {
            let context = Rc::clone(context);
            Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
                event.prevent_default();
                context.borrow_mut().zoom_by(event.delta_y());
            })
        };

        let on_resize = {
            let context = Rc::clone(context);
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                context.borrow_mut().repaint();
            })
        };

        canvas.add_event_listener_with_callback(
            "pointerdown",
            on_pointer_down.as_ref().unchecked_ref(),
        )?;

        // preventDefault is only honoured on non-passive wheel listeners
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        canvas.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            on_wheel.as_ref().unchecked_ref(),
            &options,
        )?;

        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        log::debug!("canvas event listeners installed");
        Ok(Self {
            canvas,
            window,
            drag,
            on_pointer_down,
            on_wheel,
            on_resize,
        })
    }

    fn uninstall(&self) -> Result<(), JsValue> {
        self.canvas.remove_event_listener_with_callback(
            "pointerdown",
            self.on_pointer_down.as_ref().unchecked_ref(),
        )?;
        self.canvas
            .remove_event_listener_with_callback("wheel", self.on_wheel.as_ref().unchecked_ref())?;
        self.window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())?;
        if self.drag.attached.get() {
            self.drag.detach()?;
        }
        Ok(())
    }
}

impl Drop for EventBindings {
    fn drop(&mut self) {
        if let Err(err) = self.uninstall() {
            log::warn!("failed to remove event listeners: {err:?}");
        }
    }
}
