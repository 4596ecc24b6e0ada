use crate::app::App;
use crate::dom;
use crate::input;
use glam::Vec2;
use snap_core::{effect_for, GestureOutcome};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
struct PointerWiring {
    canvas: web::HtmlCanvasElement,
    app: Rc<RefCell<App>>,
    last_client: Rc<Cell<Option<Vec2>>>,
}

pub fn wire_pointer_handlers(app: Rc<RefCell<App>>, canvas: web::HtmlCanvasElement) {
    let w = PointerWiring {
        canvas,
        app,
        last_client: Rc::new(Cell::new(None)),
    };
    listen(&w, "pointermove", on_move);
    listen(&w, "pointerdown", on_down);
    listen(&w, "pointerup", on_up);
    listen(&w, "pointerleave", on_leave);
    listen(&w, "pointercancel", on_leave);
}

fn listen(w: &PointerWiring, event: &str, handler: fn(&PointerWiring, &web::PointerEvent)) {
    let wiring = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        handler(&wiring, &ev);
    }) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn on_move(w: &PointerWiring, ev: &web::PointerEvent) {
    let current = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
    let delta = input::position_delta(w.last_client.replace(Some(current)), current);
    if delta != Vec2::ZERO {
        w.app.borrow_mut().session.pointer_move(delta);
    }
}

fn on_down(w: &PointerWiring, ev: &web::PointerEvent) {
    let mut app = w.app.borrow_mut();
    let Some(t) = app.transport_sec() else {
        return;
    };
    if app.session.pointer_down(ev.button(), t) == GestureOutcome::HoldStarted {
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }
}

fn on_up(w: &PointerWiring, ev: &web::PointerEvent) {
    let mut app = w.app.borrow_mut();
    let Some(t) = app.transport_sec() else {
        return;
    };
    let outcome = app.session.pointer_up(t, dom::now_ms());
    if let GestureOutcome::Released { hold_sec, .. } = outcome.gesture {
        _ = w.canvas.release_pointer_capture(ev.pointer_id());
        log::debug!(
            "[mouse] released after {:.2}s, spawned={:?}",
            hold_sec,
            outcome.spawned
        );
    }
    if let Some(result) = app.take_new_snap() {
        if let Some(audio) = app.audio.as_ref() {
            audio.play_tone(effect_for(result.quality).tone);
        }
    }
}

fn on_leave(w: &PointerWiring, _ev: &web::PointerEvent) {
    w.last_client.set(None);
    if w.app.borrow_mut().session.pointer_leave() == GestureOutcome::Abandoned {
        log::debug!("[mouse] pointer left mid-hold, snap abandoned");
    }
}
