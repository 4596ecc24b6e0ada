use crate::app::App;
use crate::constants::{OFFSET_STEP_MS, TEMPO_STEP_BPM};
use crate::dom;
use crate::input::{action_for_key, KeyAction};
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_global_keydown(app: Rc<RefCell<App>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &app);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &Rc<RefCell<App>>) {
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    let mut a = app.borrow_mut();
    match action {
        KeyAction::TempoUp | KeyAction::TempoDown => {
            let step = if action == KeyAction::TempoUp {
                TEMPO_STEP_BPM
            } else {
                -TEMPO_STEP_BPM
            };
            let target = a.session.clock().bpm() + step;
            let bpm = a.session.set_tempo(target);
            log::info!("[keys] bpm={:.0}", bpm);
            a.persist();
            ev.prevent_default();
        }
        KeyAction::OffsetUp | KeyAction::OffsetDown => {
            let step = if action == KeyAction::OffsetUp {
                OFFSET_STEP_MS
            } else {
                -OFFSET_STEP_MS
            };
            let offset = a.session.sync().sync_offset() + step;
            a.session.set_sync_offset(offset);
            log::info!("[keys] sync offset={:+.0}ms", offset);
            a.persist();
        }
        KeyAction::ResetStats => {
            a.session.reset_sync_stats();
            log::info!("[keys] sync stats reset");
        }
        KeyAction::ClearParticles => {
            a.session.clear_particles();
            log::info!("[keys] particles cleared");
        }
        KeyAction::ToggleKick => {
            a.kick_muted = !a.kick_muted;
            log::info!("[keys] kick muted={}", a.kick_muted);
        }
        KeyAction::ToggleOverlay => {
            if let Some(document) = dom::window_document() {
                overlay::toggle(&document);
            }
        }
    }
}
