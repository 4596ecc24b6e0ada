//! Lookahead scheduler: a timer keeps the transport slightly ahead of the
//! audio clock and turns every beat it passes into a sample-accurate kick.

use crate::app::App;
use crate::constants::{SCHEDULER_INTERVAL_MS, SCHEDULE_LOOKAHEAD_SEC};
use anyhow::anyhow;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn start(app: Rc<RefCell<App>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let closure = Closure::wrap(Box::new(move || {
        tick(&mut app.borrow_mut());
    }) as Box<dyn FnMut()>);
    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SCHEDULER_INTERVAL_MS,
        )
        .map_err(|e| anyhow!("setInterval failed: {:?}", e))?;
    closure.forget();
    Ok(())
}

fn tick(app: &mut App) {
    let (Some(now), Some(origin)) = (app.audio.as_ref().map(|a| a.now()), app.origin()) else {
        return;
    };
    app.session
        .advance_transport_to(now - origin + SCHEDULE_LOOKAHEAD_SEC);

    for beat_sec in app.take_pending_beats() {
        let at = origin + beat_sec;
        if at < now {
            log::debug!("[scheduler] beat at {:.3}s already passed, skipped", beat_sec);
            continue;
        }
        if !app.kick_muted {
            if let Some(audio) = app.audio.as_ref() {
                audio.schedule_kick(at);
            }
        }
        app.session.log_audio_event(at * 1000.0);
    }
}
