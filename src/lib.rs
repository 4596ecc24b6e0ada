#![cfg(target_arch = "wasm32")]
use crate::app::App;
use crate::audio::AudioEngine;
use crate::constants::{CANVAS_ID, OVERLAY_OK_ID};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod scheduler;
mod storage;
mod view;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("snap-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;
    let ctx2d = dom::context_2d(&canvas)?;
    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::wire_canvas_resize(&canvas);

    let app = Rc::new(RefCell::new(App::new(storage::load_settings())));

    wire_overlay_ok(&document, &app);
    events::wire_global_keydown(app.clone());
    events::wire_pointer_handlers(app.clone(), canvas.clone());
    scheduler::start(app.clone())?;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        app, document, canvas, ctx2d,
    )));
    frame::start_loop(frame_ctx);
    Ok(())
}

// Audio may only start from a user gesture, so the overlay button doubles as
// the start (and retry) control.
fn wire_overlay_ok(document: &web::Document, app: &Rc<RefCell<App>>) {
    let app = app.clone();
    dom::add_click_listener(document, OVERLAY_OK_ID, move || {
        if let Some(d) = dom::window_document() {
            overlay::hide(&d);
        }
        let app = app.clone();
        spawn_local(async move {
            start_audio(&app).await;
        });
    });
}

async fn start_audio(app: &Rc<RefCell<App>>) {
    let ctx = {
        let mut a = app.borrow_mut();
        if a.session.audio().is_ready() {
            return;
        }
        if a.audio.is_none() {
            match AudioEngine::new() {
                Ok(engine) => a.audio = Some(engine),
                Err(e) => {
                    _ = a.session.audio_mut().record_start(Err(e));
                    return;
                }
            }
        }
        match a.audio.as_ref() {
            Some(engine) => engine.context().clone(),
            None => return,
        }
    };

    let outcome = audio::resume(ctx).await;
    let mut a = app.borrow_mut();
    if a.session.audio_mut().record_start(outcome).is_ok() {
        a.begin_transport();
    } else if let Some(d) = dom::window_document() {
        overlay::show(&d);
    }
}
