use crate::app::App;
use crate::constants::HUD_REFRESH_MS;
use crate::dom;
use crate::overlay;
use crate::render;
use crate::view::{self, HudModel, ViewTransform};
use instant::Instant;
use snap_core::{PulseHandle, SnapVisualSlot};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: Rc<RefCell<App>>,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,
    pub pulse: PulseHandle,
    pub visual: SnapVisualSlot,
    pub last_instant: Instant,
    pub last_beat: Option<i64>,
    pub last_hud_ms: f64,
}

impl FrameContext {
    pub fn new(
        app: Rc<RefCell<App>>,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
        ctx2d: web::CanvasRenderingContext2d,
    ) -> Self {
        let (pulse, visual) = {
            let a = app.borrow();
            (a.session.pulse_handle(), a.session.visual_slot())
        };
        Self {
            app,
            document,
            canvas,
            ctx2d,
            pulse,
            visual,
            last_instant: Instant::now(),
            last_beat: None,
            last_hud_ms: f64::NEG_INFINITY,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = view::clamp_frame_dt((now - self.last_instant).as_secs_f32());
        self.last_instant = now;
        let now_ms = dom::now_ms();

        let app_rc = self.app.clone();
        let mut app = app_rc.borrow_mut();
        app.session.step(dt_sec);

        // the pulse slot runs a lookahead ahead of the speakers; draw what is heard
        let audible = app.audible_clock();
        let pulse = audible.unwrap_or_else(|| self.pulse.read());
        if let Some(state) = audible {
            self.log_beat_crossing(&mut app, state.position);
        }

        let view = ViewTransform::fit(self.canvas.width(), self.canvas.height())
            .centered_on(app.session.wave().position());
        render::draw(
            &self.ctx2d,
            &view,
            &render::Scene {
                pulse,
                wave: app.session.wave(),
                particles: app.session.particles(),
                visual: self.visual.get(),
                now_ms,
            },
        );

        if now_ms - self.last_hud_ms >= HUD_REFRESH_MS {
            self.last_hud_ms = now_ms;
            let sync = app.session.sync();
            let html = view::hud_html(&HudModel {
                bpm: app.session.clock().bpm(),
                offset_ms: sync.sync_offset(),
                stats: sync.stats(),
                status: sync.status(),
                last: app.session.signal().latest(),
                particles: app.session.particles().len(),
                kick_muted: app.kick_muted,
                audio_ready: app.session.audio().is_ready(),
            });
            overlay::update_hud(&self.document, &html);
        }
    }

    /// The frame that first shows a new audible beat is the visual half of a
    /// sync pair; its partner is the kick logged by the scheduler.
    fn log_beat_crossing(&mut self, app: &mut App, position_beats: f64) {
        let beat = view::beat_index(position_beats);
        if self.last_beat == Some(beat) {
            return;
        }
        self.last_beat = Some(beat);
        let Some(now) = app.audio.as_ref().map(|a| a.now()) else {
            return;
        };
        if let Some(delta) = app.session.log_visual_event(now * 1000.0) {
            log::debug!("[sync] beat {} drift {:+.1}ms", beat, delta);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
