// Host-side tests for the canvas view mapping and HUD text.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
#[path = "../src/view.rs"]
mod view;

use glam::Vec2;
use snap_core::{SyncMonitor, TimingQuality, TimingResult};
use view::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn fit_uses_the_shorter_side() {
    let v = ViewTransform::fit(800, 600);
    assert_eq!(v.center_px, Vec2::new(400.0, 300.0));
    assert!(approx(v.px_per_unit, 600.0 / constants::VIEW_WORLD_SPAN));
    let tall = ViewTransform::fit(300, 900);
    assert!(approx(tall.px_per_unit, 300.0 / constants::VIEW_WORLD_SPAN));
}

#[test]
fn zero_sized_canvas_does_not_divide_by_zero() {
    let v = ViewTransform::fit(0, 0);
    assert!(v.px_per_unit.is_finite() && v.px_per_unit > 0.0);
}

#[test]
fn focus_lands_on_canvas_center() {
    let v = ViewTransform::fit(800, 600).centered_on(Vec2::new(3.0, -2.0));
    assert_eq!(v.to_px(Vec2::new(3.0, -2.0)), v.center_px);
    let one_right = v.to_px(Vec2::new(4.0, -2.0));
    assert!(approx(one_right.x - v.center_px.x, v.px_per_unit));
    // world +Z is screen down
    assert!(v.to_px(Vec2::new(3.0, 0.0)).y > v.center_px.y);
    assert!(approx(v.len_px(2.0), 2.0 * v.px_per_unit));
}

#[test]
fn css_rgba_rounds_and_clamps() {
    assert_eq!(css_rgba([1.0, 0.0, 0.5], 0.5), "rgba(255, 0, 128, 0.500)");
    assert_eq!(css_rgba([2.0, -1.0, 0.0], 3.0), "rgba(255, 0, 0, 1.000)");
}

#[test]
fn glow_dims_at_rest_and_whitens_past_bloom() {
    let rest = glow([1.0, 0.0, 0.0], 0.0);
    assert!(approx(rest[0], 0.35) && approx(rest[1], 0.0));
    let hot = glow([0.0, 0.0, 0.0], 4.0);
    for c in hot {
        assert!(approx(c, 0.21));
    }
}

#[test]
fn beat_index_floors_negative_positions() {
    assert_eq!(beat_index(3.99), 3);
    assert_eq!(beat_index(4.0), 4);
    assert_eq!(beat_index(-0.2), -1);
}

#[test]
fn frame_dt_is_capped_and_sanitised() {
    assert!(approx(clamp_frame_dt(0.016), 0.016));
    assert!(approx(clamp_frame_dt(2.0), constants::MAX_FRAME_DT_SEC));
    assert_eq!(clamp_frame_dt(-0.01), 0.0);
    assert_eq!(clamp_frame_dt(f32::NAN), 0.0);
}

#[test]
fn hud_before_any_sample() {
    let sync = SyncMonitor::new();
    let html = hud_html(&HudModel {
        bpm: 120.0,
        offset_ms: 0.0,
        stats: sync.stats(),
        status: sync.status(),
        last: None,
        particles: 0,
        kick_muted: false,
        audio_ready: false,
    });
    assert!(html.contains("BPM: 120"));
    assert!(html.contains("sync: –"));
    assert!(html.contains("audio off"));
    assert!(!html.contains("kick muted"));
}

#[test]
fn hud_shows_drift_and_last_snap() {
    let mut sync = SyncMonitor::with_offset(-10.0);
    sync.log_audio_event(1000.0);
    sync.log_visual_event(1010.0);
    let html = hud_html(&HudModel {
        bpm: 95.0,
        offset_ms: sync.sync_offset(),
        stats: sync.stats(),
        status: sync.status(),
        last: Some(TimingResult {
            quality: TimingQuality::Wobble,
            delta_ms: 50.0,
            beat_position: 1,
        }),
        particles: 3,
        kick_muted: true,
        audio_ready: true,
    });
    assert!(html.contains("offset -10ms"));
    assert!(html.contains("+10.0ms perfect"));
    assert!(html.contains("(n=1)"));
    assert!(html.contains("wobble +50.0ms @ beat 1"));
    assert!(html.contains("particles 3"));
    assert!(html.contains("kick muted"));
    assert!(!html.contains("audio off"));
}
