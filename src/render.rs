//! 2D canvas painter. Everything is drawn top-down: world (x, z) maps to
//! canvas (x, y) through a [`ViewTransform`].

use crate::constants::{BACKGROUND, FLASH_RING_RADIUS, GRID_COLOR, PULSE_INDICATOR_RADIUS_PX};
use crate::view::{css_rgba, glow, ViewTransform};
use glam::Vec2;
use snap_core::constants::{BEATS_PER_MEASURE, CURSOR_COLOR, PARTICLE_COLOR, PARTICLE_RADIUS};
use snap_core::{
    burst_frame, cursor_look, flash_frame, ghost_look, pulse_envelope, ClockState,
    ParticleRegistry, SnapVisual, WaveNavigator,
};
use std::f64::consts::TAU;
use web_sys as web;

pub struct Scene<'a> {
    pub pulse: ClockState,
    pub wave: &'a WaveNavigator,
    pub particles: &'a ParticleRegistry,
    pub visual: Option<SnapVisual>,
    pub now_ms: f64,
}

#[inline]
fn plane(v: glam::Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

fn disc(ctx: &web::CanvasRenderingContext2d, at: Vec2, radius_px: f32, fill: &str) {
    ctx.begin_path();
    _ = ctx.arc(at.x as f64, at.y as f64, radius_px.max(0.5) as f64, 0.0, TAU);
    ctx.set_fill_style_str(fill);
    ctx.fill();
}

fn ring(ctx: &web::CanvasRenderingContext2d, at: Vec2, radius_px: f32, width_px: f64, stroke: &str) {
    ctx.begin_path();
    _ = ctx.arc(at.x as f64, at.y as f64, radius_px.max(0.5) as f64, 0.0, TAU);
    ctx.set_line_width(width_px);
    ctx.set_stroke_style_str(stroke);
    ctx.stroke();
}

fn draw_grid(ctx: &web::CanvasRenderingContext2d, view: &ViewTransform, w: f64, h: f64) {
    let half = Vec2::new(w as f32, h as f32) * 0.5 / view.px_per_unit;
    let min = (view.focus - half).floor();
    let max = (view.focus + half).ceil();
    ctx.begin_path();
    let mut x = min.x;
    while x <= max.x {
        let px = view.to_px(Vec2::new(x, 0.0)).x as f64;
        ctx.move_to(px, 0.0);
        ctx.line_to(px, h);
        x += 1.0;
    }
    let mut z = min.y;
    while z <= max.y {
        let py = view.to_px(Vec2::new(0.0, z)).y as f64;
        ctx.move_to(0.0, py);
        ctx.line_to(w, py);
        z += 1.0;
    }
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.stroke();
}

/// Beat indicator in the top-left corner plus one dot per beat of the measure.
fn draw_pulse(ctx: &web::CanvasRenderingContext2d, pulse: &ClockState) {
    let look = pulse_envelope(pulse.phase);
    let r = PULSE_INDICATOR_RADIUS_PX as f32;
    let center = Vec2::new(r * 2.0, r * 2.0);
    disc(ctx, center, r * look.scale, &css_rgba(glow([1.0, 1.0, 1.0], look.emissive), 0.9));
    for i in 0..BEATS_PER_MEASURE {
        let at = center + Vec2::new(r * 2.0 + i as f32 * r * 0.8, 0.0);
        let alpha = if i == pulse.beat { 0.95 } else { 0.25 };
        disc(ctx, at, r * 0.2, &css_rgba([0.8, 0.9, 1.0], alpha));
    }
}

pub fn draw(ctx: &web::CanvasRenderingContext2d, view: &ViewTransform, scene: &Scene<'_>) {
    let w = view.center_px.x as f64 * 2.0;
    let h = view.center_px.y as f64 * 2.0;
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);
    draw_grid(ctx, view, w, h);

    let beat = pulse_envelope(scene.pulse.phase);
    let particle_fill = css_rgba(glow(PARTICLE_COLOR, beat.emissive), 0.9);
    let particle_r = view.len_px(PARTICLE_RADIUS * beat.scale);
    for node in scene.particles.iter() {
        disc(ctx, view.to_px(plane(node.position)), particle_r, &particle_fill);
    }

    if let Some(ghost) = ghost_look(scene.wave.hold(), scene.pulse.phase) {
        ring(
            ctx,
            view.to_px(ghost.position),
            view.len_px(ghost.scale),
            2.0,
            &css_rgba(glow(PARTICLE_COLOR, ghost.emissive), ghost.opacity),
        );
    }

    let cursor = cursor_look(
        scene.wave.normalized_speed(),
        scene.wave.charge(),
        scene.pulse.phase,
    );
    let cursor_at = view.to_px(scene.wave.position());
    disc(
        ctx,
        cursor_at,
        view.len_px(cursor.scale),
        &css_rgba(glow(CURSOR_COLOR, cursor.emissive), 1.0),
    );

    if let Some(visual) = scene.visual.as_ref() {
        if let Some(flash) = flash_frame(visual, scene.now_ms) {
            ring(
                ctx,
                view.to_px(plane(flash.center)),
                view.len_px(FLASH_RING_RADIUS * flash.scale),
                3.0,
                &css_rgba(glow(flash.color, flash.emissive), flash.opacity),
            );
        }
        if let Some(burst) = burst_frame(visual, scene.now_ms) {
            let fill = css_rgba(glow(burst.color, burst.intensity), 1.0 - burst.progress);
            for spark in burst.positions() {
                disc(ctx, view.to_px(plane(spark)), view.len_px(burst.scale), &fill);
            }
        }
    }

    draw_pulse(ctx, &scene.pulse);
}
