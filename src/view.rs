//! Pure helpers for the 2D canvas view and the HUD.

use crate::constants::{MAX_FRAME_DT_SEC, VIEW_WORLD_SPAN};
use glam::Vec2;
use snap_core::{SyncStats, SyncStatus, TimingResult};

/// Top-down mapping from the wave plane (x, z) to canvas pixels, following
/// a focus point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub center_px: Vec2,
    pub px_per_unit: f32,
    pub focus: Vec2,
}

impl ViewTransform {
    pub fn fit(width_px: u32, height_px: u32) -> Self {
        let short = width_px.min(height_px).max(1) as f32;
        Self {
            center_px: Vec2::new(width_px as f32 * 0.5, height_px as f32 * 0.5),
            px_per_unit: short / VIEW_WORLD_SPAN,
            focus: Vec2::ZERO,
        }
    }

    pub fn centered_on(self, focus: Vec2) -> Self {
        Self { focus, ..self }
    }

    #[inline]
    pub fn to_px(&self, world: Vec2) -> Vec2 {
        self.center_px + (world - self.focus) * self.px_per_unit
    }

    #[inline]
    pub fn len_px(&self, world_len: f32) -> f32 {
        world_len * self.px_per_unit
    }
}

/// Map an emissive intensity onto a displayable color: dim at rest, blown
/// toward white when the intensity runs past the bloom range.
pub fn glow(color: [f32; 3], emissive: f32) -> [f32; 3] {
    let level = (0.35 + 0.25 * emissive).clamp(0.0, 1.0);
    let white = ((emissive - 2.6) * 0.15).clamp(0.0, 0.6);
    color.map(|c| c * level * (1.0 - white) + white)
}

pub fn css_rgba(color: [f32; 3], alpha: f32) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgba({}, {}, {}, {:.3})", r, g, b, alpha.clamp(0.0, 1.0))
}

#[inline]
pub fn beat_index(position_beats: f64) -> i64 {
    position_beats.floor() as i64
}

#[inline]
pub fn clamp_frame_dt(dt_sec: f32) -> f32 {
    if dt_sec.is_finite() && dt_sec > 0.0 {
        dt_sec.min(MAX_FRAME_DT_SEC)
    } else {
        0.0
    }
}

fn fmt_ms(v: Option<f64>) -> String {
    match v {
        Some(ms) => format!("{:+.1}ms", ms),
        None => "–".to_string(),
    }
}

pub struct HudModel<'a> {
    pub bpm: f64,
    pub offset_ms: f64,
    pub stats: &'a SyncStats,
    pub status: SyncStatus,
    pub last: Option<TimingResult>,
    pub particles: usize,
    pub kick_muted: bool,
    pub audio_ready: bool,
}

pub fn hud_html(m: &HudModel<'_>) -> String {
    let snap = match m.last {
        Some(r) => format!(
            "{} {:+.1}ms @ beat {}",
            r.quality.as_str(),
            r.delta_ms,
            r.beat_position
        ),
        None => "–".to_string(),
    };
    let sync = if m.stats.is_empty() {
        "sync: –".to_string()
    } else {
        format!(
            "sync: <span style='color: {}'>{:+.1}ms {}</span> avg {:+.1}ms min {} max {} (n={})",
            m.status.color(),
            m.stats.current,
            m.status.label(),
            m.stats.average,
            fmt_ms(m.stats.min),
            fmt_ms(m.stats.max),
            m.stats.len()
        )
    };
    format!(
        "<div style='color: #cfe7ff; font: 13px system-ui; background: rgba(10, 14, 24, 0.8); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(80, 110, 150, 0.35);'>BPM: {:.0} • offset {:+.0}ms • particles {}{}{}<br>{}<br>snap: {}</div>",
        m.bpm,
        m.offset_ms,
        m.particles,
        if m.kick_muted { " • kick muted" } else { "" },
        if m.audio_ready { "" } else { " • audio off" },
        sync,
        snap
    )
}
