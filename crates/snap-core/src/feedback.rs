//! Snap feedback: per-quality effect tables, the shared visual slot, and the
//! per-frame flash/burst math consumed by renderers.
//!
//! The session is the only writer of a [`SnapVisualSlot`]; renderers clone the
//! slot and read it once per frame. Times are milliseconds on the render clock.

use crate::constants::*;
use crate::timing::TimingQuality;
use glam::{Vec2, Vec3};
use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;

/// Height the flash ring and burst sparks float above the ground.
const FEEDBACK_HEIGHT: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub duration_sec: f32,
    pub gain: f32,
}

impl From<(f32, f32, f32)> for ToneSpec {
    fn from((frequency_hz, duration_sec, gain): (f32, f32, f32)) -> Self {
        Self {
            frequency_hz,
            duration_sec,
            gain,
        }
    }
}

/// Everything the audio and visual collaborators need for one quality tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapEffect {
    pub color: [f32; 3],
    pub bloom: f32,
    pub burst_count: u32,
    pub tone: ToneSpec,
}

pub fn effect_for(quality: TimingQuality) -> SnapEffect {
    match quality {
        TimingQuality::Lock => SnapEffect {
            color: SNAP_FLASH_COLOR_LOCK,
            bloom: SNAP_BLOOM_LOCK,
            burst_count: SNAP_BURST_COUNT_LOCK,
            tone: SNAP_TONE_LOCK.into(),
        },
        TimingQuality::Wobble => SnapEffect {
            color: SNAP_FLASH_COLOR_WOBBLE,
            bloom: SNAP_BLOOM_WOBBLE,
            burst_count: SNAP_BURST_COUNT_WOBBLE,
            tone: SNAP_TONE_WOBBLE.into(),
        },
        TimingQuality::Reject => SnapEffect {
            color: SNAP_FLASH_COLOR_REJECT,
            bloom: SNAP_BLOOM_REJECT,
            burst_count: SNAP_BURST_COUNT_REJECT,
            tone: SNAP_TONE_REJECT.into(),
        },
    }
}

/// Overrides applied when a result is turned into a [`SnapVisual`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualFeedbackConfig {
    pub enabled: bool,
    pub burst_count: Option<u32>,
    pub bloom_intensity: Option<f32>,
    pub burst_duration_ms: Option<f64>,
}

impl Default for VisualFeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            burst_count: None,
            bloom_intensity: None,
            burst_duration_ms: None,
        }
    }
}

/// The active snap effect, anchored where the cursor was at release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapVisual {
    pub quality: TimingQuality,
    pub position: Vec2,
    pub timestamp_ms: f64,
    pub burst_count: u32,
    pub bloom_intensity: Option<f32>,
    pub burst_duration_ms: Option<f64>,
}

impl SnapVisual {
    pub fn new(
        quality: TimingQuality,
        position: Vec2,
        timestamp_ms: f64,
        config: &VisualFeedbackConfig,
    ) -> Self {
        Self {
            quality,
            position,
            timestamp_ms,
            burst_count: config
                .burst_count
                .unwrap_or_else(|| effect_for(quality).burst_count),
            bloom_intensity: config.bloom_intensity,
            burst_duration_ms: config.burst_duration_ms,
        }
    }
}

/// Shared single-writer cell holding the active [`SnapVisual`].
#[derive(Clone, Debug, Default)]
pub struct SnapVisualSlot(Rc<Cell<Option<SnapVisual>>>);

impl SnapVisualSlot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> Option<SnapVisual> {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, visual: SnapVisual) {
        self.0.set(Some(visual));
    }

    #[inline]
    pub fn clear(&self) {
        self.0.set(None);
    }
}

#[inline]
fn progress(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0) as f32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashFrame {
    pub center: Vec3,
    pub scale: f32,
    pub emissive: f32,
    pub opacity: f32,
    pub color: [f32; 3],
}

/// Expanding ring at the snap point; `None` once the flash has finished.
pub fn flash_frame(visual: &SnapVisual, now_ms: f64) -> Option<FlashFrame> {
    // a burst duration override stretches the flash too
    let duration = visual.burst_duration_ms.unwrap_or(SNAP_FLASH_DURATION_MS);
    let p = progress(now_ms - visual.timestamp_ms, duration);
    if p >= 1.0 {
        return None;
    }
    let effect = effect_for(visual.quality);
    let eased = (1.0 - p).powi(3);
    Some(FlashFrame {
        center: Vec3::new(visual.position.x, FEEDBACK_HEIGHT, visual.position.y),
        scale: 0.5 + p * 1.5,
        emissive: eased * visual.bloom_intensity.unwrap_or(effect.bloom),
        opacity: eased,
        color: effect.color,
    })
}

/// Unit direction of burst spark `i` on the ground plane.
#[inline]
pub fn burst_direction(i: usize) -> Vec2 {
    let angle = i as f32 / MAX_BURST as f32 * TAU;
    Vec2::new(angle.cos(), angle.sin())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstFrame {
    pub center: Vec3,
    pub count: usize,
    pub progress: f32,
    pub scale: f32,
    pub distance: f32,
    pub intensity: f32,
    pub color: [f32; 3],
}

impl BurstFrame {
    /// World positions of the live sparks.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.count).map(move |i| {
            let d = burst_direction(i) * self.distance;
            self.center + Vec3::new(d.x, 0.0, d.y)
        })
    }
}

/// Sparks flying out of the snap point; `None` when inactive or finished.
pub fn burst_frame(visual: &SnapVisual, now_ms: f64) -> Option<BurstFrame> {
    if visual.burst_count == 0 {
        return None;
    }
    let duration = visual.burst_duration_ms.unwrap_or(SNAP_BURST_DURATION_MS);
    let p = progress(now_ms - visual.timestamp_ms, duration);
    if p >= 1.0 {
        return None;
    }
    let decay = 1.0 - p;
    Some(BurstFrame {
        center: Vec3::new(visual.position.x, FEEDBACK_HEIGHT, visual.position.y),
        count: (visual.burst_count as usize).min(MAX_BURST),
        progress: p,
        scale: decay * 0.15,
        distance: (1.0 - decay * decay) * SNAP_BURST_SPEED,
        intensity: visual
            .bloom_intensity
            .unwrap_or(SNAP_BURST_DEFAULT_INTENSITY),
        color: effect_for(visual.quality).color,
    })
}
