// Per-frame look of the pulse indicator, wave cursor and ghost preview.

use crate::constants::*;
use crate::wave::HoldState;
use glam::Vec2;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Look {
    pub scale: f32,
    pub emissive: f32,
}

/// Beat pulse: peaks on the beat and eases out (cubic) toward the next.
pub fn pulse_envelope(phase: f64) -> Look {
    let t = (1.0 - phase.clamp(0.0, 1.0)) as f32;
    let eased = t * t * t;
    Look {
        scale: 1.0 + eased * PULSE_SCALE_FACTOR,
        emissive: PULSE_EMISSIVE_BASE + eased * PULSE_EMISSIVE_BOOST,
    }
}

#[inline]
fn beat_wave(phase: f64) -> f32 {
    (phase as f32 * TAU).sin() * 0.5 + 0.5
}

/// Cursor grows with speed and charge; near full charge it also throbs on the beat.
pub fn cursor_look(speed_norm: f32, charge: f32, phase: f64) -> Look {
    let speed_norm = speed_norm.clamp(0.0, 1.0);
    let charge = charge.clamp(0.0, 1.0);
    let scale = (CURSOR_BASE_SCALE + speed_norm * CURSOR_SCALE_BOOST)
        * (1.0 + charge * (CHARGE_VISUAL_SCALE_BOOST - 1.0));
    let mut emissive = CURSOR_EMISSIVE_BASE + speed_norm;
    if charge > 0.0 {
        emissive += charge * 2.0;
        if charge > CURSOR_CHARGE_PULSE_THRESHOLD {
            emissive += beat_wave(phase);
        }
    }
    Look { scale, emissive }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostLook {
    pub position: Vec2,
    pub opacity: f32,
    pub emissive: f32,
    pub scale: f32,
}

/// Preview at the lock point; only shown while holding.
pub fn ghost_look(hold: HoldState, phase: f64) -> Option<GhostLook> {
    let HoldState::Holding {
        charge,
        lock_position,
    } = hold
    else {
        return None;
    };
    let mut emissive = GHOST_EMISSIVE_BASE;
    if charge > GHOST_CHARGE_PULSE_THRESHOLD {
        emissive += beat_wave(phase) * GHOST_EMISSIVE_PULSE_BOOST * charge;
    }
    Some(GhostLook {
        position: lock_position,
        opacity: GHOST_OPACITY_MIN + (GHOST_OPACITY_MAX - GHOST_OPACITY_MIN) * charge,
        emissive,
        scale: PARTICLE_RADIUS * GHOST_SCALE_FACTOR,
    })
}
