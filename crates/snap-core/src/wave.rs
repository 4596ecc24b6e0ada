//! Inertial "wave" navigation on the ground plane.
//!
//! Pointer deltas feed a damped velocity; the position integrates it. Holding
//! the primary button brakes harder and accumulates charge; once charge passes
//! the lock threshold the cursor is pulled back to where the hold began.
//!
//! Vectors are `glam::Vec2` where `x` is world X and `y` is world Z.
//! Constants were tuned at 60 fps; every step rescales them by `dt * 60`.

use crate::constants::{
    CHARGE_LOCK_THRESHOLD, CHARGE_RATE_PER_SEC, HOLD_BRAKE_FACTOR, LOCK_CATCH_UP_RATE,
    SNAP_GOOD_WINDOW_MS, SNAP_PERFECT_WINDOW_MS, WAVE_DAMPING, WAVE_INERTIA_THRESHOLD,
    WAVE_MAX_SPEED, WAVE_REFERENCE_FPS, WAVE_SENSITIVITY,
};
use crate::timing::TimingWindows;
use glam::Vec2;

/// Frame duration the physics constants were tuned for.
pub const REFERENCE_FRAME_DT: f32 = 1.0 / WAVE_REFERENCE_FPS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Per-frame velocity retention, `(0, 1]`.
    pub damping: f32,
    pub sensitivity: f32,
    pub max_speed: f32,
    /// Extra damping multiplier while holding, `(0, 1]`.
    pub hold_brake_factor: f32,
    /// Charge gained per second of hold.
    pub charge_rate: f32,
    pub charge_lock_threshold: f32,
    pub perfect_window_ms: f64,
    pub good_window_ms: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            damping: WAVE_DAMPING,
            sensitivity: WAVE_SENSITIVITY,
            max_speed: WAVE_MAX_SPEED,
            hold_brake_factor: HOLD_BRAKE_FACTOR,
            charge_rate: CHARGE_RATE_PER_SEC,
            charge_lock_threshold: CHARGE_LOCK_THRESHOLD,
            perfect_window_ms: SNAP_PERFECT_WINDOW_MS,
            good_window_ms: SNAP_GOOD_WINDOW_MS,
        }
    }
}

impl WaveConfig {
    pub fn timing_windows(&self) -> TimingWindows {
        TimingWindows {
            perfect_ms: self.perfect_window_ms,
            good_ms: self.good_window_ms,
        }
    }

    fn merge(&mut self, patch: &WaveConfigPatch) {
        accept("damping", &mut self.damping, patch.damping, |v| v > 0.0 && v <= 1.0);
        accept("sensitivity", &mut self.sensitivity, patch.sensitivity, |v| {
            v.is_finite() && v >= 0.0
        });
        accept("max_speed", &mut self.max_speed, patch.max_speed, |v| {
            v.is_finite() && v > 0.0
        });
        accept(
            "hold_brake_factor",
            &mut self.hold_brake_factor,
            patch.hold_brake_factor,
            |v| v > 0.0 && v <= 1.0,
        );
        accept("charge_rate", &mut self.charge_rate, patch.charge_rate, |v| {
            v.is_finite() && v >= 0.0
        });
        accept(
            "charge_lock_threshold",
            &mut self.charge_lock_threshold,
            patch.charge_lock_threshold,
            |v| (0.0..=1.0).contains(&v),
        );
        accept(
            "perfect_window_ms",
            &mut self.perfect_window_ms,
            patch.perfect_window_ms,
            |v| v.is_finite() && v >= 0.0,
        );
        accept(
            "good_window_ms",
            &mut self.good_window_ms,
            patch.good_window_ms,
            |v| v.is_finite() && v >= 0.0,
        );
        if self.good_window_ms < self.perfect_window_ms {
            log::warn!(
                "[wave] good window {}ms is tighter than perfect window {}ms; wobble is unreachable",
                self.good_window_ms,
                self.perfect_window_ms
            );
        }
    }
}

fn accept<T>(name: &str, slot: &mut T, proposed: Option<T>, valid: impl Fn(T) -> bool)
where
    T: Copy + std::fmt::Display,
{
    if let Some(v) = proposed {
        if valid(v) {
            *slot = v;
        } else {
            log::warn!("[wave] rejected {}={}, keeping {}", name, v, slot);
        }
    }
}

/// Partial update for [`WaveConfig`]; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveConfigPatch {
    pub damping: Option<f32>,
    pub sensitivity: Option<f32>,
    pub max_speed: Option<f32>,
    pub hold_brake_factor: Option<f32>,
    pub charge_rate: Option<f32>,
    pub charge_lock_threshold: Option<f32>,
    pub perfect_window_ms: Option<f64>,
    pub good_window_ms: Option<f64>,
}

/// Hold/charge state. The lock point only exists while holding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum HoldState {
    #[default]
    Idle,
    Holding { charge: f32, lock_position: Vec2 },
}

/// Scale `v` down to `max_speed` keeping its direction.
#[inline]
pub fn clamp_velocity(v: Vec2, max_speed: f32) -> Vec2 {
    let mag = v.length();
    if mag <= max_speed {
        v
    } else {
        v * (max_speed / mag)
    }
}

#[inline]
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct WaveNavigator {
    position: Vec2,
    velocity: Vec2,
    hold: HoldState,
    config: WaveConfig,
}

impl WaveNavigator {
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    #[inline]
    pub fn hold(&self) -> HoldState {
        self.hold
    }

    #[inline]
    pub fn is_holding(&self) -> bool {
        matches!(self.hold, HoldState::Holding { .. })
    }

    pub fn charge(&self) -> f32 {
        match self.hold {
            HoldState::Holding { charge, .. } => charge,
            HoldState::Idle => 0.0,
        }
    }

    pub fn lock_position(&self) -> Option<Vec2> {
        match self.hold {
            HoldState::Holding { lock_position, .. } => Some(lock_position),
            HoldState::Idle => None,
        }
    }

    /// Whether the charge-lock pull currently overrides normal motion.
    pub fn is_locked(&self) -> bool {
        matches!(self.hold, HoldState::Holding { charge, .. } if charge >= self.config.charge_lock_threshold)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Speed in `[0, 1]` relative to `max_speed`.
    pub fn normalized_speed(&self) -> f32 {
        (self.speed() / self.config.max_speed).min(1.0)
    }

    /// Add a pointer movement delta (pixels) to the velocity.
    pub fn update_velocity(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let v = self.velocity + delta * self.config.sensitivity;
        self.velocity = clamp_velocity(v, self.config.max_speed);
    }

    /// Damp the velocity and integrate the position for a frame of `dt` seconds.
    pub fn apply_damping(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        if let HoldState::Holding {
            charge,
            lock_position,
        } = self.hold
        {
            if charge >= self.config.charge_lock_threshold {
                let t = (LOCK_CATCH_UP_RATE * dt).min(1.0);
                self.position = self.position.lerp(lock_position, t);
                self.velocity = Vec2::ZERO;
                return;
            }
        }

        let time_scale = dt * WAVE_REFERENCE_FPS;
        let base = if self.is_holding() {
            self.config.damping * self.config.hold_brake_factor
        } else {
            self.config.damping
        };
        self.velocity *= base.powf(time_scale);
        if self.velocity.length() < WAVE_INERTIA_THRESHOLD {
            self.velocity = Vec2::ZERO;
        }
        self.position += self.velocity * time_scale;
    }

    /// Accumulate hold charge, saturating at 1.
    pub fn update_charge(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        if let HoldState::Holding { charge, .. } = &mut self.hold {
            *charge = (*charge + dt * self.config.charge_rate).clamp(0.0, 1.0);
        }
    }

    /// One render frame: damping/integration, then charge while holding.
    pub fn step(&mut self, dt: f32) {
        self.apply_damping(dt);
        if self.is_holding() {
            self.update_charge(dt);
        }
    }

    pub fn start_hold(&mut self) {
        self.hold = HoldState::Holding {
            charge: 0.0,
            lock_position: self.position,
        };
    }

    pub fn end_hold(&mut self) {
        self.hold = HoldState::Idle;
    }

    /// Merge tunables without touching position or velocity (beyond re-clamping
    /// the velocity to a lowered `max_speed`).
    pub fn set_config(&mut self, patch: WaveConfigPatch) {
        self.config.merge(&patch);
        self.velocity = clamp_velocity(self.velocity, self.config.max_speed);
    }

    pub fn set_position(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Back to rest at the origin; configuration is kept.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.hold = HoldState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_patch_values_keep_previous() {
        let mut w = WaveNavigator::default();
        w.set_config(WaveConfigPatch {
            damping: Some(1.5),
            max_speed: Some(-1.0),
            sensitivity: Some(0.01),
            ..Default::default()
        });
        assert_eq!(w.config().damping, WAVE_DAMPING);
        assert_eq!(w.config().max_speed, WAVE_MAX_SPEED);
        assert_eq!(w.config().sensitivity, 0.01);
    }

    #[test]
    fn lowering_max_speed_reclamps_velocity() {
        let mut w = WaveNavigator::default();
        w.update_velocity(Vec2::new(10_000.0, 0.0));
        w.set_config(WaveConfigPatch {
            max_speed: Some(0.2),
            ..Default::default()
        });
        assert!((w.speed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn invalid_dt_is_a_no_op() {
        let mut w = WaveNavigator::default();
        w.update_velocity(Vec2::new(40.0, 0.0));
        let before = w.velocity();
        w.apply_damping(f32::NAN);
        w.apply_damping(-0.5);
        assert_eq!(w.velocity(), before);
    }
}
