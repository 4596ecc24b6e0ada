//! One local play session: every core component wired together behind a
//! single control surface for the shell.

use crate::clock::TimeKeeper;
use crate::error::{SnapError, SnapResult};
use crate::feedback::{SnapVisual, SnapVisualSlot, VisualFeedbackConfig};
use crate::interaction::{GestureOutcome, InteractionCoordinator, SnapSignal};
use crate::particles::{ground_position, NodeId, ParticleRegistry};
use crate::persist::Settings;
use crate::pulse::{PulseHandle, PulseTracker};
use crate::sync::SyncMonitor;
use crate::wave::{WaveConfig, WaveConfigPatch, WaveNavigator};
use glam::Vec2;
use std::fmt::Display;

/// Readiness of the audio engine. A failed start leaves the gate closed and
/// can simply be attempted again on the next user gesture.
#[derive(Debug, Default)]
pub struct AudioGate {
    ready: bool,
    attempts: u32,
    last_error: Option<String>,
}

impl AudioGate {
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run a synchronous start routine through the gate.
    pub fn attempt<E: Display>(&mut self, start: impl FnOnce() -> Result<(), E>) -> SnapResult<()> {
        if self.ready {
            return Ok(());
        }
        self.record_start(start())
    }

    /// Record the outcome of a start that completed elsewhere (e.g. a resumed
    /// browser audio context).
    pub fn record_start<E: Display>(&mut self, outcome: Result<(), E>) -> SnapResult<()> {
        self.attempts += 1;
        match outcome {
            Ok(()) => {
                self.ready = true;
                self.last_error = None;
                log::info!("[audio] engine running");
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                log::error!("[audio] start failed (attempt {}): {}", self.attempts, msg);
                self.last_error = Some(msg.clone());
                Err(SnapError::AudioStart(msg))
            }
        }
    }
}

/// What a pointer release produced.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapOutcome {
    pub gesture: GestureOutcome,
    pub spawned: Option<NodeId>,
}

pub struct SnapSession {
    clock: TimeKeeper,
    pulse: PulseTracker,
    sync: SyncMonitor,
    wave: WaveNavigator,
    interaction: InteractionCoordinator,
    signal: SnapSignal,
    particles: ParticleRegistry,
    visual: SnapVisualSlot,
    visual_config: VisualFeedbackConfig,
    audio: AudioGate,
}

impl SnapSession {
    pub fn new(settings: Settings) -> Self {
        Self::with_particles(settings, ParticleRegistry::new())
    }

    /// Deterministic particle ids.
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Self::with_particles(settings, ParticleRegistry::with_seed(seed))
    }

    fn with_particles(settings: Settings, particles: ParticleRegistry) -> Self {
        let mut clock = TimeKeeper::with_tempo(settings.bpm);
        let pulse = PulseTracker::attach(&mut clock);
        Self {
            clock,
            pulse,
            sync: SyncMonitor::with_offset(settings.sync_offset_ms),
            wave: WaveNavigator::new(WaveConfig::default()),
            interaction: InteractionCoordinator::new(),
            signal: SnapSignal::new(),
            particles,
            visual: SnapVisualSlot::new(),
            visual_config: VisualFeedbackConfig::default(),
            audio: AudioGate::default(),
        }
    }

    #[inline]
    pub fn clock(&self) -> &TimeKeeper {
        &self.clock
    }

    /// For schedulers that register their own repeats (e.g. the kick).
    #[inline]
    pub fn clock_mut(&mut self) -> &mut TimeKeeper {
        &mut self.clock
    }

    pub fn pulse_handle(&self) -> PulseHandle {
        self.pulse.handle()
    }

    #[inline]
    pub fn sync(&self) -> &SyncMonitor {
        &self.sync
    }

    #[inline]
    pub fn wave(&self) -> &WaveNavigator {
        &self.wave
    }

    #[inline]
    pub fn signal(&self) -> &SnapSignal {
        &self.signal
    }

    #[inline]
    pub fn particles(&self) -> &ParticleRegistry {
        &self.particles
    }

    /// Shared slot for render consumers; clone freely.
    pub fn visual_slot(&self) -> SnapVisualSlot {
        self.visual.clone()
    }

    #[inline]
    pub fn audio(&self) -> &AudioGate {
        &self.audio
    }

    #[inline]
    pub fn audio_mut(&mut self) -> &mut AudioGate {
        &mut self.audio
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.interaction.is_pressed()
    }

    pub fn pointer_move(&mut self, delta: Vec2) {
        self.wave.update_velocity(delta);
    }

    pub fn pointer_down(&mut self, button: i16, transport_sec: f64) -> GestureOutcome {
        self.interaction
            .pointer_down(button, transport_sec, &mut self.wave)
    }

    /// Grade a release, publish it, refresh the visual slot and spawn on a hit.
    /// The release is judged against the clock's tick grid, so kicks stay on
    /// the beat through tempo changes. `now_ms` stamps the visual on the
    /// render clock.
    pub fn pointer_up(&mut self, transport_sec: f64, now_ms: f64) -> SnapOutcome {
        let grid_sec = self.clock.grid_seconds_at(transport_sec);
        let gesture = self.interaction.pointer_up(
            transport_sec,
            grid_sec,
            self.clock.bpm(),
            self.sync.sync_offset(),
            &mut self.wave,
            &mut self.signal,
        );
        let mut spawned = None;
        if let GestureOutcome::Released { result, spawn, .. } = gesture {
            let position = self.wave.position();
            if self.visual_config.enabled {
                self.visual.set(SnapVisual::new(
                    result.quality,
                    position,
                    now_ms,
                    &self.visual_config,
                ));
            }
            if spawn {
                spawned = self
                    .particles
                    .add_node(ground_position(position), transport_sec);
            }
        }
        SnapOutcome { gesture, spawned }
    }

    pub fn pointer_leave(&mut self) -> GestureOutcome {
        self.interaction.pointer_leave(&mut self.wave)
    }

    pub fn start_transport(&mut self) {
        self.clock.start();
    }

    /// Scheduler-side: move the transport to `transport_sec`.
    pub fn advance_transport_to(&mut self, transport_sec: f64) {
        self.clock.advance_to(transport_sec);
    }

    /// Render-side: one physics frame.
    pub fn step(&mut self, dt_sec: f32) {
        self.wave.step(dt_sec);
    }

    pub fn log_audio_event(&mut self, time_ms: f64) {
        self.sync.log_audio_event(time_ms);
    }

    pub fn log_visual_event(&mut self, time_ms: f64) -> Option<f64> {
        self.sync.log_visual_event(time_ms)
    }

    pub fn set_tempo(&mut self, bpm: f64) -> f64 {
        self.clock.set_tempo(bpm)
    }

    pub fn set_sync_offset(&mut self, offset_ms: f64) {
        self.sync.set_sync_offset(offset_ms);
    }

    pub fn set_wave_config(&mut self, patch: WaveConfigPatch) {
        self.wave.set_config(patch);
    }

    pub fn set_visual_config(&mut self, config: VisualFeedbackConfig) {
        if !config.enabled {
            self.visual.clear();
        }
        self.visual_config = config;
    }

    pub fn reset_sync_stats(&mut self) {
        self.sync.reset_stats();
    }

    pub fn clear_particles(&mut self) {
        self.particles.clear_nodes();
    }

    /// Current persisted subset.
    pub fn settings(&self) -> Settings {
        Settings {
            bpm: self.clock.bpm(),
            sync_offset_ms: self.sync.sync_offset(),
        }
    }
}
