//! Pointer gesture handling for wave mode.
//!
//! `idle -> pressed` on a primary-button press, back to `idle` on release or
//! when the pointer leaves the surface. A release is graded against the beat,
//! published on the [`SnapSignal`] bus, and asks for a spawn unless rejected.
//! A leave abandons the gesture without grading it.

use crate::timing::{TimingEvaluator, TimingQuality, TimingResult};
use crate::wave::WaveNavigator;

/// `MouseEvent.button` value of the primary button.
pub const PRIMARY_BUTTON: i16 = 0;

/// Transient bus carrying the most recent snap result.
///
/// Consumers poll and compare [`SnapSignal::sequence`] to notice new results;
/// clearing does not bump the sequence.
#[derive(Clone, Debug, Default)]
pub struct SnapSignal {
    latest: Option<TimingResult>,
    sequence: u64,
}

impl SnapSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, result: TimingResult) {
        self.latest = Some(result);
        self.sequence += 1;
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    #[inline]
    pub fn latest(&self) -> Option<TimingResult> {
        self.latest
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    Ignored,
    HoldStarted,
    Released {
        result: TimingResult,
        /// True when the caller should spawn at the cursor.
        spawn: bool,
        hold_sec: f64,
    },
    Abandoned,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum GestureState {
    #[default]
    Idle,
    Pressed {
        at_sec: f64,
    },
}

#[derive(Debug, Default)]
pub struct InteractionCoordinator {
    state: GestureState,
}

impl InteractionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, GestureState::Pressed { .. })
    }

    /// Transport time of the press in flight.
    pub fn pressed_at(&self) -> Option<f64> {
        match self.state {
            GestureState::Pressed { at_sec } => Some(at_sec),
            GestureState::Idle => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        button: i16,
        transport_sec: f64,
        wave: &mut WaveNavigator,
    ) -> GestureOutcome {
        if button != PRIMARY_BUTTON || self.is_pressed() {
            return GestureOutcome::Ignored;
        }
        self.state = GestureState::Pressed {
            at_sec: transport_sec,
        };
        wave.start_hold();
        GestureOutcome::HoldStarted
    }

    /// Grade the release and publish it on `signal`. `grid_sec` is the
    /// release time on the constant-tempo beat grid at `bpm`
    /// (see [`TimeKeeper::grid_seconds_at`](crate::clock::TimeKeeper::grid_seconds_at));
    /// `transport_sec` only measures the hold.
    pub fn pointer_up(
        &mut self,
        transport_sec: f64,
        grid_sec: f64,
        bpm: f64,
        offset_ms: f64,
        wave: &mut WaveNavigator,
        signal: &mut SnapSignal,
    ) -> GestureOutcome {
        let GestureState::Pressed { at_sec } = self.state else {
            return GestureOutcome::Ignored;
        };
        self.state = GestureState::Idle;

        let evaluator = TimingEvaluator::new(wave.config().timing_windows());
        let result = evaluator.evaluate(grid_sec, bpm, offset_ms);
        signal.emit(result);
        wave.end_hold();

        log::debug!(
            "[snap] {} {:+.1}ms beat {}",
            result.quality.as_str(),
            result.delta_ms,
            result.beat_position
        );
        GestureOutcome::Released {
            result,
            spawn: result.quality != TimingQuality::Reject,
            hold_sec: (transport_sec - at_sec).max(0.0),
        }
    }

    pub fn pointer_leave(&mut self, wave: &mut WaveNavigator) -> GestureOutcome {
        if !self.is_pressed() {
            return GestureOutcome::Ignored;
        }
        self.state = GestureState::Idle;
        wave.end_hold();
        GestureOutcome::Abandoned
    }
}
