//! Beat pulse derived from the master clock.
//!
//! The tracker writes a [`ClockState`] snapshot into a shared cell on every
//! sixteenth-note tick. Render consumers hold a [`PulseHandle`] and pull the
//! latest snapshot once per frame; nothing is notified on write.

use crate::clock::{RepeatId, TimeKeeper, TransportTick};
use crate::constants::{BEATS_PER_MEASURE, PULSE_UPDATES_PER_BEAT};
use crate::error::{SnapError, SnapResult};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Beat-relative clock snapshot. The zero value doubles as the documented
/// fallback for reads outside a live tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockState {
    /// Position in beats since the transport origin.
    pub position: f64,
    /// Beat within the measure, in `0..BEATS_PER_MEASURE`.
    pub beat: u32,
    pub measure: u64,
    /// Normalized position within the current beat, in `[0, 1)`.
    pub phase: f64,
}

impl ClockState {
    pub fn from_ticks(ticks: u64, ticks_per_beat: u32) -> Self {
        let position = ticks as f64 / ticks_per_beat.max(1) as f64;
        let whole = position.floor();
        Self {
            position,
            beat: (whole as u64 % BEATS_PER_MEASURE as u64) as u32,
            measure: (position / BEATS_PER_MEASURE as f64).floor() as u64,
            phase: position - whole,
        }
    }
}

pub struct PulseTracker {
    slot: Rc<Cell<ClockState>>,
    repeat: Option<RepeatId>,
}

impl PulseTracker {
    /// Subscribe to `keeper` at sixteenth-note resolution.
    pub fn attach(keeper: &mut TimeKeeper) -> Self {
        let slot = Rc::new(Cell::new(ClockState::default()));
        let writer = slot.clone();
        let interval = (keeper.ticks_per_beat() / PULSE_UPDATES_PER_BEAT).max(1) as u64;
        let repeat = keeper.schedule_repeat(interval, move |t: &TransportTick| {
            writer.set(ClockState::from_ticks(t.tick, t.ticks_per_beat));
        });
        Self {
            slot,
            repeat: Some(repeat),
        }
    }

    pub fn handle(&self) -> PulseHandle {
        PulseHandle::new(Rc::downgrade(&self.slot))
    }

    #[inline]
    pub fn snapshot(&self) -> ClockState {
        self.slot.get()
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.repeat.is_some()
    }

    /// Unsubscribe from `keeper` without stopping it. Safe to call twice.
    /// Outstanding handles stop being live.
    pub fn detach(&mut self, keeper: &mut TimeKeeper) {
        if let Some(id) = self.repeat.take() {
            keeper.clear(id);
            self.slot = Rc::new(Cell::new(ClockState::default()));
            log::debug!("[pulse] tracker detached");
        }
    }
}

/// Read side of the pulse slot.
///
/// `read` is a telemetry accessor: outside a live tracker it returns the zero
/// [`ClockState`] and warns once per handle. `require` is for consumers that
/// cannot run without a tracker and reports the wiring bug as an error.
pub struct PulseHandle {
    slot: Weak<Cell<ClockState>>,
    warned: Cell<bool>,
    fallbacks: Cell<u32>,
}

impl PulseHandle {
    fn new(slot: Weak<Cell<ClockState>>) -> Self {
        Self {
            slot,
            warned: Cell::new(false),
            fallbacks: Cell::new(0),
        }
    }

    /// A handle that was never connected to a tracker.
    pub fn detached() -> Self {
        Self::new(Weak::new())
    }

    pub fn read(&self) -> ClockState {
        match self.slot.upgrade() {
            Some(slot) => slot.get(),
            None => {
                self.fallbacks.set(self.fallbacks.get() + 1);
                if !self.warned.replace(true) {
                    log::warn!("[pulse] read outside a live tracker, using fallback values");
                }
                ClockState::default()
            }
        }
    }

    pub fn require(&self) -> SnapResult<ClockState> {
        self.slot
            .upgrade()
            .map(|slot| slot.get())
            .ok_or(SnapError::MissingContext("PulseHandle::require"))
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.slot.strong_count() > 0
    }

    /// Number of reads served from the fallback value.
    #[inline]
    pub fn fallback_warnings(&self) -> u32 {
        self.fallbacks.get()
    }

    /// Whether the one-time fallback warning has been logged.
    #[inline]
    pub fn has_warned(&self) -> bool {
        self.warned.get()
    }
}

impl Clone for PulseHandle {
    fn clone(&self) -> Self {
        Self::new(self.slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TICKS_PER_BEAT;

    #[test]
    fn from_ticks_splits_position() {
        let tpb = TICKS_PER_BEAT;
        let s = ClockState::from_ticks(tpb as u64 * 5 + tpb as u64 / 4, tpb);
        assert!((s.position - 5.25).abs() < 1e-12);
        assert_eq!(s.beat, 1);
        assert_eq!(s.measure, 1);
        assert!((s.phase - 0.25).abs() < 1e-12);
    }

    #[test]
    fn detached_handle_warns_once_and_counts() {
        let h = PulseHandle::detached();
        assert_eq!(h.read(), ClockState::default());
        assert_eq!(h.read(), ClockState::default());
        assert!(h.has_warned());
        assert_eq!(h.fallback_warnings(), 2);
        assert!(matches!(h.require(), Err(SnapError::MissingContext(_))));
    }
}
