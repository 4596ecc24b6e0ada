//! Master transport clock.
//!
//! `TimeKeeper` is the single source of beat-relative time. It is advanced by
//! the audio-side scheduler (never by the render loop), integrates ticks from
//! the current tempo, and fires scheduled repeats on the tick grid. Tempo
//! changes glide linearly over [`RAMP_DURATION_SEC`] instead of jumping.

use crate::constants::{
    BEATS_PER_MEASURE, DEFAULT_BPM, MAX_BPM, MIN_BPM, RAMP_DURATION_SEC, TICKS_PER_BEAT,
};
use smallvec::SmallVec;

/// Handle returned by [`TimeKeeper::schedule_repeat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RepeatId(u64);

/// Payload delivered to repeat callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportTick {
    /// Grid tick the repeat fired on.
    pub tick: u64,
    pub ticks_per_beat: u32,
    /// Transport time of the grid tick, interpolated within the advance step.
    pub seconds: f64,
}

impl TransportTick {
    #[inline]
    pub fn beat_position(&self) -> f64 {
        self.tick as f64 / self.ticks_per_beat.max(1) as f64
    }
}

/// Musical subdivisions usable as repeat intervals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteValue {
    Measure,
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteValue {
    pub fn ticks(self, ticks_per_beat: u32) -> u64 {
        let tpb = ticks_per_beat.max(1) as u64;
        match self {
            NoteValue::Measure => tpb * BEATS_PER_MEASURE as u64,
            NoteValue::Quarter => tpb,
            NoteValue::Eighth => (tpb / 2).max(1),
            NoteValue::Sixteenth => (tpb / 4).max(1),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TempoRamp {
    from: f64,
    to: f64,
    elapsed: f64,
    duration: f64,
}

impl TempoRamp {
    fn bpm_at(&self, elapsed: f64) -> f64 {
        let t = if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.from + (self.to - self.from) * t
    }
}

type RepeatCallback = Box<dyn FnMut(&TransportTick)>;

struct Repeat {
    id: RepeatId,
    interval: u64,
    next_tick: u64,
    callback: RepeatCallback,
}

/// Clamp a tempo into the supported range.
#[inline]
pub fn clamp_bpm(bpm: f64) -> f64 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

pub struct TimeKeeper {
    ticks: f64,
    seconds: f64,
    bpm: f64,
    current_bpm: f64,
    ramp: Option<TempoRamp>,
    ticks_per_beat: u32,
    running: bool,
    repeats: Vec<Repeat>,
    next_repeat: u64,
}

impl Default for TimeKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeKeeper {
    pub fn new() -> Self {
        Self::with_tempo(DEFAULT_BPM)
    }

    /// Create a stopped transport already at `bpm` (clamped, no ramp).
    pub fn with_tempo(bpm: f64) -> Self {
        let bpm = if bpm.is_finite() {
            clamp_bpm(bpm)
        } else {
            DEFAULT_BPM
        };
        Self {
            ticks: 0.0,
            seconds: 0.0,
            bpm,
            current_bpm: bpm,
            ramp: None,
            ticks_per_beat: TICKS_PER_BEAT,
            running: false,
            repeats: Vec::new(),
            next_repeat: 0,
        }
    }

    #[inline]
    pub fn ticks_per_beat(&self) -> u32 {
        self.ticks_per_beat
    }

    /// Repeat interval in ticks for a musical subdivision.
    #[inline]
    pub fn beat_interval(&self, division: NoteValue) -> u64 {
        division.ticks(self.ticks_per_beat)
    }

    /// Whole ticks elapsed since the transport origin.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks.max(0.0).floor() as u64
    }

    #[inline]
    pub fn position_ticks(&self) -> f64 {
        self.ticks
    }

    #[inline]
    pub fn beat_position(&self) -> f64 {
        self.ticks / self.ticks_per_beat as f64
    }

    /// Transport time in seconds.
    #[inline]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Clamped tempo target; the value that is reported and persisted.
    #[inline]
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Instantaneous tempo, which lags `bpm()` while a ramp is in flight.
    #[inline]
    pub fn current_bpm(&self) -> f64 {
        self.current_bpm
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.ramp.is_some()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("[clock] transport started at {:.3}s", self.seconds);
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to the origin; repeats restart from tick 0.
    pub fn stop(&mut self) {
        self.running = false;
        self.ticks = 0.0;
        self.seconds = 0.0;
        for r in &mut self.repeats {
            r.next_tick = 0;
        }
    }

    /// Set the tempo. The value is clamped to [`MIN_BPM`, `MAX_BPM`] and the
    /// transport glides toward it; the clamped value is returned.
    pub fn set_tempo(&mut self, bpm: f64) -> f64 {
        if !bpm.is_finite() {
            log::warn!("[clock] ignoring non-finite tempo {}", bpm);
            return self.bpm;
        }
        let clamped = clamp_bpm(bpm);
        self.ramp = Some(TempoRamp {
            from: self.current_bpm,
            to: clamped,
            elapsed: 0.0,
            duration: RAMP_DURATION_SEC,
        });
        self.bpm = clamped;
        log::info!("[clock] tempo -> {:.1} BPM", clamped);
        clamped
    }

    /// Register a callback fired every `interval_ticks` on the transport grid,
    /// starting at the first grid point at or after the current position.
    pub fn schedule_repeat(
        &mut self,
        interval_ticks: u64,
        callback: impl FnMut(&TransportTick) + 'static,
    ) -> RepeatId {
        let interval = interval_ticks.max(1);
        let pos = self.ticks.max(0.0);
        let next_tick = (pos / interval as f64).ceil() as u64 * interval;
        let id = RepeatId(self.next_repeat);
        self.next_repeat += 1;
        self.repeats.push(Repeat {
            id,
            interval,
            next_tick,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a scheduled repeat. Returns false when it was already gone.
    pub fn clear(&mut self, id: RepeatId) -> bool {
        let before = self.repeats.len();
        self.repeats.retain(|r| r.id != id);
        before != self.repeats.len()
    }

    #[inline]
    pub fn repeat_count(&self) -> usize {
        self.repeats.len()
    }

    /// Move the transport forward by `dt_sec` and fire every repeat that
    /// became due, in tick order. No-op while stopped.
    pub fn advance(&mut self, dt_sec: f64) {
        if !self.running || !dt_sec.is_finite() || dt_sec <= 0.0 {
            return;
        }
        let mut remaining = dt_sec;
        // the ramp gets its own step so grid times after it interpolate at a constant tempo
        if let Some(ramp) = self.ramp {
            let span = (ramp.duration - ramp.elapsed).max(0.0).min(remaining);
            if span > 0.0 {
                self.step(span);
                remaining -= span;
            }
        }
        if remaining > 0.0 {
            self.step(remaining);
        }
    }

    /// Advance so that transport time reaches `target_sec`; earlier targets are ignored.
    pub fn advance_to(&mut self, target_sec: f64) {
        self.advance(target_sec - self.seconds);
    }

    fn step(&mut self, dt_sec: f64) {
        let start_ticks = self.ticks;
        let start_seconds = self.seconds;
        self.ticks += self.ticks_over(dt_sec);
        self.seconds += dt_sec;
        self.settle_ramp(dt_sec);
        self.fire_due(start_ticks, start_seconds, dt_sec);
    }

    /// Ticks covered by the next `dt_sec` of transport time, ramp included.
    fn ticks_over(&self, dt_sec: f64) -> f64 {
        let ticks_per_sec = self.ticks_per_beat as f64 / 60.0;
        let mut remaining = dt_sec;
        let mut ticks = 0.0;
        if let Some(ramp) = self.ramp {
            let span = (ramp.duration - ramp.elapsed).max(0.0).min(remaining);
            // linear ramp: the midpoint tempo integrates exactly
            ticks += ramp.bpm_at(ramp.elapsed + span * 0.5) * ticks_per_sec * span;
            remaining -= span;
            if remaining > 0.0 {
                return ticks + ramp.to * ticks_per_sec * remaining;
            }
            return ticks;
        }
        ticks + self.current_bpm * ticks_per_sec * remaining
    }

    fn settle_ramp(&mut self, dt_sec: f64) {
        let Some(mut ramp) = self.ramp.take() else {
            return;
        };
        ramp.elapsed += dt_sec;
        if ramp.elapsed >= ramp.duration {
            self.current_bpm = ramp.to;
        } else {
            self.current_bpm = ramp.bpm_at(ramp.elapsed);
            self.ramp = Some(ramp);
        }
    }

    /// Transport position in ticks at `transport_sec`. Times ahead of the
    /// clock follow the pending ramp; earlier times extrapolate back at the
    /// instantaneous tempo.
    pub fn ticks_at(&self, transport_sec: f64) -> f64 {
        let dt = transport_sec - self.seconds;
        if !dt.is_finite() {
            return self.ticks;
        }
        if dt >= 0.0 {
            self.ticks + self.ticks_over(dt)
        } else {
            self.ticks + dt * self.current_bpm * self.ticks_per_beat as f64 / 60.0
        }
    }

    /// Beat position at `transport_sec` on the tick grid.
    #[inline]
    pub fn beat_position_at(&self, transport_sec: f64) -> f64 {
        self.ticks_at(transport_sec) / self.ticks_per_beat as f64
    }

    /// Map a transport time onto the constant-tempo timeline at `bpm()`, so
    /// that beat `n` of the tick grid lands at exactly `n * 60 / bpm`.
    /// Timing evaluation works in these seconds.
    pub fn grid_seconds_at(&self, transport_sec: f64) -> f64 {
        self.beat_position_at(transport_sec) * 60.0 / self.bpm
    }

    fn fire_due(&mut self, start_ticks: f64, start_seconds: f64, dt_sec: f64) {
        let end = self.ticks;
        let mut due: SmallVec<[(u64, usize); 8]> = SmallVec::new();
        for (idx, r) in self.repeats.iter_mut().enumerate() {
            while r.next_tick as f64 <= end {
                due.push((r.next_tick, idx));
                r.next_tick += r.interval;
            }
        }
        // registration order breaks ties
        due.sort_unstable();
        let span = end - start_ticks;
        for (tick, idx) in due {
            let frac = if span > 0.0 {
                ((tick as f64 - start_ticks) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let event = TransportTick {
                tick,
                ticks_per_beat: self.ticks_per_beat,
                seconds: start_seconds + frac * dt_sec,
            };
            (self.repeats[idx].callback)(&event);
        }
    }
}
