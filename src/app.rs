//! Shared page state behind the event handlers, the scheduler and the frame loop.

use crate::audio::AudioEngine;
use crate::constants::TRANSPORT_START_DELAY_SEC;
use crate::storage;
use snap_core::{ClockState, NoteValue, Settings, SnapSession, TimingResult};
use std::cell::RefCell;
use std::rc::Rc;

pub struct App {
    pub session: SnapSession,
    pub audio: Option<AudioEngine>,
    pub kick_muted: bool,
    /// Audio clock time of transport zero, set once the engine is running.
    origin: Option<f64>,
    /// Transport seconds of beats the clock has reached but the scheduler
    /// has not yet turned into sound.
    pending_beats: Rc<RefCell<Vec<f64>>>,
    last_signal_seq: u64,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let mut session = SnapSession::new(settings);
        let pending_beats = Rc::new(RefCell::new(Vec::new()));
        let queue = pending_beats.clone();
        let quarter = session.clock().beat_interval(NoteValue::Quarter);
        session
            .clock_mut()
            .schedule_repeat(quarter, move |t| queue.borrow_mut().push(t.seconds));
        Self {
            session,
            audio: None,
            kick_muted: false,
            origin: None,
            pending_beats,
            last_signal_seq: 0,
        }
    }

    #[inline]
    pub fn origin(&self) -> Option<f64> {
        self.origin
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.origin.is_some()
    }

    /// Transport seconds on the audio clock.
    pub fn transport_sec(&self) -> Option<f64> {
        Some(self.audio.as_ref()?.now() - self.origin?)
    }

    /// Clock state at the audio clock's present rather than at the
    /// scheduler's lookahead, i.e. the beat that is audible now. `None`
    /// until the first beat's time has been reached.
    pub fn audible_clock(&self) -> Option<ClockState> {
        let t = self.transport_sec()?;
        if t < 0.0 {
            return None;
        }
        let clock = self.session.clock();
        let ticks = clock.ticks_at(t).max(0.0).floor() as u64;
        Some(ClockState::from_ticks(ticks, clock.ticks_per_beat()))
    }

    pub fn begin_transport(&mut self) {
        if self.origin.is_some() {
            return;
        }
        let Some(audio) = self.audio.as_ref() else {
            return;
        };
        let origin = audio.now() + TRANSPORT_START_DELAY_SEC;
        self.origin = Some(origin);
        self.session.start_transport();
        log::info!(
            "[transport] started at audio time {:.3}s, {:.0} BPM",
            origin,
            self.session.clock().bpm()
        );
    }

    pub fn take_pending_beats(&mut self) -> Vec<f64> {
        std::mem::take(&mut *self.pending_beats.borrow_mut())
    }

    /// The latest snap result, once per emission.
    pub fn take_new_snap(&mut self) -> Option<TimingResult> {
        let seq = self.session.signal().sequence();
        if seq == self.last_signal_seq {
            return None;
        }
        self.last_signal_seq = seq;
        self.session.signal().latest()
    }

    pub fn persist(&self) {
        storage::save_settings(&self.session.settings());
    }
}
