// Transport clock and pulse tracker behaviour as seen from outside the crate.

use snap_core::constants::*;
use snap_core::{ClockState, NoteValue, PulseHandle, PulseTracker, SnapError, TimeKeeper};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn set_tempo_stores_clamped_value_over_whole_range() {
    let mut tk = TimeKeeper::new();
    let mut bpm = MIN_BPM;
    while bpm <= MAX_BPM {
        assert_eq!(tk.set_tempo(bpm), bpm);
        assert_eq!(tk.bpm(), bpm);
        bpm += 7.5;
    }
    assert_eq!(tk.set_tempo(12.0), MIN_BPM);
    assert_eq!(tk.set_tempo(MIN_BPM - 0.001), MIN_BPM);
    assert_eq!(tk.set_tempo(400.0), MAX_BPM);
    assert_eq!(tk.bpm(), MAX_BPM);
}

#[test]
fn with_tempo_clamps_without_ramping() {
    let tk = TimeKeeper::with_tempo(20.0);
    assert_eq!(tk.bpm(), MIN_BPM);
    assert_eq!(tk.current_bpm(), MIN_BPM);
    assert!(!tk.is_ramping());
}

#[test]
fn beat_interval_matches_subdivisions() {
    let tk = TimeKeeper::new();
    assert_eq!(tk.beat_interval(NoteValue::Quarter), 192);
    assert_eq!(tk.beat_interval(NoteValue::Eighth), 96);
    assert_eq!(tk.beat_interval(NoteValue::Sixteenth), 48);
    assert_eq!(tk.beat_interval(NoteValue::Measure), 768);
}

#[test]
fn repeat_scheduled_mid_beat_waits_for_next_grid_point() {
    let mut tk = TimeKeeper::new();
    tk.start();
    tk.advance(0.3); // 115.2 ticks
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    tk.schedule_repeat(tk.beat_interval(NoteValue::Quarter), move |t| {
        s.borrow_mut().push(t.tick)
    });
    tk.advance(0.3);
    assert_eq!(*seen.borrow(), vec![192]);
}

#[test]
fn paused_transport_keeps_position() {
    let mut tk = TimeKeeper::new();
    tk.start();
    tk.advance(0.25);
    tk.pause();
    tk.advance(1.0);
    assert!(!tk.is_running());
    assert!((tk.seconds() - 0.25).abs() < 1e-12);
    assert_eq!(tk.ticks(), 96);
}

#[test]
fn advance_to_ignores_earlier_targets() {
    let mut tk = TimeKeeper::new();
    tk.start();
    tk.advance_to(1.0);
    tk.advance_to(0.5);
    assert!((tk.seconds() - 1.0).abs() < 1e-12);
}

#[test]
fn pulse_tracker_follows_sixteenths() {
    let mut tk = TimeKeeper::new();
    let tracker = PulseTracker::attach(&mut tk);
    let handle = tracker.handle();
    tk.start();
    tk.advance(0.625); // 240 ticks, exactly on a sixteenth
    let s = handle.read();
    assert!((s.position - 1.25).abs() < 1e-12);
    assert_eq!(s.beat, 1);
    assert_eq!(s.measure, 0);
    assert!((s.phase - 0.25).abs() < 1e-12);
    assert!(!handle.has_warned());
}

#[test]
fn pulse_wraps_beats_into_measures() {
    let mut tk = TimeKeeper::new();
    let tracker = PulseTracker::attach(&mut tk);
    tk.start();
    tk.advance(2.5); // beat 5
    let s = tracker.snapshot();
    assert_eq!(s.beat, 1);
    assert_eq!(s.measure, 1);
    assert!(s.phase.abs() < 1e-12);
}

#[test]
fn reading_before_first_tick_is_zero_without_warning() {
    let mut tk = TimeKeeper::new();
    let tracker = PulseTracker::attach(&mut tk);
    let handle = tracker.handle();
    assert_eq!(handle.read(), ClockState::default());
    assert!(!handle.has_warned());
    assert_eq!(handle.fallback_warnings(), 0);
}

#[test]
fn detach_leaves_clock_and_other_repeats_running() {
    let mut tk = TimeKeeper::new();
    let beats = Rc::new(RefCell::new(0u32));
    let b = beats.clone();
    tk.schedule_repeat(tk.beat_interval(NoteValue::Quarter), move |_| {
        *b.borrow_mut() += 1
    });
    let mut tracker = PulseTracker::attach(&mut tk);
    let handle = tracker.handle();
    assert_eq!(tk.repeat_count(), 2);

    tracker.detach(&mut tk);
    tracker.detach(&mut tk);
    assert!(!tracker.is_attached());
    assert_eq!(tk.repeat_count(), 1);

    tk.start();
    tk.advance(1.0);
    assert!(tk.is_running());
    assert_eq!(*beats.borrow(), 3);

    assert!(!handle.is_live());
    assert_eq!(handle.read(), ClockState::default());
    assert_eq!(handle.read(), ClockState::default());
    assert!(handle.has_warned());
    assert_eq!(handle.fallback_warnings(), 2);
}

#[test]
fn require_fails_loudly_without_tracker() {
    let h = PulseHandle::detached();
    assert!(matches!(h.require(), Err(SnapError::MissingContext(_))));

    let mut tk = TimeKeeper::new();
    let tracker = PulseTracker::attach(&mut tk);
    assert!(tracker.handle().require().is_ok());
}

#[test]
fn audible_position_trails_a_scheduler_running_ahead() {
    let mut tk = TimeKeeper::new();
    let tracker = PulseTracker::attach(&mut tk);
    let kicks = Rc::new(RefCell::new(Vec::new()));
    let k = kicks.clone();
    tk.schedule_repeat(tk.beat_interval(NoteValue::Quarter), move |t| {
        k.borrow_mut().push(t.seconds)
    });
    tk.start();
    let lookahead = 0.1;
    tk.advance_to(1.0 + lookahead);

    let kick_sec = *kicks.borrow().last().unwrap();
    assert!((kick_sec - 1.0).abs() < 1e-9);
    // the pulse slot already shows the beat the speakers have not played yet
    assert_eq!(tracker.snapshot().beat, 2);

    let tpb = tk.ticks_per_beat();
    let before = ClockState::from_ticks(tk.ticks_at(kick_sec - 0.001).floor() as u64, tpb);
    let after = ClockState::from_ticks(tk.ticks_at(kick_sec + 0.001).floor() as u64, tpb);
    assert_eq!(before.beat, 1);
    assert_eq!(after.beat, 2);
}
