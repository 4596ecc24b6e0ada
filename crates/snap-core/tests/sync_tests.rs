// Audio/visual pairing and statistics.

use snap_core::constants::{SYNC_HISTORY_SIZE, SYNC_WINDOW_MS};
use snap_core::{SyncMonitor, SyncStatus};

#[test]
fn paired_events_record_signed_delta() {
    let mut m = SyncMonitor::new();
    m.log_audio_event(1000.0);
    assert_eq!(m.log_visual_event(1020.0), Some(20.0));
    let s = m.stats();
    assert_eq!(s.current, 20.0);
    assert_eq!(s.len(), 1);
    assert_eq!(s.average, 20.0);
    assert_eq!(s.min, Some(20.0));
    assert_eq!(s.max, Some(20.0));
}

#[test]
fn visual_without_audio_is_ignored() {
    let mut m = SyncMonitor::new();
    assert_eq!(m.log_visual_event(1020.0), None);
    assert!(m.stats().is_empty());
    assert_eq!(m.stats().min, None);
}

#[test]
fn stale_pairs_are_dropped() {
    let mut m = SyncMonitor::new();
    m.log_audio_event(1000.0);
    assert_eq!(m.log_visual_event(3000.0), None);
    assert!(m.stats().is_empty());

    m.log_audio_event(1000.0);
    assert_eq!(m.log_visual_event(1000.0 + SYNC_WINDOW_MS), None);
    assert!(m.stats().is_empty());
    assert!(m.log_visual_event(1000.0 + SYNC_WINDOW_MS - 1.0).is_some());
}

#[test]
fn newer_audio_replaces_pending() {
    let mut m = SyncMonitor::new();
    m.log_audio_event(1000.0);
    m.log_audio_event(1100.0);
    assert_eq!(m.log_visual_event(1110.0), Some(10.0));
}

#[test]
fn match_consumes_pending_audio() {
    let mut m = SyncMonitor::new();
    m.log_audio_event(1000.0);
    m.log_visual_event(1010.0);
    assert_eq!(m.pending_audio_time(), None);
    assert_eq!(m.log_visual_event(1020.0), None);
    assert_eq!(m.stats().len(), 1);
}

#[test]
fn history_is_fifo_capped() {
    let mut m = SyncMonitor::new();
    for i in 0..=SYNC_HISTORY_SIZE {
        let t = i as f64 * 1000.0;
        m.log_audio_event(t);
        m.log_visual_event(t + i as f64);
    }
    let s = m.stats();
    assert_eq!(s.len(), SYNC_HISTORY_SIZE);
    // the 0ms sample from the first pair was evicted
    assert_eq!(s.history().next(), Some(&1.0));
    assert_eq!(s.history().last(), Some(&(SYNC_HISTORY_SIZE as f64)));
    let expected = (1..=SYNC_HISTORY_SIZE).sum::<usize>() as f64 / SYNC_HISTORY_SIZE as f64;
    assert!((s.average - expected).abs() < 1e-9);
    // extremes are all-time, not windowed
    assert_eq!(s.min, Some(0.0));
}

#[test]
fn min_and_max_track_negative_deltas() {
    let mut m = SyncMonitor::new();
    for (a, v) in [(0.0, -15.0), (1000.0, 1030.0), (2000.0, 1995.0)] {
        m.log_audio_event(a);
        m.log_visual_event(v);
    }
    assert_eq!(m.stats().min, Some(-15.0));
    assert_eq!(m.stats().max, Some(30.0));
    assert_eq!(m.stats().current, -5.0);
}

#[test]
fn reset_keeps_calibration() {
    let mut m = SyncMonitor::with_offset(25.0);
    m.log_audio_event(0.0);
    m.log_visual_event(12.0);
    m.log_audio_event(1000.0);
    m.reset_stats();
    assert!(m.stats().is_empty());
    assert_eq!(m.stats().max, None);
    assert_eq!(m.pending_audio_time(), None);
    assert_eq!(m.sync_offset(), 25.0);
}

#[test]
fn offset_does_not_touch_history() {
    let mut m = SyncMonitor::new();
    m.log_audio_event(0.0);
    m.log_visual_event(40.0);
    m.set_sync_offset(-10.0);
    m.set_sync_offset(f64::INFINITY);
    assert_eq!(m.sync_offset(), -10.0);
    assert_eq!(m.stats().current, 40.0);
}

#[test]
fn status_reflects_current_delta() {
    let mut m = SyncMonitor::new();
    assert_eq!(m.status(), SyncStatus::Perfect);
    m.log_audio_event(0.0);
    m.log_visual_event(45.0);
    assert_eq!(m.status(), SyncStatus::Good);
    assert_eq!(m.status().color(), "#facc15");
    m.log_audio_event(1000.0);
    m.log_visual_event(1090.0);
    assert_eq!(m.status(), SyncStatus::Poor);
    assert_eq!(m.status().label(), "poor");
}
