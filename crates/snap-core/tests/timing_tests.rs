// Beat-grid timing evaluation.

use snap_core::constants::{SNAP_GOOD_WINDOW_MS, SNAP_PERFECT_WINDOW_MS};
use snap_core::{
    calculate_timing_delta, classify_timing, evaluate_release, nearest_beat_position,
    TimingEvaluator, TimingQuality, TimingWindows,
};

const EPS: f64 = 1e-6;

fn classify(delta_ms: f64) -> TimingQuality {
    classify_timing(delta_ms, SNAP_PERFECT_WINDOW_MS, SNAP_GOOD_WINDOW_MS)
}

#[test]
fn releases_on_the_beat_lock() {
    for bpm in [60.0, 90.0, 120.0, 150.0, 180.0] {
        let beat = 60.0 / bpm;
        for k in 0..16 {
            let r = evaluate_release(k as f64 * beat, bpm, 0.0, 40.0, 90.0);
            assert!(r.delta_ms.abs() < EPS, "bpm {bpm} beat {k}: {}", r.delta_ms);
            assert_eq!(r.quality, TimingQuality::Lock);
            assert_eq!(r.beat_position, k);
        }
    }
}

#[test]
fn offset_shifted_beats_lock() {
    // adjusted time lands on the beat once the offset is removed
    let r = evaluate_release(1.0 + 0.035, 120.0, 35.0, 40.0, 90.0);
    assert!(r.delta_ms.abs() < EPS);
    assert_eq!(r.quality, TimingQuality::Lock);
}

#[test]
fn classification_is_symmetric() {
    let mut x = 0.0;
    while x < 200.0 {
        assert_eq!(classify(x), classify(-x), "at {x}");
        x += 0.37;
    }
}

#[test]
fn window_edges_are_inclusive() {
    let e = 1e-3;
    assert_eq!(classify(SNAP_PERFECT_WINDOW_MS), TimingQuality::Lock);
    assert_eq!(classify(SNAP_PERFECT_WINDOW_MS + e), TimingQuality::Wobble);
    assert_eq!(classify(SNAP_GOOD_WINDOW_MS), TimingQuality::Wobble);
    assert_eq!(classify(SNAP_GOOD_WINDOW_MS + e), TimingQuality::Reject);
    assert_eq!(classify(-SNAP_GOOD_WINDOW_MS - e), TimingQuality::Reject);
}

#[test]
fn late_release_between_windows_wobbles() {
    let r = evaluate_release(0.55, 120.0, 0.0, 40.0, 90.0);
    assert_eq!(r.quality, TimingQuality::Wobble);
    assert!((r.delta_ms - 50.0).abs() < EPS);
    assert_eq!(r.beat_position, 1);
}

#[test]
fn early_release_is_negative() {
    let d = calculate_timing_delta(0.48, 120.0, 0.0);
    assert!((d + 20.0).abs() < EPS);
    assert_eq!(classify(d), TimingQuality::Lock);
}

#[test]
fn far_from_any_beat_rejects() {
    let r = evaluate_release(0.65, 120.0, 0.0, 40.0, 90.0);
    assert!((r.delta_ms - 150.0).abs() < EPS);
    assert_eq!(r.quality, TimingQuality::Reject);
}

// The reported beat index is nominal: it ignores the calibration offset even
// when the offset moves the delta onto a different beat.
#[test]
fn beat_position_ignores_calibration_offset() {
    let r = evaluate_release(0.74, 120.0, -20.0, 40.0, 90.0);
    // delta measured from beat 2 (adjusted 0.76s) ...
    assert!((r.delta_ms + 240.0).abs() < EPS);
    // ... while the nominal index stays on beat 1
    assert_eq!(r.beat_position, 1);
    assert_eq!(nearest_beat_position(0.74, 120.0), 1);
}

#[test]
fn evaluator_uses_its_windows() {
    let tight = TimingEvaluator::new(TimingWindows {
        perfect_ms: 10.0,
        good_ms: 20.0,
    });
    assert_eq!(tight.evaluate(0.515, 120.0, 0.0).quality, TimingQuality::Wobble);
    assert_eq!(tight.classify(25.0), TimingQuality::Reject);
    let default = TimingEvaluator::default();
    assert_eq!(default.evaluate(0.515, 120.0, 0.0).quality, TimingQuality::Lock);
}
