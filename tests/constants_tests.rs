// Host-side tests for shell constants and how they relate to the core tuning.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn lookahead_covers_several_scheduler_ticks() {
    let interval_sec = SCHEDULER_INTERVAL_MS as f64 / 1000.0;
    assert!(SCHEDULE_LOOKAHEAD_SEC >= 2.0 * interval_sec);
    // the lookahead must stay inside the sync pairing window
    assert!(SCHEDULE_LOOKAHEAD_SEC * 1000.0 < snap_core::constants::SYNC_WINDOW_MS);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn kick_envelope_is_ordered() {
    assert!(KICK_START_HZ > KICK_END_HZ && KICK_END_HZ > 0.0);
    assert!(KICK_PITCH_DECAY_SEC < KICK_DECAY_SEC);
    assert!(MASTER_GAIN > 0.0 && MASTER_GAIN <= 1.0);
    assert!(KICK_GAIN > 0.0 && KICK_GAIN <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn key_steps_fit_the_tempo_range() {
    use snap_core::constants::{MAX_BPM, MIN_BPM};
    assert!(TEMPO_STEP_BPM > 0.0 && TEMPO_STEP_BPM < MAX_BPM - MIN_BPM);
    assert!(OFFSET_STEP_MS > 0.0);
}

#[test]
fn dom_ids_are_distinct() {
    let ids = [CANVAS_ID, OVERLAY_ID, OVERLAY_OK_ID, HUD_ID];
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
