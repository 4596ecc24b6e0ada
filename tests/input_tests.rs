// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn tempo_keys_include_shifted_variants() {
    for key in ["+", "=", "ArrowUp"] {
        assert_eq!(action_for_key(key), Some(KeyAction::TempoUp), "{}", key);
    }
    for key in ["-", "_", "ArrowDown"] {
        assert_eq!(action_for_key(key), Some(KeyAction::TempoDown), "{}", key);
    }
}

#[test]
fn letter_keys_ignore_case() {
    assert_eq!(action_for_key("r"), Some(KeyAction::ResetStats));
    assert_eq!(action_for_key("R"), Some(KeyAction::ResetStats));
    assert_eq!(action_for_key("C"), Some(KeyAction::ClearParticles));
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleKick));
    assert_eq!(action_for_key("H"), Some(KeyAction::ToggleOverlay));
}

#[test]
fn brackets_nudge_the_offset() {
    assert_eq!(action_for_key("]"), Some(KeyAction::OffsetUp));
    assert_eq!(action_for_key("["), Some(KeyAction::OffsetDown));
}

#[test]
fn unbound_keys_do_nothing() {
    for key in ["", "x", " ", "Enter", "Escape", "1"] {
        assert_eq!(action_for_key(key), None, "{:?}", key);
    }
}

#[test]
fn first_sample_has_no_travel() {
    assert_eq!(position_delta(None, Vec2::new(300.0, 200.0)), Vec2::ZERO);
}

#[test]
fn travel_is_current_minus_previous() {
    let d = position_delta(Some(Vec2::new(10.0, 20.0)), Vec2::new(14.0, 17.0));
    assert_eq!(d, Vec2::new(4.0, -3.0));
}
