use glam::Vec2;

/// Keyboard commands of the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    TempoUp,
    TempoDown,
    OffsetUp,
    OffsetDown,
    ResetStats,
    ClearParticles,
    ToggleKick,
    ToggleOverlay,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "+" | "=" | "ArrowUp" => Some(KeyAction::TempoUp),
        "-" | "_" | "ArrowDown" => Some(KeyAction::TempoDown),
        "]" => Some(KeyAction::OffsetUp),
        "[" => Some(KeyAction::OffsetDown),
        "r" | "R" => Some(KeyAction::ResetStats),
        "c" | "C" => Some(KeyAction::ClearParticles),
        "m" | "M" => Some(KeyAction::ToggleKick),
        "h" | "H" => Some(KeyAction::ToggleOverlay),
        _ => None,
    }
}

/// Pointer travel in CSS pixels between two successive client positions.
/// Screen down maps to world +Z.
#[inline]
pub fn position_delta(prev: Option<Vec2>, current: Vec2) -> Vec2 {
    match prev {
        Some(p) => current - p,
        None => Vec2::ZERO,
    }
}
