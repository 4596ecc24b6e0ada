//! Snap timing evaluation against the beat grid.
//!
//! Pure functions: given a release time (transport seconds), the tempo and the
//! calibration offset, find the nearest beat and grade the signed deviation.

use crate::constants::{DEFAULT_BPM, SNAP_GOOD_WINDOW_MS, SNAP_PERFECT_WINDOW_MS};

/// Timing tiers, tightest to loosest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimingQuality {
    Lock,
    Wobble,
    Reject,
}

impl TimingQuality {
    pub const ALL: [TimingQuality; 3] = [
        TimingQuality::Lock,
        TimingQuality::Wobble,
        TimingQuality::Reject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimingQuality::Lock => "lock",
            TimingQuality::Wobble => "wobble",
            TimingQuality::Reject => "reject",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingResult {
    pub quality: TimingQuality,
    /// Milliseconds from the nearest beat; negative = early, positive = late.
    pub delta_ms: f64,
    /// Nominal beat index nearest the release, without offset correction.
    pub beat_position: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingWindows {
    pub perfect_ms: f64,
    pub good_ms: f64,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            perfect_ms: SNAP_PERFECT_WINDOW_MS,
            good_ms: SNAP_GOOD_WINDOW_MS,
        }
    }
}

// Ties go to the later beat.
#[inline]
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn beat_duration_sec(bpm: f64) -> f64 {
    let bpm = if bpm.is_finite() && bpm > 0.0 {
        bpm
    } else {
        log::warn!("[snap] invalid tempo {} for timing, using {}", bpm, DEFAULT_BPM);
        DEFAULT_BPM
    };
    60.0 / bpm
}

/// Signed milliseconds from the nearest beat after removing `offset_ms`.
pub fn calculate_timing_delta(release_sec: f64, bpm: f64, offset_ms: f64) -> f64 {
    let adjusted = release_sec - offset_ms / 1000.0;
    let beat = beat_duration_sec(bpm);
    let nearest = round_half_up(adjusted / beat);
    (adjusted - nearest * beat) * 1000.0
}

pub fn classify_timing(delta_ms: f64, perfect_ms: f64, good_ms: f64) -> TimingQuality {
    let abs = delta_ms.abs();
    if abs <= perfect_ms {
        TimingQuality::Lock
    } else if abs <= good_ms {
        TimingQuality::Wobble
    } else {
        TimingQuality::Reject
    }
}

/// Nearest beat index for a raw transport time (no offset applied).
pub fn nearest_beat_position(transport_sec: f64, bpm: f64) -> i64 {
    round_half_up(transport_sec / beat_duration_sec(bpm)) as i64
}

pub fn evaluate_release(
    release_sec: f64,
    bpm: f64,
    offset_ms: f64,
    perfect_ms: f64,
    good_ms: f64,
) -> TimingResult {
    let delta_ms = calculate_timing_delta(release_sec, bpm, offset_ms);
    TimingResult {
        quality: classify_timing(delta_ms, perfect_ms, good_ms),
        delta_ms,
        beat_position: nearest_beat_position(release_sec, bpm),
    }
}

/// Evaluator bound to a set of windows.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimingEvaluator {
    pub windows: TimingWindows,
}

impl TimingEvaluator {
    pub fn new(windows: TimingWindows) -> Self {
        Self { windows }
    }

    #[inline]
    pub fn evaluate(&self, release_sec: f64, bpm: f64, offset_ms: f64) -> TimingResult {
        evaluate_release(
            release_sec,
            bpm,
            offset_ms,
            self.windows.perfect_ms,
            self.windows.good_ms,
        )
    }

    #[inline]
    pub fn classify(&self, delta_ms: f64) -> TimingQuality {
        classify_timing(delta_ms, self.windows.perfect_ms, self.windows.good_ms)
    }
}
