//! Audio/visual synchronization monitor.
//!
//! Pairs an audio trigger with the next visual confirmation inside
//! [`SYNC_WINDOW_MS`], keeps a bounded history of the signed deltas
//! (positive = visual late), and stores the user calibration offset that the
//! snap evaluator compensates for. All timestamps are milliseconds.

use crate::constants::{
    SYNC_HISTORY_SIZE, SYNC_STATUS_GOOD_MS, SYNC_STATUS_PERFECT_MS, SYNC_WINDOW_MS,
};
use std::collections::VecDeque;

/// Signed delta between an audio trigger and its visual confirmation.
#[inline]
pub fn measure_sync_delta(audio_ms: f64, visual_ms: f64) -> f64 {
    visual_ms - audio_ms
}

pub fn rolling_average<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + *v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Perfect,
    Good,
    Poor,
}

impl SyncStatus {
    pub fn classify(delta_ms: f64) -> Self {
        let abs = delta_ms.abs();
        if abs <= SYNC_STATUS_PERFECT_MS {
            SyncStatus::Perfect
        } else if abs <= SYNC_STATUS_GOOD_MS {
            SyncStatus::Good
        } else {
            SyncStatus::Poor
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SyncStatus::Perfect => "#4ade80",
            SyncStatus::Good => "#facc15",
            SyncStatus::Poor => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SyncStatus::Perfect => "perfect",
            SyncStatus::Good => "good",
            SyncStatus::Poor => "poor",
        }
    }
}

/// Collected statistics. `min`/`max` are `None` until the first sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncStats {
    pub current: f64,
    pub average: f64,
    pub max: Option<f64>,
    pub min: Option<f64>,
    history: VecDeque<f64>,
}

impl SyncStats {
    pub fn history(&self) -> impl ExactSizeIterator<Item = &f64> + '_ {
        self.history.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn push(&mut self, delta: f64) {
        if self.history.len() == SYNC_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(delta);
        self.current = delta;
        self.average = rolling_average(self.history.iter());
        self.max = Some(self.max.map_or(delta, |m| m.max(delta)));
        self.min = Some(self.min.map_or(delta, |m| m.min(delta)));
    }
}

#[derive(Debug, Default)]
pub struct SyncMonitor {
    stats: SyncStats,
    last_audio_ms: Option<f64>,
    offset_ms: f64,
}

impl SyncMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset_ms: f64) -> Self {
        let mut m = Self::default();
        m.set_sync_offset(offset_ms);
        m
    }

    /// Record an audio trigger; replaces any unmatched earlier trigger.
    pub fn log_audio_event(&mut self, time_ms: f64) {
        self.last_audio_ms = Some(time_ms);
    }

    /// Pair a visual confirmation with the pending audio trigger. Returns the
    /// recorded delta, or `None` when nothing was pending or the pair is stale.
    ///
    /// A match consumes the pending trigger, so each audio event yields at
    /// most one sample; a second visual event before the next trigger is a
    /// no-op instead of pairing with the same beat again.
    pub fn log_visual_event(&mut self, time_ms: f64) -> Option<f64> {
        let audio_ms = self.last_audio_ms?;
        if (time_ms - audio_ms).abs() >= SYNC_WINDOW_MS {
            return None;
        }
        self.last_audio_ms = None;
        let delta = measure_sync_delta(audio_ms, time_ms);
        self.stats.push(delta);
        Some(delta)
    }

    #[inline]
    pub fn pending_audio_time(&self) -> Option<f64> {
        self.last_audio_ms
    }

    /// Store the calibration offset. Only future evaluations are affected.
    pub fn set_sync_offset(&mut self, offset_ms: f64) {
        if offset_ms.is_finite() {
            self.offset_ms = offset_ms;
        } else {
            log::warn!("[sync] ignoring non-finite offset {}", offset_ms);
        }
    }

    #[inline]
    pub fn sync_offset(&self) -> f64 {
        self.offset_ms
    }

    /// Clear all statistics; the calibration offset survives.
    pub fn reset_stats(&mut self) {
        self.stats = SyncStats::default();
        self.last_audio_ms = None;
    }

    #[inline]
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus::classify(self.stats.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_sign_follows_visual_lateness() {
        assert_eq!(measure_sync_delta(1000.0, 1020.0), 20.0);
        assert_eq!(measure_sync_delta(1000.0, 990.0), -10.0);
    }

    #[test]
    fn rolling_average_of_empty_is_zero() {
        let empty: [f64; 0] = [];
        assert_eq!(rolling_average(empty.iter()), 0.0);
        assert_eq!(rolling_average([10.0, 20.0, 30.0].iter()), 20.0);
    }

    #[test]
    fn status_thresholds_are_inclusive() {
        assert_eq!(SyncStatus::classify(30.0), SyncStatus::Perfect);
        assert_eq!(SyncStatus::classify(-30.5), SyncStatus::Good);
        assert_eq!(SyncStatus::classify(60.0), SyncStatus::Good);
        assert_eq!(SyncStatus::classify(61.0), SyncStatus::Poor);
    }

    #[test]
    fn genuine_zero_delta_is_a_real_minimum() {
        let mut m = SyncMonitor::new();
        m.log_audio_event(100.0);
        m.log_visual_event(100.0);
        m.log_audio_event(200.0);
        m.log_visual_event(215.0);
        assert_eq!(m.stats().min, Some(0.0));
        assert_eq!(m.stats().max, Some(15.0));
    }
}
