//! Persisted settings boundary.
//!
//! Only the tempo and the sync calibration offset survive a reload. Each is
//! stored under its own key in the `{"state": ..., "version": 0}` envelope
//! the browser build has always written, so existing saves keep loading.

use crate::clock::clamp_bpm;
use crate::constants::{CLOCK_STORAGE_KEY, DEFAULT_BPM, PERSIST_VERSION, SYNC_STORAGE_KEY};
use crate::error::SnapResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedClock {
    #[serde(default = "default_bpm")]
    pub bpm: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSync {
    #[serde(default)]
    pub sync_offset: f64,
}

pub fn to_json<T: Serialize>(state: T) -> SnapResult<String> {
    let envelope = Envelope {
        state,
        version: PERSIST_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn from_json<T: DeserializeOwned>(raw: &str) -> SnapResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    if envelope.version != PERSIST_VERSION {
        log::debug!(
            "[storage] loading version {} state as version {}",
            envelope.version,
            PERSIST_VERSION
        );
    }
    Ok(envelope.state)
}

/// The persisted subset of the session state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub bpm: f64,
    pub sync_offset_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            sync_offset_ms: 0.0,
        }
    }
}

fn load<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    match from_json(raw?) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("[storage] ignoring unreadable '{}': {}", key, e);
            None
        }
    }
}

impl Settings {
    /// Rebuild settings from the raw stored values, defaulting whatever is
    /// missing or unreadable and clamping the tempo into range.
    pub fn hydrate(clock_raw: Option<&str>, sync_raw: Option<&str>) -> Self {
        let mut settings = Settings::default();
        if let Some(clock) = load::<PersistedClock>(CLOCK_STORAGE_KEY, clock_raw) {
            if clock.bpm.is_finite() {
                settings.bpm = clamp_bpm(clock.bpm);
            }
        }
        if let Some(sync) = load::<PersistedSync>(SYNC_STORAGE_KEY, sync_raw) {
            if sync.sync_offset.is_finite() {
                settings.sync_offset_ms = sync.sync_offset;
            }
        }
        settings
    }

    pub fn partialize(&self) -> (PersistedClock, PersistedSync) {
        (
            PersistedClock { bpm: self.bpm },
            PersistedSync {
                sync_offset: self.sync_offset_ms,
            },
        )
    }

    /// `(key, json)` pairs ready for a key-value store.
    pub fn to_entries(&self) -> SnapResult<[(&'static str, String); 2]> {
        let (clock, sync) = self.partialize();
        Ok([
            (CLOCK_STORAGE_KEY, to_json(clock)?),
            (SYNC_STORAGE_KEY, to_json(sync)?),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_matches_stored_shape() {
        let json = to_json(PersistedSync { sync_offset: 12.5 }).unwrap();
        assert_eq!(json, r#"{"state":{"syncOffset":12.5},"version":0}"#);
    }

    #[test]
    fn hydrate_defaults_on_garbage() {
        let s = Settings::hydrate(Some("not json"), None);
        assert_eq!(s, Settings::default());
    }
}
