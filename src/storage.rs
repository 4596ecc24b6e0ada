//! localStorage adapter for the persisted settings.

use snap_core::constants::{CLOCK_STORAGE_KEY, SYNC_STORAGE_KEY};
use snap_core::Settings;
use web_sys as web;

fn local_storage() -> Option<web::Storage> {
    web::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn load_settings() -> Settings {
    let Some(store) = local_storage() else {
        log::warn!("[storage] localStorage unavailable, using defaults");
        return Settings::default();
    };
    let clock = store.get_item(CLOCK_STORAGE_KEY).ok().flatten();
    let sync = store.get_item(SYNC_STORAGE_KEY).ok().flatten();
    let settings = Settings::hydrate(clock.as_deref(), sync.as_deref());
    log::info!(
        "[storage] loaded bpm={:.0} offset={:+.0}ms",
        settings.bpm,
        settings.sync_offset_ms
    );
    settings
}

pub fn save_settings(settings: &Settings) {
    let Some(store) = local_storage() else {
        return;
    };
    match settings.to_entries() {
        Ok(entries) => {
            for (key, json) in entries.iter() {
                if let Err(e) = store.set_item(key, json) {
                    log::warn!("[storage] write '{}' failed: {:?}", key, e);
                }
            }
        }
        Err(e) => log::warn!("[storage] encode failed: {}", e),
    }
}
