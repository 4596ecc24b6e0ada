// Shell-side tuning: DOM ids, audio scheduling, key steps and view mapping.
// Timing, physics and feedback values live in `snap_core::constants`.

// DOM
pub const CANVAS_ID: &str = "app-canvas";
pub const OVERLAY_ID: &str = "start-overlay";
pub const OVERLAY_OK_ID: &str = "overlay-ok";
pub const HUD_ID: &str = "hint-overlay";

// Lookahead scheduler
pub const SCHEDULER_INTERVAL_MS: i32 = 25;
pub const SCHEDULE_LOOKAHEAD_SEC: f64 = 0.1; // transport runs this far ahead of the audio clock
pub const TRANSPORT_START_DELAY_SEC: f64 = 0.05; // first beat lands slightly after start

// Audio levels
pub const MASTER_GAIN: f32 = 0.8;
pub const KICK_GAIN: f32 = 0.9;
pub const SNAP_TONE_LEVEL: f32 = 1.0;

// Synthesized kick (membrane-style pitch drop)
pub const KICK_START_HZ: f32 = 150.0;
pub const KICK_END_HZ: f32 = 42.0;
pub const KICK_PITCH_DECAY_SEC: f64 = 0.05;
pub const KICK_DECAY_SEC: f64 = 0.4;

// Keyboard steps
pub const TEMPO_STEP_BPM: f64 = 5.0;
pub const OFFSET_STEP_MS: f64 = 5.0;

// View
pub const VIEW_WORLD_SPAN: f32 = 16.0; // world units across the shorter canvas side
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // cap after tab switches
pub const HUD_REFRESH_MS: f64 = 100.0;
pub const PULSE_INDICATOR_RADIUS_PX: f64 = 18.0;
pub const FLASH_RING_RADIUS: f32 = 1.2;
pub const BACKGROUND: &str = "#070a12";
pub const GRID_COLOR: &str = "rgba(80, 110, 150, 0.18)";
