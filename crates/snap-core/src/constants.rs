// Shared timing, physics and feedback tuning constants used by the core and the web shell.

// Master clock
pub const DEFAULT_BPM: f64 = 120.0;
pub const MIN_BPM: f64 = 60.0;
pub const MAX_BPM: f64 = 180.0;
pub const RAMP_DURATION_SEC: f64 = 0.2; // tempo changes glide over this long
pub const TICKS_PER_BEAT: u32 = 192; // transport resolution (PPQ)
pub const BEATS_PER_MEASURE: u32 = 4; // fixed 4/4 meter
pub const PULSE_UPDATES_PER_BEAT: u32 = 4; // sixteenth-note pulse refresh (125ms at 120 BPM)

// Audio/visual sync monitor
pub const SYNC_WINDOW_MS: f64 = 500.0; // max audio->visual gap considered a pair
pub const SYNC_HISTORY_SIZE: usize = 50;
pub const SYNC_STATUS_PERFECT_MS: f64 = 30.0;
pub const SYNC_STATUS_GOOD_MS: f64 = 60.0;

// Snap timing windows (± ms around the nearest beat)
pub const SNAP_PERFECT_WINDOW_MS: f64 = 40.0;
pub const SNAP_GOOD_WINDOW_MS: f64 = 90.0;

// Wave navigation, tuned at 60 fps
pub const WAVE_DAMPING: f32 = 0.95; // per-frame velocity retention
pub const WAVE_INERTIA_THRESHOLD: f32 = 0.001; // speeds below this snap to rest
pub const WAVE_SENSITIVITY: f32 = 0.005; // pointer px -> velocity units
pub const WAVE_MAX_SPEED: f32 = 0.5; // units per frame
pub const WAVE_REFERENCE_FPS: f32 = 60.0;
pub const HOLD_BRAKE_FACTOR: f32 = 0.85; // extra damping multiplier while holding
pub const CHARGE_RATE_PER_SEC: f32 = 1.0;
pub const CHARGE_LOCK_THRESHOLD: f32 = 0.9;
pub const LOCK_CATCH_UP_RATE: f32 = 10.0; // lerp factor per second toward the lock point

// Particles
pub const MAX_PARTICLES: usize = 500;
pub const PARTICLE_ID_LEN: usize = 21;
pub const PARTICLE_RADIUS: f32 = 0.25;
pub const PARTICLE_COLOR: [f32; 3] = [0.0, 0.8, 1.0];

// Snap feedback visuals
pub const SNAP_FLASH_COLOR_LOCK: [f32; 3] = [0.0, 1.0, 0.533]; // #00ff88
pub const SNAP_FLASH_COLOR_WOBBLE: [f32; 3] = [1.0, 0.667, 0.0]; // #ffaa00
pub const SNAP_FLASH_COLOR_REJECT: [f32; 3] = [1.0, 0.2, 0.2]; // #ff3333
pub const SNAP_BLOOM_LOCK: f32 = 4.0;
pub const SNAP_BLOOM_WOBBLE: f32 = 2.5;
pub const SNAP_BLOOM_REJECT: f32 = 1.2;
pub const SNAP_BURST_COUNT_LOCK: u32 = 12;
pub const SNAP_BURST_COUNT_WOBBLE: u32 = 6;
pub const SNAP_BURST_COUNT_REJECT: u32 = 0;
pub const SNAP_FLASH_DURATION_MS: f64 = 300.0;
pub const SNAP_BURST_DURATION_MS: f64 = 500.0;
pub const SNAP_BURST_SPEED: f32 = 3.0; // world units travelled over one burst
pub const SNAP_BURST_DEFAULT_INTENSITY: f32 = 3.0;
pub const MAX_BURST: usize = 16;

// Pulse indicator
pub const PULSE_SCALE_FACTOR: f32 = 0.3; // 1.0 at rest, 1.3 on the beat
pub const PULSE_EMISSIVE_BASE: f32 = 0.5;
pub const PULSE_EMISSIVE_BOOST: f32 = 1.5;

// Wave cursor
pub const CURSOR_BASE_SCALE: f32 = 0.2;
pub const CURSOR_SCALE_BOOST: f32 = 0.5;
pub const CURSOR_EMISSIVE_BASE: f32 = 0.5;
pub const CHARGE_VISUAL_SCALE_BOOST: f32 = 2.0; // full charge doubles the cursor
pub const CURSOR_CHARGE_PULSE_THRESHOLD: f32 = 0.8; // beat pulse kicks in near full charge
pub const CURSOR_COLOR: [f32; 3] = [1.0, 0.0, 1.0]; // #ff00ff

// Ghost preview at the lock point
pub const GHOST_OPACITY_MIN: f32 = 0.1;
pub const GHOST_OPACITY_MAX: f32 = 0.6;
pub const GHOST_EMISSIVE_BASE: f32 = 0.5;
pub const GHOST_EMISSIVE_PULSE_BOOST: f32 = 1.5;
pub const GHOST_CHARGE_PULSE_THRESHOLD: f32 = 0.5;
pub const GHOST_SCALE_FACTOR: f32 = 1.2; // relative to a particle

// Persisted settings
pub const CLOCK_STORAGE_KEY: &str = "clock-storage";
pub const SYNC_STORAGE_KEY: &str = "primitives-sync-settings";
pub const PERSIST_VERSION: u32 = 0;

// Synthesized snap tones (frequency Hz, duration s, peak gain)
pub const SNAP_TONE_LOCK: (f32, f32, f32) = (880.0, 0.12, 0.5);
pub const SNAP_TONE_WOBBLE: (f32, f32, f32) = (660.0, 0.10, 0.35);
pub const SNAP_TONE_REJECT: (f32, f32, f32) = (196.0, 0.15, 0.3);
