//! Single source of truth for default tuning values.
//! `MachineConfig::default()` and `data/machine.ron` both carry these;
//! a test in fruitspin-rules keeps the two in sync.

/// Number of reels on the machine.
pub const DEFAULT_REEL_COUNT: usize = 5;

/// Faces per reel, evenly spaced around a full turn.
pub const DEFAULT_SEGMENT_COUNT: usize = 20;

/// Nominal initial angular velocity of a reel (radians per second).
pub const DEFAULT_BASE_SPEED: f32 = 15.0;

/// Half-width of the initial speed band as a fraction of base speed (0.2 => 0.8x..1.2x).
pub const DEFAULT_SPEED_SPREAD: f32 = 0.2;

/// Uniform draws averaged per bell-curve sample.
pub const DEFAULT_BELL_CURVE_SAMPLES: u32 = 6;

/// Velocity multiplier applied per frame (or per second, depending on decay mode).
pub const DEFAULT_DECELERATION: f32 = 0.98;

/// Below this absolute speed a released reel starts snapping.
pub const DEFAULT_MIN_SPEED: f32 = 0.05;

/// Duration of the snap-to-face animation in seconds.
pub const DEFAULT_SNAP_DURATION: f32 = 0.5;

/// Delay between consecutive reel releases in seconds (left-to-right cadence).
pub const DEFAULT_STOP_STAGGER: f32 = 0.2;

/// Seconds after a completed round before the next one may start.
pub const DEFAULT_SPIN_COOLDOWN: f32 = 0.5;

/// Total score at or above which a round is a jackpot.
pub const DEFAULT_JACKPOT_THRESHOLD: u32 = 20;

/// Press-to-release window under which a pointer press counts as a lever pull (ms).
pub const PULL_CLICK_MAX_MS: f64 = 200.0;

/// Pointer travel (CSS pixels) above which a press is treated as a drag.
pub const PULL_DRAG_TOLERANCE_PX: f32 = 6.0;

/// Lever pull progress per second (a full pull takes 1/3 s).
pub const LEVER_PULL_SPEED: f32 = 3.0;

/// Fraction of the remaining angle the lever recovers per frame when returning.
pub const LEVER_RETURN_RATE: f32 = 0.2;

/// Lever rest angle in radians (-45 degrees).
pub const LEVER_REST_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;

/// Lever fully-pulled angle in radians (+45 degrees).
pub const LEVER_PULLED_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Horizontal spacing of reels in scene units; reel i sits at `i * spacing - 2 * spacing`.
pub const REEL_SPACING: f32 = 1.2;
