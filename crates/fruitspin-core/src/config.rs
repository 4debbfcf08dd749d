use serde::{Deserialize, Serialize};

use crate::constants::*;

/// How the deceleration factor is applied to reel velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecayMode {
    /// `velocity *= deceleration` once per tick, independent of `dt`.
    /// Spin length depends on frame rate.
    #[default]
    PerFrame,
    /// `velocity *= deceleration.powf(dt)`: deceleration is the fraction
    /// of speed kept after one second.
    PerSecond,
}

/// Every tunable of the machine. Loaded from `data/machine.ron`;
/// omitted fields fall back to the defaults in `constants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub reel_count: usize,
    pub segment_count: usize,
    pub base_speed: f32,
    pub speed_spread: f32,
    pub bell_curve_samples: u32,
    pub deceleration: f32,
    pub decay_mode: DecayMode,
    pub min_speed: f32,
    pub snap_duration: f32,
    pub stop_stagger: f32,
    pub spin_cooldown: f32,
    pub jackpot_threshold: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            reel_count: DEFAULT_REEL_COUNT,
            segment_count: DEFAULT_SEGMENT_COUNT,
            base_speed: DEFAULT_BASE_SPEED,
            speed_spread: DEFAULT_SPEED_SPREAD,
            bell_curve_samples: DEFAULT_BELL_CURVE_SAMPLES,
            deceleration: DEFAULT_DECELERATION,
            decay_mode: DecayMode::PerFrame,
            min_speed: DEFAULT_MIN_SPEED,
            snap_duration: DEFAULT_SNAP_DURATION,
            stop_stagger: DEFAULT_STOP_STAGGER,
            spin_cooldown: DEFAULT_SPIN_COOLDOWN,
            jackpot_threshold: DEFAULT_JACKPOT_THRESHOLD,
        }
    }
}

impl MachineConfig {
    /// Angle between adjacent faces in radians.
    pub fn segment_angle(&self) -> f32 {
        std::f32::consts::TAU / self.segment_count as f32
    }

    /// Inclusive band initial reel speeds are drawn from.
    pub fn speed_range(&self) -> (f32, f32) {
        (
            self.base_speed * (1.0 - self.speed_spread),
            self.base_speed * (1.0 + self.speed_spread),
        )
    }

    /// Velocity multiplier for one tick of length `dt` seconds.
    pub fn decay_factor(&self, dt: f32) -> f32 {
        match self.decay_mode {
            DecayMode::PerFrame => self.deceleration,
            DecayMode::PerSecond => self.deceleration.powf(dt),
        }
    }

    /// Upper bound on ticks of length `dt` for a freely decaying reel
    /// starting at `initial_speed` to drop below `min_speed`.
    pub fn spin_tick_bound(&self, initial_speed: f32, dt: f32) -> u32 {
        let v0 = initial_speed.abs();
        if v0 < self.min_speed {
            return 1;
        }
        let per_tick = self.decay_factor(dt);
        let ticks = (self.min_speed / v0).ln() / per_tick.ln();
        ticks.ceil() as u32 + 1
    }

    /// Upper bound on ticks for a snap animation to finish.
    pub fn snap_tick_bound(&self, dt: f32) -> u32 {
        (self.snap_duration / dt).ceil() as u32 + 1
    }

    /// Upper bound on ticks for every reel of a round to settle, assuming
    /// the fastest possible initial speed and the last reel's release delay.
    pub fn round_tick_bound(&self, dt: f32) -> u32 {
        let (_, max_speed) = self.speed_range();
        let spin = self.spin_tick_bound(max_speed, dt);
        let last_release = self.stop_stagger * self.reel_count.saturating_sub(1) as f32;
        let release = (last_release / dt).ceil() as u32 + 1;
        spin.max(release) + 1 + self.snap_tick_bound(dt)
    }
}
