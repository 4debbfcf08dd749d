//! Single-reel rotational state machine: spin, decelerate, snap, settle.

use fruitspin_core::config::MachineConfig;
use fruitspin_core::symbol::SymbolId;
use fruitspin_core::types::RoundId;
use rand::Rng;

use crate::rng::weighted_sequence;

/// Lifecycle phase of one reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelPhase {
    /// Never spun, or reset by an aborted round.
    Idle,
    /// Rotating under deceleration.
    Spinning,
    /// Easing toward the nearest face-aligned rotation.
    Snapping,
    /// At rest; `settled_symbol` is set.
    Settled,
}

/// Emitted exactly once per reel per round, on the tick the snap completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelSettled {
    pub round: RoundId,
    pub reel: usize,
    pub symbol: SymbolId,
}

/// Snap animation bookkeeping, present only while `Snapping`.
#[derive(Debug, Clone, Copy)]
struct SnapState {
    from: f32,
    to: f32,
    elapsed: f32,
}

/// One reel. Mutated only from the coordinator's tick path.
#[derive(Debug, Clone)]
pub struct ReelEngine {
    index: usize,
    round: RoundId,
    phase: ReelPhase,
    angular_velocity: f32,
    rotation: f32,
    symbol_sequence: Vec<SymbolId>,
    settled_symbol: Option<SymbolId>,
    /// Whether the reel may leave `Spinning`. Held reels keep creeping at `min_speed`.
    released: bool,
    snap: Option<SnapState>,
}

impl ReelEngine {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            round: RoundId::default(),
            phase: ReelPhase::Idle,
            angular_velocity: 0.0,
            rotation: 0.0,
            symbol_sequence: Vec::new(),
            settled_symbol: None,
            released: false,
            snap: None,
        }
    }

    /// Begin a spin for `round`: repopulate faces by weighted sampling and
    /// clear the previous result. Rotation carries over from the last rest.
    pub fn start_spin<R: Rng + ?Sized>(
        &mut self,
        round: RoundId,
        initial_velocity: f32,
        pool: &[(SymbolId, u32)],
        config: &MachineConfig,
        rng: &mut R,
    ) {
        self.round = round;
        self.symbol_sequence = weighted_sequence(rng, pool, config.segment_count);
        self.settled_symbol = None;
        self.angular_velocity = initial_velocity;
        self.released = false;
        self.snap = None;
        self.phase = ReelPhase::Spinning;
        log::debug!(
            "Reel {} spinning at {:.2} rad/s (round {})",
            self.index,
            initial_velocity,
            round
        );
    }

    /// Allow the reel to leave `Spinning` once it drops below `min_speed`.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Return to `Idle`, dropping any in-flight motion and result.
    pub fn reset(&mut self) {
        self.phase = ReelPhase::Idle;
        self.angular_velocity = 0.0;
        self.settled_symbol = None;
        self.released = false;
        self.snap = None;
    }

    /// Advance the state machine by `dt` seconds. Returns the settle report on
    /// the tick the reel comes to rest, `None` otherwise.
    pub fn tick(&mut self, dt: f32, config: &MachineConfig) -> Option<ReelSettled> {
        match self.phase {
            ReelPhase::Idle | ReelPhase::Settled => None,
            ReelPhase::Spinning => {
                self.step_spin(dt, config);
                None
            }
            ReelPhase::Snapping => self.step_snap(dt, config),
        }
    }

    fn step_spin(&mut self, dt: f32, config: &MachineConfig) {
        self.rotation += self.angular_velocity * dt;
        self.angular_velocity *= config.decay_factor(dt);

        if self.angular_velocity.abs() >= config.min_speed {
            return;
        }
        if !self.released {
            // Hold at the creep speed until the stagger trigger fires
            self.angular_velocity = config.min_speed.copysign(self.angular_velocity);
            return;
        }

        let to = nearest_face_rotation(self.rotation, config.segment_angle());
        self.snap = Some(SnapState {
            from: self.rotation,
            to,
            elapsed: 0.0,
        });
        self.angular_velocity = 0.0;
        self.phase = ReelPhase::Snapping;
        log::debug!(
            "Reel {} snapping {:.3} -> {:.3}",
            self.index,
            self.rotation,
            to
        );
    }

    fn step_snap(&mut self, dt: f32, config: &MachineConfig) -> Option<ReelSettled> {
        let snap = self.snap.as_mut()?;
        snap.elapsed += dt;
        let progress = (snap.elapsed / config.snap_duration).min(1.0);
        let eased = ease_out_cubic(progress);
        self.rotation = snap.from + (snap.to - snap.from) * eased;

        if progress < 1.0 {
            return None;
        }

        let target = snap.to;
        self.snap = None;
        let index = segment_index_at(target, config.segment_count);
        // Canonical representative in [0, TAU) keeps rotation bounded across rounds
        self.rotation = index as f32 * config.segment_angle();

        // A sequence shorter than segment_count is a precondition violation;
        // wrap rather than crash the frame loop.
        let symbol = *self
            .symbol_sequence
            .get(index % self.symbol_sequence.len().max(1))?;
        self.settled_symbol = Some(symbol);
        self.phase = ReelPhase::Settled;
        log::debug!(
            "Reel {} settled on face {} ({:?})",
            self.index,
            index,
            symbol
        );
        Some(ReelSettled {
            round: self.round,
            reel: self.index,
            symbol,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn symbol_sequence(&self) -> &[SymbolId] {
        &self.symbol_sequence
    }

    pub fn settled_symbol(&self) -> Option<SymbolId> {
        self.settled_symbol
    }
}

/// Cubic ease-out: fast start, gentle landing. `t` in [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// The face-aligned rotation closest to `rotation` (ties round away from zero).
pub fn nearest_face_rotation(rotation: f32, segment_angle: f32) -> f32 {
    (rotation / segment_angle).round() * segment_angle
}

/// Face index under the payline for a rotation, always in `0..segment_count`.
/// Tolerates float drift and negative or multi-turn rotations.
pub fn segment_index_at(rotation: f32, segment_count: usize) -> usize {
    if segment_count == 0 {
        return 0;
    }
    let segment_angle = std::f32::consts::TAU / segment_count as f32;
    let steps = (rotation / segment_angle).round() as i64;
    steps.rem_euclid(segment_count as i64) as usize
}
