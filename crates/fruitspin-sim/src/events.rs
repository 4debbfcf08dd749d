use fruitspin_core::symbol::SymbolId;
use fruitspin_core::types::{RoundId, WinTier};

/// Aggregated outcome of a completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub round: RoundId,
    /// Settled symbol per reel, in reel order.
    pub symbols: Vec<SymbolId>,
    pub total_score: u32,
    pub tier: WinTier,
}

/// Observable outputs of the simulation, drained by the presentation layer
/// once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A round began; `speeds` are the per-reel initial velocities.
    RoundStarted { round: RoundId, speeds: Vec<f32> },
    /// Reel `reel` may now come to rest.
    ReelReleased { round: RoundId, reel: usize },
    /// Fired once per reel per round.
    ReelSettled {
        round: RoundId,
        reel: usize,
        symbol: SymbolId,
    },
    /// Fired once per round, after every reel has settled.
    RoundComplete(RoundResult),
    /// A running round was abandoned before completing.
    RoundAborted { round: RoundId },
}

impl GameEvent {
    /// Round the event belongs to.
    pub fn round(&self) -> RoundId {
        match self {
            GameEvent::RoundStarted { round, .. }
            | GameEvent::ReelReleased { round, .. }
            | GameEvent::ReelSettled { round, .. }
            | GameEvent::RoundAborted { round } => *round,
            GameEvent::RoundComplete(result) => result.round,
        }
    }
}
