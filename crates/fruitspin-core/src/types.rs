use serde::{Deserialize, Serialize};

/// Monotonic round identifier. Every deferred trigger and settle report
/// carries the id of the round that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl RoundId {
    /// The id following this one.
    pub fn next(self) -> Self {
        RoundId(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome class of a completed round, consumed by presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinTier {
    NoWin,
    Win,
    Jackpot,
}

impl WinTier {
    /// `score >= jackpot_threshold` is a jackpot, any other positive score a win.
    pub fn from_score(score: u32, jackpot_threshold: u32) -> Self {
        if score >= jackpot_threshold {
            WinTier::Jackpot
        } else if score > 0 {
            WinTier::Win
        } else {
            WinTier::NoWin
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WinTier::NoWin => "No win",
            WinTier::Win => "Win",
            WinTier::Jackpot => "JACKPOT",
        }
    }
}

/// Horizontal scene position of a reel, centred on the middle reel.
pub fn reel_position_x(reel_index: usize, reel_count: usize) -> f32 {
    let centre = (reel_count.saturating_sub(1)) as f32 / 2.0;
    (reel_index as f32 - centre) * crate::constants::REEL_SPACING
}
