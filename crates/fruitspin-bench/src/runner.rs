use std::time::Instant;

use fruitspin_core::symbol::SymbolCatalog;
use fruitspin_core::types::WinTier;
use fruitspin_sim::{GameEvent, RoundCoordinator, RoundPhase};

use crate::scenarios::Scenario;

/// Observed vs expected share of one symbol across every settled reel.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SymbolFrequency {
    pub name: String,
    pub glyph: String,
    pub count: u64,
    pub observed_share: f64,
    pub expected_share: f64,
}

/// Score distribution over completed rounds.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub median: f64,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TierCounts {
    pub no_win: u64,
    pub win: u64,
    pub jackpot: u64,
}

impl TierCounts {
    fn record(&mut self, tier: WinTier) {
        match tier {
            WinTier::NoWin => self.no_win += 1,
            WinTier::Win => self.win += 1,
            WinTier::Jackpot => self.jackpot += 1,
        }
    }
}

/// Result of simulating one scenario.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimResult {
    pub scenario: String,
    pub rounds: u32,
    pub completed: u32,
    /// Rounds that failed to settle within the tick bound and were aborted.
    pub overruns: u32,
    pub mean_round_secs: f64,
    pub max_round_secs: f64,
    pub scores: ScoreStats,
    pub tiers: TierCounts,
    pub symbols: Vec<SymbolFrequency>,
    pub wall_ms: f64,
}

/// Plays rounds headlessly at a fixed frame rate.
pub struct SimRunner {
    catalog: SymbolCatalog,
    rounds: u32,
    seed: u64,
    dt: f32,
}

impl SimRunner {
    pub fn new(catalog: SymbolCatalog, rounds: u32, seed: u64, fps: f32) -> Self {
        Self {
            catalog,
            rounds,
            seed,
            dt: 1.0 / fps.max(1.0),
        }
    }

    /// Simulate `rounds` rounds of `scenario`. Fails only if the scenario's
    /// configuration is rejected.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<SimResult, String> {
        log::info!(
            "Running scenario '{}' ({} rounds, seed {})...",
            scenario.name,
            self.rounds,
            self.seed
        );

        let mut machine =
            RoundCoordinator::new(self.catalog.clone(), scenario.config.clone(), self.seed)
                .map_err(|errors| {
                    let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("scenario '{}' rejected: {}", scenario.name, joined.join("; "))
                })?;

        let bound = scenario.config.round_tick_bound(self.dt);
        let mut counts = vec![0u64; self.catalog.len()];
        let mut scores = Vec::with_capacity(self.rounds as usize);
        let mut round_secs = Vec::with_capacity(self.rounds as usize);
        let mut tiers = TierCounts::default();
        let mut overruns = 0u32;

        let start = Instant::now();
        for _ in 0..self.rounds {
            // Wait out the cooldown the same way the frame loop would
            while !machine.can_start() {
                machine.tick(self.dt);
            }
            machine.drain_events();
            if let Err(reason) = machine.start_round() {
                log::warn!("Round start rejected: {reason}");
                continue;
            }

            let mut ticks = 0u32;
            while machine.round_phase() == RoundPhase::Running && ticks < bound {
                machine.tick(self.dt);
                ticks += 1;
            }

            if machine.round_phase() == RoundPhase::Running {
                overruns += 1;
                log::warn!(
                    "Round {} still running after {} ticks, aborting",
                    machine.round_id(),
                    ticks
                );
                machine.abort_round();
                continue;
            }

            for event in machine.drain_events() {
                if let GameEvent::RoundComplete(result) = event {
                    for symbol in &result.symbols {
                        let slot = self
                            .catalog
                            .symbols
                            .iter()
                            .position(|d| d.id == *symbol);
                        if let Some(slot) = slot {
                            counts[slot] += 1;
                        }
                    }
                    tiers.record(result.tier);
                    scores.push(result.total_score);
                    round_secs.push(ticks as f64 * self.dt as f64);
                }
            }
        }
        let wall_ms = start.elapsed().as_secs_f64() * 1000.0;

        let completed = scores.len() as u32;
        let result = SimResult {
            scenario: scenario.name.to_string(),
            rounds: self.rounds,
            completed,
            overruns,
            mean_round_secs: mean(&round_secs),
            max_round_secs: round_secs.iter().copied().fold(0.0, f64::max),
            scores: score_stats(&scores),
            tiers,
            symbols: symbol_frequencies(&self.catalog, &counts),
            wall_ms,
        };

        log::info!(
            "  {}: {} rounds, mean score {:.2}, {:.1} ms",
            result.scenario,
            result.completed,
            result.scores.mean,
            result.wall_ms
        );

        Ok(result)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summary statistics of round scores.
pub fn score_stats(scores: &[u32]) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats::default();
    }
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    };
    ScoreStats {
        mean: sorted.iter().map(|&s| s as f64).sum::<f64>() / sorted.len() as f64,
        median,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

/// Pair per-symbol counts (in catalog order) with their expected weight share.
pub fn symbol_frequencies(catalog: &SymbolCatalog, counts: &[u64]) -> Vec<SymbolFrequency> {
    let total_weight = catalog.total_weight().max(1) as f64;
    let total_count: u64 = counts.iter().sum();
    catalog
        .symbols
        .iter()
        .zip(counts)
        .map(|(def, &count)| SymbolFrequency {
            name: def.name.clone(),
            glyph: def.glyph.clone(),
            count,
            observed_share: if total_count > 0 {
                count as f64 / total_count as f64
            } else {
                0.0
            },
            expected_share: def.weight as f64 / total_weight,
        })
        .collect()
}
