//! Five-reel round orchestration: start, stagger, collect, score.

use fruitspin_core::config::MachineConfig;
use fruitspin_core::symbol::{SymbolCatalog, SymbolId};
use fruitspin_core::types::{RoundId, WinTier};
use fruitspin_rules::validator::{validate_all, ValidationError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::events::{GameEvent, RoundResult};
use crate::reel::{ReelEngine, ReelPhase};
use crate::rng::bell_curve;
use crate::schedule::{DueTrigger, Scheduler, Trigger};

/// Round lifecycle. `Complete` holds the finished round as read-only history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Running,
    Complete,
}

/// Why `start_round` did nothing. Not an error condition for the player;
/// the presentation simply ignores the pull.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StartRejected {
    #[error("a round is already running")]
    AlreadyRunning,
    #[error("cooling down after the previous round ({remaining:.2}s left)")]
    CoolingDown { remaining: f32 },
}

/// Per-round aggregate. Written only through `RoundCoordinator::on_reel_settled`.
#[derive(Debug, Clone)]
struct RoundState {
    id: RoundId,
    phase: RoundPhase,
    settled: Vec<Option<SymbolId>>,
    completed_count: usize,
    total_score: Option<u32>,
}

impl RoundState {
    fn idle(reel_count: usize) -> Self {
        Self {
            id: RoundId::default(),
            phase: RoundPhase::Idle,
            settled: vec![None; reel_count],
            completed_count: 0,
            total_score: None,
        }
    }

    fn running(id: RoundId, reel_count: usize) -> Self {
        Self {
            id,
            phase: RoundPhase::Running,
            ..Self::idle(reel_count)
        }
    }
}

/// Owns the reels and the round aggregate. Driven by `tick` once per frame;
/// observable through `drain_events` and the per-reel queries.
pub struct RoundCoordinator {
    config: MachineConfig,
    catalog: SymbolCatalog,
    pool: Vec<(SymbolId, u32)>,
    rng: StdRng,
    reels: Vec<ReelEngine>,
    scheduler: Scheduler,
    state: RoundState,
    cooldown_remaining: f32,
    last_result: Option<RoundResult>,
    events: Vec<GameEvent>,
}

impl RoundCoordinator {
    /// Build a machine from validated data. Any precondition violation
    /// (empty catalog, zero reels, bad weights or timings) is fatal.
    pub fn new(
        catalog: SymbolCatalog,
        config: MachineConfig,
        seed: u64,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_all(&catalog, &config)?;

        let pool = catalog.weighted_pool();
        let reels = (0..config.reel_count).map(ReelEngine::new).collect();
        let state = RoundState::idle(config.reel_count);

        log::info!(
            "Slot machine ready: {} reels x {} faces, {} symbols (seed {:#x})",
            config.reel_count,
            config.segment_count,
            catalog.len(),
            seed
        );

        Ok(Self {
            config,
            catalog,
            pool,
            rng: StdRng::seed_from_u64(seed),
            reels,
            scheduler: Scheduler::new(),
            state,
            cooldown_remaining: 0.0,
            last_result: None,
            events: Vec::new(),
        })
    }

    /// Start a new round. Rejected while a round runs or during the cooldown
    /// that follows a completed round; rejection leaves all state untouched.
    pub fn start_round(&mut self) -> Result<RoundId, StartRejected> {
        match self.state.phase {
            RoundPhase::Running => return Err(StartRejected::AlreadyRunning),
            RoundPhase::Complete if self.cooldown_remaining > 0.0 => {
                return Err(StartRejected::CoolingDown {
                    remaining: self.cooldown_remaining,
                });
            }
            _ => {}
        }

        let previous = self.state.id;
        let dropped = self.scheduler.cancel_round(previous);
        if dropped > 0 {
            log::debug!("Dropped {} pending triggers of round {}", dropped, previous);
        }

        let round = previous.next();
        let reel_count = self.reels.len();
        self.state = RoundState::running(round, reel_count);

        let (lo, hi) = self.config.speed_range();
        let samples = self.config.bell_curve_samples;
        let speeds: Vec<f32> = (0..reel_count)
            .map(|_| bell_curve(&mut self.rng, lo, hi, samples))
            .collect();

        for (reel, &speed) in self.reels.iter_mut().zip(&speeds) {
            reel.start_spin(round, speed, &self.pool, &self.config, &mut self.rng);
        }

        // Left-to-right stopping cadence
        for index in 0..reel_count {
            let delay = self.config.stop_stagger * index as f32;
            self.scheduler
                .schedule(round, delay, Trigger::ReleaseReel(index));
        }

        log::info!("Round {} started", round);
        self.events.push(GameEvent::RoundStarted { round, speeds });
        Ok(round)
    }

    /// Abandon a running round: reels return to `Idle` and every pending
    /// trigger of the round is invalidated. No-op unless a round is running.
    pub fn abort_round(&mut self) -> Option<RoundId> {
        if self.state.phase != RoundPhase::Running {
            return None;
        }
        let round = self.state.id;
        let dropped = self.scheduler.cancel_round(round);
        for reel in &mut self.reels {
            reel.reset();
        }
        self.state.phase = RoundPhase::Idle;
        log::info!("Round {} aborted ({} triggers cancelled)", round, dropped);
        self.events.push(GameEvent::RoundAborted { round });
        Some(round)
    }

    /// Advance everything by `dt` seconds: fire due triggers, step every
    /// reel, and fold settle reports into the round aggregate.
    pub fn tick(&mut self, dt: f32) {
        if self.state.phase == RoundPhase::Complete && self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }

        for due in self.scheduler.advance(dt) {
            self.apply_trigger(due);
        }

        let mut reports = Vec::new();
        for reel in &mut self.reels {
            if let Some(report) = reel.tick(dt, &self.config) {
                reports.push(report);
            }
        }
        for report in reports {
            self.on_reel_settled(report.round, report.reel, report.symbol);
        }
    }

    fn apply_trigger(&mut self, due: DueTrigger) {
        if due.round != self.state.id || self.state.phase != RoundPhase::Running {
            log::debug!(
                "Discarding stale trigger {:?} from round {} (current {})",
                due.trigger,
                due.round,
                self.state.id
            );
            return;
        }
        match due.trigger {
            Trigger::ReleaseReel(index) => {
                if let Some(reel) = self.reels.get_mut(index) {
                    reel.release();
                    self.events.push(GameEvent::ReelReleased {
                        round: due.round,
                        reel: index,
                    });
                }
            }
        }
    }

    /// Record that `reel` settled on `symbol` in `round`. The single write path
    /// into the round aggregate. Reports from another round, for an unknown reel,
    /// or for a reel that already reported are ignored; returns whether the
    /// report was recorded.
    pub fn on_reel_settled(&mut self, round: RoundId, reel: usize, symbol: SymbolId) -> bool {
        if round != self.state.id || self.state.phase != RoundPhase::Running {
            log::debug!(
                "Ignoring settle of reel {} from round {} (current {} {:?})",
                reel,
                round,
                self.state.id,
                self.state.phase
            );
            return false;
        }
        let Some(slot) = self.state.settled.get_mut(reel) else {
            log::warn!("Settle report for unknown reel {}", reel);
            return false;
        };
        if slot.is_some() {
            log::debug!("Duplicate settle report for reel {} ignored", reel);
            return false;
        }

        *slot = Some(symbol);
        self.state.completed_count += 1;
        self.events.push(GameEvent::ReelSettled {
            round,
            reel,
            symbol,
        });

        if self.state.completed_count == self.reels.len() {
            self.complete_round();
        }
        true
    }

    fn complete_round(&mut self) {
        let round = self.state.id;
        let symbols: Vec<SymbolId> = self.state.settled.iter().flatten().copied().collect();
        let total_score = self.catalog.score(&symbols);
        let tier = WinTier::from_score(total_score, self.config.jackpot_threshold);

        self.state.phase = RoundPhase::Complete;
        self.state.total_score = Some(total_score);
        self.cooldown_remaining = self.config.spin_cooldown;
        self.scheduler.cancel_round(round);

        let glyphs: Vec<&str> = symbols.iter().map(|&s| self.catalog.glyph(s)).collect();
        log::info!(
            "Round {} complete: [{}] score {} ({})",
            round,
            glyphs.join(" "),
            total_score,
            tier.name()
        );

        let result = RoundResult {
            round,
            symbols,
            total_score,
            tier,
        };
        self.last_result = Some(result.clone());
        self.events.push(GameEvent::RoundComplete(result));
    }

    /// Take every event produced since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether `start_round` would currently succeed.
    pub fn can_start(&self) -> bool {
        match self.state.phase {
            RoundPhase::Running => false,
            RoundPhase::Complete => self.cooldown_remaining <= 0.0,
            RoundPhase::Idle => true,
        }
    }

    pub fn current_rotation(&self, reel: usize) -> Option<f32> {
        self.reels.get(reel).map(|r| r.rotation())
    }

    pub fn current_phase(&self, reel: usize) -> Option<ReelPhase> {
        self.reels.get(reel).map(|r| r.phase())
    }

    pub fn symbol_sequence(&self, reel: usize) -> Option<&[SymbolId]> {
        self.reels.get(reel).map(|r| r.symbol_sequence())
    }

    pub fn reel(&self, reel: usize) -> Option<&ReelEngine> {
        self.reels.get(reel)
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    pub fn round_id(&self) -> RoundId {
        self.state.id
    }

    pub fn round_phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_count
    }

    /// Settled symbol per reel for the current round (None until that reel reports).
    pub fn settled_symbols(&self) -> &[Option<SymbolId>] {
        &self.state.settled
    }

    /// Total score of the current round, available once it is complete.
    pub fn total_score(&self) -> Option<u32> {
        self.state.total_score
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn pending_triggers(&self) -> usize {
        self.scheduler.pending_len()
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{default_machine, machine_with, run_until_complete, DT};

    #[test]
    fn test_new_rejects_invalid_setup() {
        let catalog = fruitspin_rules::defaults::default_catalog().expect("catalog");
        let zero_reels = MachineConfig {
            reel_count: 0,
            ..MachineConfig::default()
        };
        let errors = RoundCoordinator::new(catalog, zero_reels, 1).err().expect("rejected");
        assert!(errors.contains(&ValidationError::NoReels));

        let errors = RoundCoordinator::new(SymbolCatalog::default(), MachineConfig::default(), 1)
            .err()
            .expect("rejected");
        assert!(errors.contains(&ValidationError::EmptyCatalog));
    }

    #[test]
    fn test_initial_state_idle() {
        let machine = default_machine(1);
        assert_eq!(machine.round_phase(), RoundPhase::Idle);
        assert_eq!(machine.reel_count(), 5);
        assert!(machine.can_start());
        assert_eq!(machine.current_phase(0), Some(ReelPhase::Idle));
        assert_eq!(machine.current_phase(5), None);
        assert!(machine.total_score().is_none());
    }

    #[test]
    fn test_start_round_spins_every_reel() {
        let mut machine = default_machine(2);
        let round = machine.start_round().expect("should start");
        assert_eq!(round, RoundId(1));
        assert_eq!(machine.round_phase(), RoundPhase::Running);
        assert_eq!(machine.completed_count(), 0);
        for i in 0..5 {
            assert_eq!(machine.current_phase(i), Some(ReelPhase::Spinning));
            assert_eq!(machine.symbol_sequence(i).map(|s| s.len()), Some(20));
        }

        let events = machine.drain_events();
        match &events[..] {
            [GameEvent::RoundStarted { round: r, speeds }] => {
                assert_eq!(*r, round);
                assert_eq!(speeds.len(), 5);
                assert!(speeds.iter().all(|s| (12.0..=18.0).contains(s)));
            }
            other => panic!("unexpected events {other:?}"),
        }
        assert_eq!(machine.pending_triggers(), 5);
    }

    #[test]
    fn test_start_while_running_is_rejected_without_side_effects() {
        let mut machine = default_machine(3);
        machine.start_round().expect("should start");
        for _ in 0..30 {
            machine.tick(DT);
        }
        machine.drain_events();

        let before: Vec<(f32, Vec<SymbolId>, ReelPhase)> = (0..5)
            .map(|i| {
                let reel = machine.reel(i).expect("reel");
                (reel.rotation(), reel.symbol_sequence().to_vec(), reel.phase())
            })
            .collect();
        let pending = machine.pending_triggers();

        assert_eq!(machine.start_round(), Err(StartRejected::AlreadyRunning));

        let after: Vec<(f32, Vec<SymbolId>, ReelPhase)> = (0..5)
            .map(|i| {
                let reel = machine.reel(i).expect("reel");
                (reel.rotation(), reel.symbol_sequence().to_vec(), reel.phase())
            })
            .collect();
        assert_eq!(before, after);
        assert_eq!(machine.round_id(), RoundId(1));
        assert_eq!(machine.pending_triggers(), pending);
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_round_completes_once_with_correct_score() {
        let mut machine = default_machine(4);
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        let events = run_until_complete(&mut machine, bound);

        let settles: Vec<(usize, SymbolId)> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ReelSettled { reel, symbol, .. } => Some((*reel, *symbol)),
                _ => None,
            })
            .collect();
        assert_eq!(settles.len(), 5);
        let mut reels: Vec<usize> = settles.iter().map(|(r, _)| *r).collect();
        reels.sort_unstable();
        assert_eq!(reels, vec![0, 1, 2, 3, 4]);

        let completions: Vec<&RoundResult> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::RoundComplete(result) => Some(result),
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert!(matches!(events.last(), Some(GameEvent::RoundComplete(_))));

        let result = completions[0];
        for (reel, symbol) in &settles {
            assert_eq!(result.symbols[*reel], *symbol);
            let engine = machine.reel(*reel).expect("reel");
            assert_eq!(engine.settled_symbol(), Some(*symbol));
            assert!(engine.symbol_sequence().contains(symbol));
        }
        let expected: u32 = result.symbols.iter().map(|&s| machine.catalog().points(s)).sum();
        assert_eq!(result.total_score, expected);
        assert_eq!(machine.total_score(), Some(expected));
        assert_eq!(machine.round_phase(), RoundPhase::Complete);
        assert_eq!(machine.last_result(), Some(result));
        assert_eq!(machine.pending_triggers(), 0);
    }

    #[test]
    fn test_nothing_fires_after_completion() {
        let mut machine = default_machine(5);
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        run_until_complete(&mut machine, bound);
        for _ in 0..600 {
            machine.tick(DT);
        }
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_large_stagger_stops_left_to_right() {
        let mut machine = machine_with(MachineConfig {
            stop_stagger: 8.0,
            ..MachineConfig::default()
        });
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        let events = run_until_complete(&mut machine, bound);
        let order: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ReelSettled { reel, .. } => Some(*reel),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cooldown_gates_next_round() {
        let mut machine = default_machine(6);
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        run_until_complete(&mut machine, bound);

        assert!(matches!(
            machine.start_round(),
            Err(StartRejected::CoolingDown { .. })
        ));
        assert!(!machine.can_start());

        for _ in 0..40 {
            machine.tick(DT);
        }
        assert!(machine.can_start());
        assert_eq!(machine.start_round(), Ok(RoundId(2)));
    }

    #[test]
    fn test_consecutive_rounds_use_fresh_ids() {
        let mut machine = machine_with(MachineConfig {
            spin_cooldown: 0.0,
            ..MachineConfig::default()
        });
        for expected in 1..=3u64 {
            assert_eq!(machine.start_round(), Ok(RoundId(expected)));
            let bound = machine.config().round_tick_bound(DT);
            let events = run_until_complete(&mut machine, bound);
            assert!(events.iter().all(|e| e.round() == RoundId(expected)));
        }
    }

    #[test]
    fn test_duplicate_settle_ignored() {
        let mut machine = default_machine(7);
        let round = machine.start_round().expect("should start");
        machine.drain_events();

        assert!(machine.on_reel_settled(round, 0, SymbolId(7)));
        assert!(!machine.on_reel_settled(round, 0, SymbolId(7)));
        assert!(!machine.on_reel_settled(round, 0, SymbolId(0)));
        assert_eq!(machine.completed_count(), 1);
        assert_eq!(machine.settled_symbols()[0], Some(SymbolId(7)));

        let settles = machine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ReelSettled { .. }))
            .count();
        assert_eq!(settles, 1);
    }

    #[test]
    fn test_settle_for_unknown_reel_or_round_ignored() {
        let mut machine = default_machine(8);
        let round = machine.start_round().expect("should start");
        assert!(!machine.on_reel_settled(round, 9, SymbolId(0)));
        assert!(!machine.on_reel_settled(RoundId(42), 0, SymbolId(0)));
        assert_eq!(machine.completed_count(), 0);
    }

    #[test]
    fn test_settle_while_idle_ignored() {
        let mut machine = default_machine(9);
        assert!(!machine.on_reel_settled(RoundId(0), 0, SymbolId(0)));
        assert_eq!(machine.round_phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = default_machine(1234);
        let mut b = default_machine(1234);
        a.start_round().expect("start a");
        b.start_round().expect("start b");
        let bound = a.config().round_tick_bound(DT);
        run_until_complete(&mut a, bound);
        run_until_complete(&mut b, bound);
        assert_eq!(a.last_result(), b.last_result());
    }
}
