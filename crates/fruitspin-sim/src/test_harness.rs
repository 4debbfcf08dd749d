//! Deterministic machine fixtures and whole-round scenario tests.
//!
//! Everything runs on simulated time at a fixed 60 Hz step, so a given seed
//! always produces the same faces, speeds and results.

use fruitspin_core::config::MachineConfig;
use fruitspin_rules::defaults::{default_catalog, default_config};

use crate::events::GameEvent;
use crate::round::{RoundCoordinator, RoundPhase};

pub const DT: f32 = 1.0 / 60.0;

/// Default data files, seeded.
pub fn default_machine(seed: u64) -> RoundCoordinator {
    let catalog = default_catalog().expect("bundled catalog parses");
    let config = default_config().expect("bundled config parses");
    RoundCoordinator::new(catalog, config, seed).expect("bundled data is valid")
}

/// Default catalog with an overridden config, fixed seed.
pub fn machine_with(config: MachineConfig) -> RoundCoordinator {
    let catalog = default_catalog().expect("bundled catalog parses");
    RoundCoordinator::new(catalog, config, 0x5eed).expect("config is valid")
}

/// Tick until the running round completes, failing after `max_ticks`.
/// Returns every event produced along the way.
pub fn run_until_complete(machine: &mut RoundCoordinator, max_ticks: u32) -> Vec<GameEvent> {
    let mut events = machine.drain_events();
    for _ in 0..max_ticks {
        machine.tick(DT);
        events.extend(machine.drain_events());
        if machine.round_phase() == RoundPhase::Complete {
            return events;
        }
    }
    panic!(
        "round {} did not complete within {} ticks ({} of {} reels settled)",
        machine.round_id(),
        max_ticks,
        machine.completed_count(),
        machine.reel_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::ReelPhase;
    use fruitspin_core::config::DecayMode;
    use fruitspin_core::symbol::SymbolId;
    use fruitspin_core::types::{RoundId, WinTier};

    fn id(machine: &RoundCoordinator, name: &str) -> SymbolId {
        machine.catalog().by_name(name).expect("known symbol").id
    }

    #[test]
    fn test_aborted_round_never_reports_into_next() {
        let mut machine = machine_with(MachineConfig {
            stop_stagger: 2.0,
            ..MachineConfig::default()
        });
        let first = machine.start_round().expect("start A");
        for _ in 0..10 {
            machine.tick(DT);
        }
        assert!(machine.pending_triggers() > 0);
        assert_eq!(machine.abort_round(), Some(first));
        assert_eq!(machine.pending_triggers(), 0);
        for i in 0..machine.reel_count() {
            assert_eq!(machine.current_phase(i), Some(ReelPhase::Idle));
        }
        machine.drain_events();

        let second = machine.start_round().expect("start B");
        assert_ne!(first, second);
        let bound = machine.config().round_tick_bound(DT);
        let events = run_until_complete(&mut machine, bound);

        assert!(events.iter().all(|e| e.round() == second));
        let result = machine.last_result().expect("B completed");
        assert_eq!(result.round, second);
        assert_eq!(result.symbols.len(), 5);
    }

    #[test]
    fn test_abort_when_idle_is_noop() {
        let mut machine = default_machine(11);
        assert_eq!(machine.abort_round(), None);
        assert!(machine.drain_events().is_empty());
    }

    #[test]
    fn test_stale_report_from_aborted_round_rejected() {
        let mut machine = default_machine(12);
        let first = machine.start_round().expect("start A");
        machine.abort_round();
        let second = machine.start_round().expect("start B");
        assert!(!machine.on_reel_settled(first, 0, SymbolId(0)));
        assert!(machine.on_reel_settled(second, 0, SymbolId(0)));
        assert_eq!(machine.completed_count(), 1);
    }

    #[test]
    fn test_scripted_round_scores_fifteen() {
        let mut machine = default_machine(13);
        let round = machine.start_round().expect("should start");
        let script = ["cherries", "cherries", "apple", "pear", "grapes"];
        let ids: Vec<SymbolId> = script.iter().map(|n| id(&machine, n)).collect();

        for (reel, symbol) in ids.iter().enumerate() {
            assert!(machine.on_reel_settled(round, reel, *symbol));
        }

        assert_eq!(machine.round_phase(), RoundPhase::Complete);
        assert_eq!(machine.total_score(), Some(15));
        let result = machine.last_result().expect("completed");
        assert_eq!(result.symbols, ids);
        assert_eq!(result.tier, WinTier::Win);

        // The physical reels are still spinning; their reports arrive late
        let bound = MachineConfig::default().round_tick_bound(DT);
        for _ in 0..bound {
            machine.tick(DT);
        }
        let completions = machine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RoundComplete(_)))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(machine.total_score(), Some(15));
    }

    #[test]
    fn test_scripted_jackpot() {
        let mut machine = default_machine(14);
        let round = machine.start_round().expect("should start");
        let cherries = id(&machine, "cherries");
        let strawberry = id(&machine, "strawberry");
        for reel in 0..4 {
            machine.on_reel_settled(round, reel, cherries);
        }
        machine.on_reel_settled(round, 4, strawberry);
        let result = machine.last_result().expect("completed");
        assert_eq!(result.total_score, 24);
        assert_eq!(result.tier, WinTier::Jackpot);
    }

    #[test]
    fn test_out_of_order_settles_complete_once() {
        let mut machine = default_machine(15);
        let round = machine.start_round().expect("should start");
        machine.drain_events();
        for reel in [3, 0, 4, 1, 2] {
            machine.on_reel_settled(round, reel, SymbolId(reel as u16));
        }
        let events = machine.drain_events();
        assert_eq!(events.len(), 6);
        match events.last() {
            Some(GameEvent::RoundComplete(result)) => {
                let expected: Vec<SymbolId> = (0..5).map(SymbolId).collect();
                assert_eq!(result.symbols, expected);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_per_second_decay_round_completes() {
        let mut machine = machine_with(MachineConfig {
            decay_mode: DecayMode::PerSecond,
            deceleration: 0.3,
            ..MachineConfig::default()
        });
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        run_until_complete(&mut machine, bound);
        assert_eq!(machine.round_phase(), RoundPhase::Complete);
    }

    #[test]
    fn test_settled_rotation_matches_symbol() {
        let mut machine = default_machine(16);
        machine.start_round().expect("should start");
        let bound = machine.config().round_tick_bound(DT);
        run_until_complete(&mut machine, bound);

        let config = machine.config().clone();
        for i in 0..machine.reel_count() {
            let reel = machine.reel(i).expect("reel");
            let face = crate::reel::segment_index_at(reel.rotation(), config.segment_count);
            assert_eq!(Some(reel.symbol_sequence()[face]), reel.settled_symbol());
            let offset = reel.rotation() / config.segment_angle();
            assert!((offset - offset.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_many_rounds_stay_bounded() {
        let mut machine = machine_with(MachineConfig {
            spin_cooldown: 0.0,
            ..MachineConfig::default()
        });
        let bound = machine.config().round_tick_bound(DT);
        for n in 1..=20u64 {
            assert_eq!(machine.start_round(), Ok(RoundId(n)));
            run_until_complete(&mut machine, bound);
            let result = machine.last_result().expect("completed");
            assert_eq!(result.symbols.len(), 5);
            assert!(result.total_score >= 5 && result.total_score <= 25);
        }
    }
}
