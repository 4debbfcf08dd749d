//! Deferred state transitions on simulated time.
//!
//! Every trigger carries the round that scheduled it. The coordinator cancels
//! a round's triggers when that round ends and re-checks the tag when a
//! trigger fires, so nothing from an old round can touch a newer one.

use fruitspin_core::types::RoundId;

/// What a deferred trigger does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Let reel `n` leave `Spinning`.
    ReleaseReel(usize),
}

/// A trigger that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTrigger {
    pub round: RoundId,
    pub trigger: Trigger,
}

#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    due_at: f64,
    round: RoundId,
    trigger: Trigger,
}

/// Simulated-time trigger queue. Time only moves through `advance`.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `trigger` to fire `delay_secs` from now on behalf of `round`.
    pub fn schedule(&mut self, round: RoundId, delay_secs: f32, trigger: Trigger) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            seq,
            due_at: self.now + delay_secs.max(0.0) as f64,
            round,
            trigger,
        });
    }

    /// Cancel every pending trigger scheduled by `round`. Returns how many were dropped.
    pub fn cancel_round(&mut self, round: RoundId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.round != round);
        before - self.pending.len()
    }

    /// Advance simulated time and return the triggers that came due,
    /// ordered by due time (ties in scheduling order).
    pub fn advance(&mut self, dt_secs: f32) -> Vec<DueTrigger> {
        self.now += dt_secs.max(0.0) as f64;
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_at <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.due_at
                .partial_cmp(&b.due_at)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });

        due.into_iter()
            .map(|p| DueTrigger {
                round: p.round,
                trigger: p.trigger,
            })
            .collect()
    }

    /// Number of triggers still waiting.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
