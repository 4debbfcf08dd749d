pub mod events;
pub mod reel;
pub mod rng;
pub mod round;
pub mod schedule;

#[cfg(test)]
mod test_harness;

pub use events::{GameEvent, RoundResult};
pub use reel::{ReelEngine, ReelPhase, ReelSettled};
pub use round::{RoundCoordinator, RoundPhase, StartRejected};
