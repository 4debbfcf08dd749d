//! Headless round simulation: plays seeded batches of rounds against the
//! shipped symbol catalog and reports how the machine actually pays out.

pub mod report;
pub mod runner;
pub mod scenarios;
