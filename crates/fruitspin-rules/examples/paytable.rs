//! Paytable printer.
//! Loads the shipped symbol catalog and machine tuning, validates them, and
//! prints a markdown table of per-face probabilities and point values.
//!
//! Usage: cargo run -p fruitspin-rules --example paytable

use fruitspin_rules::defaults;
use fruitspin_rules::validator::validate_all;

fn main() {
    let catalog = defaults::default_catalog().expect("Failed to load symbols");
    let config = defaults::default_config().expect("Failed to load machine config");

    if let Err(errors) = validate_all(&catalog, &config) {
        for e in &errors {
            eprintln!("invalid: {e}");
        }
        std::process::exit(1);
    }

    let total = catalog.total_weight() as f64;
    let mut expected_points = 0.0;

    println!("| Symbol | Glyph | Weight | P(face) | Points |");
    println!("|--------|-------|--------|---------|--------|");
    for symbol in &catalog.symbols {
        let p = symbol.weight as f64 / total;
        expected_points += p * symbol.points as f64;
        println!(
            "| {} | {} | {} | {:.3} | {} |",
            symbol.name, symbol.glyph, symbol.weight, p, symbol.points
        );
    }

    println!();
    println!(
        "Expected score per round ({} reels): {:.2}",
        config.reel_count,
        expected_points * config.reel_count as f64
    );
    println!("Jackpot threshold: {}", config.jackpot_threshold);
}
