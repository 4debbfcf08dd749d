use std::path::Path;

use crate::runner::SimResult;

/// Everything one invocation produced, as written to `--output`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub seed: u64,
    pub rounds: u32,
    pub fps: f32,
    pub results: Vec<SimResult>,
}

/// Load a report from a JSON file. Returns None if it is missing or unreadable.
pub fn load_report(path: &Path) -> Option<Report> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn save_report(path: &Path, report: &Report) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// A symbol whose observed share strays too far from its weight share.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyDeviation {
    pub scenario: String,
    pub symbol: String,
    /// Relative deviation from the expected share, in percent.
    pub pct: f64,
    /// Deviation in binomial standard errors of the expected share.
    pub sigma: f64,
}

/// Symbols whose observed share differs from the weight share by more than
/// `max_sigma` standard errors. The bound tightens as the sample grows, so
/// short runs are not failed on ordinary sampling noise.
pub fn frequency_deviations(results: &[SimResult], max_sigma: f64) -> Vec<FrequencyDeviation> {
    let mut deviations = Vec::new();
    for result in results {
        let draws: u64 = result.symbols.iter().map(|s| s.count).sum();
        if draws == 0 {
            continue;
        }
        for symbol in &result.symbols {
            let p = symbol.expected_share;
            if p <= 0.0 || p >= 1.0 {
                continue;
            }
            let std_err = (p * (1.0 - p) / draws as f64).sqrt();
            let sigma = (symbol.observed_share - p) / std_err;
            if sigma.abs() > max_sigma {
                deviations.push(FrequencyDeviation {
                    scenario: result.scenario.clone(),
                    symbol: symbol.name.clone(),
                    pct: (symbol.observed_share - p) / p * 100.0,
                    sigma,
                });
            }
        }
    }
    deviations
}

/// Scenario summary table.
pub fn format_markdown(results: &[SimResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scenario | Rounds | Overruns | Mean score | Median | Min | Max | No win | Win | Jackpot | Mean round (s) | Wall (ms) |\n");
    out.push_str("|----------|--------|----------|------------|--------|-----|-----|--------|-----|---------|----------------|-----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.1} | {} | {} | {} | {} | {} | {:.2} | {:.1} |\n",
            r.scenario,
            r.completed,
            r.overruns,
            r.scores.mean,
            r.scores.median,
            r.scores.min,
            r.scores.max,
            r.tiers.no_win,
            r.tiers.win,
            r.tiers.jackpot,
            r.mean_round_secs,
            r.wall_ms,
        ));
    }

    out
}

/// Per-symbol observed vs expected share for one scenario.
pub fn format_frequencies(result: &SimResult) -> String {
    let mut out = format!("### {}\n\n", result.scenario);
    out.push_str("| Symbol | Count | Observed | Expected |\n");
    out.push_str("|--------|-------|----------|----------|\n");
    for s in &result.symbols {
        out.push_str(&format!(
            "| {} {} | {} | {:.2}% | {:.2}% |\n",
            s.glyph,
            s.name,
            s.count,
            s.observed_share * 100.0,
            s.expected_share * 100.0,
        ));
    }
    out
}

pub fn format_deviations(deviations: &[FrequencyDeviation], max_sigma: f64) -> String {
    if deviations.is_empty() {
        return format!(
            "All symbol frequencies within {:.1} standard errors of their weight share.\n",
            max_sigma
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "FREQUENCY DEVIATIONS (>{:.1} standard errors):\n",
        max_sigma
    ));
    for d in deviations {
        out.push_str(&format!(
            "  - {} / {}: {:+.1}% ({:+.1} se)\n",
            d.scenario, d.symbol, d.pct, d.sigma
        ));
    }
    out
}
