use std::path::PathBuf;
use std::process;

use fruitspin_bench::report;
use fruitspin_bench::runner::SimRunner;
use fruitspin_bench::scenarios;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut output_path: Option<PathBuf> = None;
    let mut rounds = 10_000u32;
    let mut seed = 0x5eed_u64;
    let mut fps = 60.0f32;
    let mut max_sigma = 4.0f64;
    let mut only: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rounds" => {
                i += 1;
                rounds = parse_arg(&args, i, "--rounds");
            }
            "--seed" => {
                i += 1;
                seed = parse_arg(&args, i, "--seed");
            }
            "--fps" => {
                i += 1;
                fps = parse_arg(&args, i, "--fps");
            }
            "--max-sigma" => {
                i += 1;
                max_sigma = parse_arg(&args, i, "--max-sigma");
            }
            "--scenario" => {
                i += 1;
                only = Some(parse_arg(&args, i, "--scenario"));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(parse_arg::<String>(&args, i, "--output")));
            }
            "--help" | "-h" => {
                eprintln!("Usage: sim-runner [OPTIONS]");
                eprintln!("  --rounds <n>         Rounds per scenario (default: 10000)");
                eprintln!("  --seed <n>           RNG seed (default: 24301)");
                eprintln!("  --fps <n>            Simulated frame rate (default: 60)");
                eprintln!("  --max-sigma <n>      Allowed symbol frequency deviation in standard errors (default: 4)");
                eprintln!("  --scenario <name>    Run a single scenario");
                eprintln!("  --output <path>      Save results as JSON");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let catalog = match fruitspin_rules::defaults::default_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };
    let base = match fruitspin_rules::defaults::default_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    let selected = match only {
        Some(name) => match scenarios::find_scenario(&base, &name) {
            Some(scenario) => vec![scenario],
            None => {
                eprintln!("Unknown scenario: {}", name);
                process::exit(1);
            }
        },
        None => scenarios::standard_scenarios(&base),
    };

    let runner = SimRunner::new(catalog, rounds, seed, fps);
    let mut results = Vec::new();
    for scenario in &selected {
        match runner.run_scenario(scenario) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("ERROR: {e}");
                process::exit(1);
            }
        }
    }

    println!("\n## Simulation Results\n");
    println!("{}", report::format_markdown(&results));
    for result in &results {
        println!("{}", report::format_frequencies(result));
    }

    if let Some(ref path) = output_path {
        let saved = report::Report {
            seed,
            rounds,
            fps,
            results: results.clone(),
        };
        if let Err(e) = report::save_report(path, &saved) {
            eprintln!("ERROR: failed to save report: {e}");
            process::exit(1);
        }
        log::info!("Saved report to {}", path.display());
    }

    let deviations = report::frequency_deviations(&results, max_sigma);
    println!("{}", report::format_deviations(&deviations, max_sigma));
    let overruns: u32 = results.iter().map(|r| r.overruns).sum();
    if overruns > 0 {
        eprintln!("ERROR: {} rounds failed to settle", overruns);
        process::exit(1);
    }
    if !deviations.is_empty() {
        eprintln!(
            "ERROR: {} symbol frequencies out of tolerance, exiting with code 1",
            deviations.len()
        );
        process::exit(1);
    }

    log::info!("Simulation complete.");
}

/// Parse the value following a flag, exiting with a message if it is missing or malformed.
fn parse_arg<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|v| v.parse::<T>()) {
        Some(Ok(value)) => value,
        _ => {
            eprintln!("invalid or missing value for {}", flag);
            process::exit(1);
        }
    }
}
