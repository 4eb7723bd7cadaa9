//! FSSP Search CLI - Run a rule-table search from JSON configuration.

use std::fs;
use std::path::PathBuf;

use fssp_search::{
    compute::{EvolutionEngine, search::SearchRunner},
    render::SvgRenderer,
    schema::{SearchConfig, save_solution},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Search firing squad rule tables as described by a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to search configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config = SearchConfig::from_json(&config_str).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });

    let mut runner = SearchRunner::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });

    println!("FSSP Rule Search");
    println!("================");
    println!("States: {}", config.states);
    println!("Squad sizes: 2..={} (engine capacity {})", config.n_max(), config.max_size);
    println!("Algorithm: {:?}", config.algorithm);
    println!("Seed: {}", runner.seed());
    println!();

    println!("Running search...");
    let result = runner.run().unwrap_or_else(|e| {
        eprintln!("Search failed: {}", e);
        std::process::exit(1);
    });

    let stats = &result.stats;
    println!();
    println!("Initial fitness: {}", stats.initial_fitness);
    println!("Best fitness: {}", stats.best_fitness);
    println!(
        "Evaluations: {} in {:.2}s ({:.0} evals/s)",
        stats.evaluations, stats.elapsed_seconds, stats.evaluations_per_second
    );
    println!();
    println!("{}", result.best);

    if let Some(path) = &config.output {
        match save_solution(path, &result.best) {
            Ok(()) => println!("Saved solution to {}", path.display()),
            Err(e) => eprintln!("Error saving solution to {}: {}", path.display(), e),
        }
    }

    if let Some(svg) = &config.svg {
        let mut engine = EvolutionEngine::new(config.max_size);
        let diagrams = engine.render(&result.best, svg.size, svg.all_sizes);
        match SvgRenderer::new(result.best.alphabet()).save(&diagrams, &svg.path) {
            Ok(()) => println!("Saved space-time diagram to {}", svg.path.display()),
            Err(e) => eprintln!("Error writing {}: {}", svg.path.display(), e),
        }
    }
}

fn print_example_config() {
    let config = SearchConfig {
        max_size: 20,
        random_seed: Some(42),
        output: Some(PathBuf::from("solution_5.dat")),
        ..Default::default()
    };
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}
