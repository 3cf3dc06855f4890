//! TRON Vanity Address Generator CLI
//!
//! Usage:
//!   tron_vanity -p MGf            # Find an address starting with "TMGf"
//!   tron_vanity -s fqq -n 5       # Find 5 addresses ending with "fqq"
//!   tron_vanity -p MGf -s fqq -n 0 --hybrid  # Search forever with a batch key producer

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use tron_vanity::output::{format_count, format_elapsed, format_number};
use tron_vanity::{Config, Coordinator, RunOutcome};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let search = config.search_config();
    let pattern = &search.pattern;

    // Print startup info
    println!("TRON Vanity Address Generator");
    println!("=============================");
    println!("Pattern:    {}", pattern);
    println!(
        "Difficulty: 1/{} ({})",
        format_count(pattern.estimated_difficulty()),
        pattern.difficulty_description()
    );
    println!("Workers:    {} ({})", search.workers, search.feed);
    if search.target_count == 0 {
        println!("Target:     unlimited");
    } else {
        println!("Target:     {} address(es)", search.target_count);
    }
    println!("Output:     {}", search.output.display());
    println!();

    if pattern.is_vacuous() {
        log::warn!("empty prefix and suffix: every generated address matches");
    }

    // Set up ctrl-c handler
    let interrupt = Arc::new(AtomicBool::new(false));
    ctrlc_handler(interrupt.clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let summary = match Coordinator::new(search, interrupt).run() {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    match summary.outcome {
        RunOutcome::Completed => {
            println!("\nTarget reached! Found {} address(es).", summary.found_count)
        }
        RunOutcome::Interrupted => println!("\nStopped."),
    }

    // Print final stats
    println!("\n--- Final Statistics ---");
    println!("Total keys generated: {}", format_count(summary.total_attempts));
    println!("Total matches found:  {}", summary.found_count);
    println!("Time elapsed:         {}", format_elapsed(summary.elapsed));
    println!(
        "Average speed:        {}/s",
        format_number(summary.average_rate as u64)
    );
}

fn ctrlc_handler(interrupt: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        interrupt.store(true, Ordering::Relaxed);
    }) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }
}
