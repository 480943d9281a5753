//! Training executable for the Toss'em Hold'em MCCFR strategy.
//!
//! # Usage
//!
//! ```bash
//! # Default run: 1M iterations, auto threads, output cfr_strategy.bin
//! cargo run --release --bin train_mccfr
//!
//! # Longer run with explicit resources
//! cargo run --release --bin train_mccfr -- \
//!   --iters 5000000 --threads 8 --batch 20000 \
//!   --checkpoint 500000 --out strategies/tossem.bin
//! ```

use std::env;
use std::path::PathBuf;

use tossem_cfr::trainer::default_threads;
use tossem_cfr::{train, TrainerConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config = TrainerConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iters" | "-i" => {
                i += 1;
                config.iterations = parse_value(&args, i, "--iters");
            }
            "--threads" | "-t" => {
                i += 1;
                config.threads = parse_value(&args, i, "--threads");
            }
            "--batch" | "-b" => {
                i += 1;
                config.batch_size = parse_value(&args, i, "--batch");
            }
            "--checkpoint" | "-c" => {
                i += 1;
                config.checkpoint_interval = parse_value(&args, i, "--checkpoint");
            }
            "--out" | "-o" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --out requires a value");
                    std::process::exit(1);
                }
                config.output = PathBuf::from(&args[i]);
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if config.threads == 0 {
        config.threads = default_threads();
    }

    println!("Toss'em Hold'em MCCFR trainer (v2 strategy format)");
    println!(
        "iters={} threads={} batch={} checkpoint={} out={}",
        config.iterations,
        config.threads,
        config.batch_size,
        config.checkpoint_interval,
        config.output.display()
    );

    if let Err(e) = train(&config) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    if i >= args.len() {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    }
    args[i].parse().unwrap_or_else(|_| {
        eprintln!("Invalid value for {}: {}", flag, args[i]);
        std::process::exit(1);
    })
}

fn print_help() {
    println!("train_mccfr - Train a Toss'em Hold'em strategy with MCCFR");
    println!();
    println!("USAGE:");
    println!("    train_mccfr [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --iters <NUM>       Total iterations (default: 1000000)");
    println!("    -t, --threads <NUM>     Worker threads (default: cores - 1)");
    println!("    -b, --batch <NUM>       Iterations per thread per batch (default: 20000)");
    println!("    -c, --checkpoint <NUM>  Checkpoint interval in iterations (default: 500000)");
    println!("    -o, --out <PATH>        Output file (default: cfr_strategy.bin)");
    println!("    -h, --help              Show this help message");
}
