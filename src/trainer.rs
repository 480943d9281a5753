//! Batched multi-threaded training.
//!
//! Training proceeds in batches. Each batch fans out one worker per thread;
//! a worker owns a private [`RegretTable`], game state and RNG, runs a fixed
//! number of iterations and returns its table. The main thread then folds
//! every worker table into the global one. Merging is plain componentwise
//! addition, so it is associative and commutative and the fold order does
//! not matter; no locks are needed anywhere.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::cfr::{run_iteration, RegretTable};
use crate::game::{GameState, NUM_BETTING_ACTIONS};
use crate::strategy_io::{save_table, StrategyIoError};

/// Training run configuration.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Total CFR iterations across all batches.
    pub iterations: i64,
    /// Worker threads per batch.
    pub threads: usize,
    /// Iterations per worker per batch.
    pub batch_size: i64,
    /// Checkpoint the global table every this many iterations.
    pub checkpoint_interval: i64,
    /// Final strategy output path.
    pub output: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            iterations: 1_000_000,
            threads: default_threads(),
            batch_size: 20_000,
            checkpoint_interval: 500_000,
            output: PathBuf::from("cfr_strategy.bin"),
        }
    }
}

/// Hardware concurrency minus one, at least 1.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Error type for a training run.
#[derive(Debug)]
pub enum TrainerError {
    /// Worker pool could not be built.
    ThreadPool(rayon::ThreadPoolBuildError),
    /// Checkpoint or final serialization failed.
    Io(StrategyIoError),
}

impl From<rayon::ThreadPoolBuildError> for TrainerError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        TrainerError::ThreadPool(err)
    }
}

impl From<StrategyIoError> for TrainerError {
    fn from(err: StrategyIoError) -> Self {
        TrainerError::Io(err)
    }
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerError::ThreadPool(e) => write!(f, "thread pool error: {}", e),
            TrainerError::Io(e) => write!(f, "strategy IO error: {}", e),
        }
    }
}

impl std::error::Error for TrainerError {}

/// Run `iterations` CFR iterations on a private table and return it.
pub fn run_worker(iterations: i64, seed: u64) -> RegretTable {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = GameState::new();
    let mut table = RegretTable::new();
    for _ in 0..iterations {
        run_iteration(&mut state, &mut rng, &mut table);
    }
    table
}

/// Fold `local` into `global` by componentwise addition, creating entries as
/// needed.
pub fn merge_tables(global: &mut RegretTable, local: &RegretTable) {
    for (key, node) in local {
        let entry = global.entry(*key).or_default();
        for a in 0..NUM_BETTING_ACTIONS {
            entry.regret[a] += node.regret[a];
            entry.strat_sum[a] += node.strat_sum[a];
        }
    }
}

/// Train to `config.iterations`, checkpointing along the way, and serialize
/// the final table to `config.output`. Returns the global table.
pub fn train(config: &TrainerConfig) -> Result<RegretTable, TrainerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let mut global = RegretTable::new();
    let mut done: i64 = 0;
    let mut last_checkpoint: i64 = 0;
    let start = Instant::now();

    // One entropy draw per run; workers derive their seeds from it so a run
    // is reproducible given the same entropy, thread count and batch size.
    let entropy: u64 = rand::random();

    while done < config.iterations {
        let remaining = config.iterations - done;
        let per_worker = config
            .batch_size
            .min(remaining / config.threads as i64 + 1)
            .max(1);

        let batch_start = Instant::now();
        let locals: Vec<RegretTable> = pool.install(|| {
            (0..config.threads)
                .into_par_iter()
                .map(|worker| {
                    let seed = entropy ^ (done as u64).wrapping_add(worker as u64 * 1337);
                    run_worker(per_worker, seed)
                })
                .collect()
        });

        for local in &locals {
            merge_tables(&mut global, local);
        }
        done += per_worker * config.threads as i64;

        let batch_secs = batch_start.elapsed().as_secs_f64().max(1e-9);
        let total_secs = start.elapsed().as_secs_f64().max(1e-9);
        let batch_rate = (per_worker * config.threads as i64) as f64 / batch_secs;
        let total_rate = done as f64 / total_secs;
        println!(
            "  {}/{}  rate={:.0}/s total={:.0}/s states={}",
            done,
            config.iterations,
            batch_rate,
            total_rate,
            global.len()
        );

        if done - last_checkpoint >= config.checkpoint_interval {
            let checkpoint = format!(
                "{}.checkpoint_{}k",
                config.output.display(),
                done / 1000
            );
            save_table(Path::new(&checkpoint), &global, done)?;
            println!("  checkpoint: {} ({} nodes)", checkpoint, global.len());
            last_checkpoint = done;
        }
    }

    save_table(&config.output, &global, done)?;
    println!(
        "Saved {} ({} nodes, {} iters)",
        config.output.display(),
        global.len(),
        done
    );

    Ok(global)
}
