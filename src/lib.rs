//! A counterfactual regret minimization (CFR) trainer for heads-up Toss'em
//! Hold'em.
//!
//! Toss'em is a two-player no-limit variant: three hole cards each, a
//! two-card flop, then each player discards one hole card face up onto the
//! board before the turn. This crate provides:
//! - [`GameState`]: exact forward simulation with cheap in-place undo
//! - [`abstraction`]: bucketing of information states into packed keys
//! - [`cfr_traverse`]: mixed full-traversal / external-sampling CFR
//! - [`train`]: batched multi-threaded training with additive table merge
//! - [`strategy_io`]: binary persistence of the learned table
//!
//! # Example
//!
//! ```no_run
//! use tossem_cfr::{train, TrainerConfig};
//!
//! let config = TrainerConfig {
//!     iterations: 100_000,
//!     ..TrainerConfig::default()
//! };
//! let table = train(&config).expect("training failed");
//! println!("{} information states", table.len());
//! ```

pub mod abstraction;
pub mod cards;
pub mod cfr;
pub mod eval;
pub mod game;
pub mod strategy_io;
pub mod trainer;

pub use abstraction::InfoKey;
pub use cfr::{cfr_traverse, regret_match, run_iteration, Node, RegretTable};
pub use eval::{evaluate_best, HandValue};
pub use game::{GameState, Street, Undo};
pub use strategy_io::{load_table, save_table, StrategyIoError};
pub use trainer::{train, TrainerConfig, TrainerError};
