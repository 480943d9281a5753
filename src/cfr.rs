//! Counterfactual regret minimization over the bucketed game.
//!
//! The traversal mixes two regimes. Preflop it is a full vanilla-CFR sweep
//! for both players, which buys dense coverage of the small preflop tree.
//! On later streets it explores every action for the update player but
//! samples the opponent's action from the current strategy (external
//! sampling), keeping the per-iteration cost tractable.
//!
//! Discards are not learned: they are treated as uniform chance events and
//! averaged (update player) or sampled (opponent).

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::abstraction::InfoKey;
use crate::game::{Action, GameState, Street, NUM_BETTING_ACTIONS};

/// Accumulated regret and average-strategy weight for one information set.
///
/// Regrets are unclamped signed sums; `strat_sum` is non-negative and
/// non-decreasing. A fresh node is all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Node {
    pub regret: [f64; NUM_BETTING_ACTIONS],
    pub strat_sum: [f64; NUM_BETTING_ACTIONS],
}

impl Node {
    /// Average strategy over the legal actions: normalized `strat_sum`, or
    /// uniform if nothing has been accumulated yet. This is the quantity
    /// that converges to Nash.
    pub fn average_strategy(&self, legal: &[Action]) -> [f64; NUM_BETTING_ACTIONS] {
        let mut avg = [0.0; NUM_BETTING_ACTIONS];
        let mut norm = 0.0;
        for &a in legal {
            let a = a as usize;
            if a < NUM_BETTING_ACTIONS {
                avg[a] = self.strat_sum[a];
                norm += avg[a];
            }
        }
        if norm > 0.0 {
            for v in &mut avg {
                *v /= norm;
            }
        } else {
            let uniform = 1.0 / legal.len().max(1) as f64;
            for &a in legal {
                if (a as usize) < NUM_BETTING_ACTIONS {
                    avg[a as usize] = uniform;
                }
            }
        }
        avg
    }
}

/// Regret/strategy accumulators keyed by bucketed information state.
pub type RegretTable = HashMap<InfoKey, Node>;

/// Current strategy by regret matching: positive regrets normalized over the
/// legal actions, uniform over legal if all regrets are non-positive.
///
/// Entries for illegal actions are zero.
pub fn regret_match(node: &Node, legal: &[Action]) -> [f64; NUM_BETTING_ACTIONS] {
    let mut strat = [0.0; NUM_BETTING_ACTIONS];
    let mut norm = 0.0;
    for &a in legal {
        let a = a as usize;
        if a < NUM_BETTING_ACTIONS {
            strat[a] = node.regret[a].max(0.0);
            norm += strat[a];
        }
    }
    if norm > 0.0 {
        for &a in legal {
            if (a as usize) < NUM_BETTING_ACTIONS {
                strat[a as usize] /= norm;
            }
        }
    } else {
        let uniform = 1.0 / legal.len().max(1) as f64;
        for &a in legal {
            if (a as usize) < NUM_BETTING_ACTIONS {
                strat[a as usize] = uniform;
            }
        }
    }
    strat
}

/// Traverse the game from `state`, accumulating regrets and strategy weights
/// for `update_player` into `table`. Returns the node's counterfactual value
/// for the update player.
///
/// `pi0` / `pi1` are each player's reach-probability contribution along the
/// current path; the root call passes 1.0 for both.
pub fn cfr_traverse(
    state: &mut GameState,
    update_player: usize,
    pi0: f64,
    pi1: f64,
    rng: &mut SmallRng,
    table: &mut RegretTable,
) -> f64 {
    if state.is_terminal {
        return state.payoffs[update_player];
    }

    let player = state.current_player;
    let legal = state.legal_actions();

    // Discard nodes are chance-like: uniform, never learned.
    if state.is_discard_phase() {
        if player == update_player {
            let weight = 1.0 / legal.len() as f64;
            let mut total = 0.0;
            for &action in &legal {
                let undo = state.apply_action(action);
                total += weight * cfr_traverse(state, update_player, pi0, pi1, rng, table);
                state.undo_action(&undo);
            }
            return total;
        }
        let action = legal[rng.gen_range(0..legal.len())];
        let undo = state.apply_action(action);
        let value = cfr_traverse(state, update_player, pi0, pi1, rng, table);
        state.undo_action(&undo);
        return value;
    }

    let key = state.info_key(player, &legal);
    let strat = regret_match(table.entry(key).or_default(), &legal);

    // Average-strategy accumulation, weighted by the acting player's reach.
    let reach = if player == 0 { pi0 } else { pi1 };
    {
        let node = table.entry(key).or_default();
        for &a in &legal {
            if (a as usize) < NUM_BETTING_ACTIONS {
                node.strat_sum[a as usize] += reach * strat[a as usize];
            }
        }
    }

    let full_traversal = state.street == Street::Preflop || player == update_player;

    if full_traversal {
        let mut action_values = [0.0; NUM_BETTING_ACTIONS];
        for &action in &legal {
            let undo = state.apply_action(action);
            let p = strat[action as usize];
            let value = if player == 0 {
                cfr_traverse(state, update_player, pi0 * p, pi1, rng, table)
            } else {
                cfr_traverse(state, update_player, pi0, pi1 * p, rng, table)
            };
            state.undo_action(&undo);
            action_values[action as usize] = value;
        }

        let mut node_value = 0.0;
        for &a in &legal {
            node_value += strat[a as usize] * action_values[a as usize];
        }

        if player == update_player {
            let node = table.entry(key).or_default();
            for &a in &legal {
                if (a as usize) < NUM_BETTING_ACTIONS {
                    node.regret[a as usize] += action_values[a as usize] - node_value;
                }
            }
        }

        node_value
    } else {
        // External sampling: play one opponent action drawn from the
        // strategy.
        let action = sample_action(&legal, &strat, rng);
        let p = strat[action as usize];
        let undo = state.apply_action(action);
        let value = if player == 0 {
            cfr_traverse(state, update_player, pi0 * p, pi1, rng, table)
        } else {
            cfr_traverse(state, update_player, pi0, pi1 * p, rng, table)
        };
        state.undo_action(&undo);
        value
    }
}

/// Draw one legal action from the strategy distribution, falling back to
/// uniform if the restricted mass is zero.
fn sample_action(legal: &[Action], strat: &[f64; NUM_BETTING_ACTIONS], rng: &mut SmallRng) -> Action {
    let total: f64 = legal.iter().map(|&a| strat[a as usize]).sum();
    if total <= 0.0 {
        return legal[rng.gen_range(0..legal.len())];
    }

    let mut r: f64 = rng.gen::<f64>() * total;
    let mut chosen = legal[legal.len() - 1];
    for &a in legal {
        r -= strat[a as usize];
        if r <= 0.0 {
            chosen = a;
            break;
        }
    }
    chosen
}

/// One training iteration: deal a fresh hand, then traverse it once per
/// update player from unit reach.
pub fn run_iteration(state: &mut GameState, rng: &mut SmallRng, table: &mut RegretTable) {
    state.reset(rng);
    for update_player in 0..2 {
        cfr_traverse(state, update_player, 1.0, 1.0, rng, table);
    }
}
