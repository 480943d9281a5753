//! Game state machine for heads-up Toss'em Hold'em.
//!
//! Toss'em deals three hole cards to each player. Betting runs preflop and on
//! a two-card flop; then each player in turn (big blind first) discards one
//! hole card face up onto the board, the turn is dealt, and betting resumes
//! through turn and river. Showdown compares each player's best five of
//! `2 hole + 6 board` cards.
//!
//! [`GameState`] mutates in place and hands back a cheap [`Undo`] record per
//! action, so a tree traversal can walk millions of nodes without cloning.

use rand::Rng;

use crate::abstraction::{compute_info_key, InfoKey};
use crate::cards::{full_deck, shuffle_deck, Card};
use crate::eval::evaluate_best;

pub const STARTING_STACK: i32 = 400;
pub const SMALL_BLIND: i32 = 1;
pub const BIG_BLIND: i32 = 2;

/// Distinct action id: betting 0..=3, discards 4..=6 (discard index = id - 4).
pub type Action = u8;

pub const FOLD: Action = 0;
pub const CHECK_CALL: Action = 1;
pub const RAISE_SMALL: Action = 2;
pub const RAISE_LARGE: Action = 3;
pub const DISCARD_0: Action = 4;
pub const DISCARD_1: Action = 5;
pub const DISCARD_2: Action = 6;

/// Learned betting actions.
pub const NUM_BETTING_ACTIONS: usize = 4;
/// Betting actions plus the three discard positions.
pub const NUM_DISTINCT_ACTIONS: usize = 7;

/// Pot fraction targeted by [`RAISE_SMALL`].
const RAISE_SMALL_FRACTION: f64 = 0.55;
/// Pot fraction targeted by [`RAISE_LARGE`].
const RAISE_LARGE_FRACTION: f64 = 1.0;

/// Streets in play order. The two discard phases sit between the flop and
/// the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Street {
    Preflop = 0,
    Flop = 1,
    BbDiscard = 2,
    SbDiscard = 3,
    Turn = 4,
    River = 5,
}

impl Street {
    /// Street name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::BbDiscard => "bb-discard",
            Street::SbDiscard => "sb-discard",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

/// Snapshot taken by [`GameState::apply_action`], sufficient to roll back
/// exactly one action.
///
/// Histories are restored by truncation; `board` and `deck` cells past the
/// restored sizes are unreachable and never rewritten. Hole cards are the one
/// buffer whose cells a discard overwrites in place (swap-with-last), so the
/// snapshot carries them by value — six bytes, no heap.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    street: Street,
    current_player: usize,
    pips: [i32; 2],
    stacks: [i32; 2],
    bb_discarded: bool,
    sb_discarded: bool,
    is_terminal: bool,
    payoffs: [f64; 2],
    history_len: usize,
    street_history_len: usize,
    deck_idx: usize,
    hands: [[Card; 3]; 2],
    hand_sizes: [usize; 2],
    board_size: usize,
}

/// Mutable game state for one hand of heads-up Toss'em.
///
/// Player 0 is the small blind and acts first preflop; player 1 (big blind)
/// acts first on every later street. All card buffers are fixed-size with
/// explicit lengths alongside.
#[derive(Debug, Clone)]
pub struct GameState {
    pub hands: [[Card; 3]; 2],
    pub hand_sizes: [usize; 2],
    pub board: [Card; 6],
    pub board_size: usize,
    /// Remainder of the deck after dealing the six hole cards.
    pub deck: [Card; 46],
    pub deck_idx: usize,
    pub street: Street,
    /// Chips committed on the current street.
    pub pips: [i32; 2],
    pub stacks: [i32; 2],
    pub current_player: usize,
    /// Betting actions over the whole hand, as (player, action).
    pub history: Vec<(u8, Action)>,
    /// Betting actions on the current street.
    pub street_history: Vec<(u8, Action)>,
    pub bb_discarded: bool,
    pub sb_discarded: bool,
    pub is_terminal: bool,
    pub payoffs: [f64; 2],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// An undealt state. Call [`reset`](Self::reset) before play.
    pub fn new() -> Self {
        GameState {
            hands: [[0; 3]; 2],
            hand_sizes: [0, 0],
            board: [0; 6],
            board_size: 0,
            deck: [0; 46],
            deck_idx: 0,
            street: Street::Preflop,
            pips: [SMALL_BLIND, BIG_BLIND],
            stacks: [STARTING_STACK - SMALL_BLIND, STARTING_STACK - BIG_BLIND],
            current_player: 0,
            history: Vec::new(),
            street_history: Vec::new(),
            bb_discarded: false,
            sb_discarded: false,
            is_terminal: false,
            payoffs: [0.0, 0.0],
        }
    }

    /// Shuffle a fresh deck, deal three hole cards to each player, post the
    /// blinds.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let mut full = full_deck();
        shuffle_deck(rng, &mut full);

        for p in 0..2 {
            self.hand_sizes[p] = 3;
            self.hands[p][..3].copy_from_slice(&full[p * 3..p * 3 + 3]);
        }
        self.deck.copy_from_slice(&full[6..]);
        self.deck_idx = 0;

        self.board_size = 0;
        self.street = Street::Preflop;
        self.pips = [SMALL_BLIND, BIG_BLIND];
        self.stacks = [STARTING_STACK - SMALL_BLIND, STARTING_STACK - BIG_BLIND];
        self.current_player = 0;
        self.history.clear();
        self.street_history.clear();
        self.bb_discarded = false;
        self.sb_discarded = false;
        self.is_terminal = false;
        self.payoffs = [0.0, 0.0];
    }

    /// Total chips contested.
    #[inline]
    pub fn pot(&self) -> i32 {
        (STARTING_STACK - self.stacks[0]) + (STARTING_STACK - self.stacks[1])
    }

    /// Chips the current player must add to match the opponent's pip.
    #[inline]
    pub fn continue_cost(&self) -> i32 {
        self.pips[1 - self.current_player] - self.pips[self.current_player]
    }

    /// The smaller of the two remaining stacks.
    #[inline]
    pub fn effective_stack(&self) -> i32 {
        self.stacks[0].min(self.stacks[1])
    }

    /// True while the street is a discard phase whose discard is still owed.
    pub fn is_discard_phase(&self) -> bool {
        match self.street {
            Street::BbDiscard => !self.bb_discarded,
            Street::SbDiscard => !self.sb_discarded,
            _ => false,
        }
    }

    /// Legal actions for the current player; empty once terminal.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_terminal {
            return Vec::new();
        }

        if self.is_discard_phase() {
            // The discarder always holds exactly three cards here.
            return vec![DISCARD_0, DISCARD_1, DISCARD_2];
        }

        let cost = self.continue_cost();
        let mut actions = Vec::with_capacity(4);
        if cost == 0 {
            actions.push(CHECK_CALL);
            if self.stacks[0] > 0 && self.stacks[1] > 0 {
                actions.push(RAISE_SMALL);
                actions.push(RAISE_LARGE);
            }
        } else {
            actions.push(FOLD);
            actions.push(CHECK_CALL);
            if cost < self.stacks[self.current_player] && self.stacks[1 - self.current_player] > 0 {
                actions.push(RAISE_SMALL);
                actions.push(RAISE_LARGE);
            }
        }
        actions
    }

    /// A street ends once both players have acted on it, pips are level and
    /// the last action was a check or call. A fold ends the hand instead.
    fn should_advance_street(&self) -> bool {
        if self.street_history.len() < 2 {
            return false;
        }
        self.pips[0] == self.pips[1]
            && self
                .street_history
                .last()
                .is_some_and(|&(_, a)| a == CHECK_CALL)
    }

    fn advance_street(&mut self) {
        self.pips = [0, 0];
        self.street_history.clear();

        match self.street {
            Street::Preflop => {
                // Two-card flop.
                self.board[0] = self.deck[self.deck_idx];
                self.board[1] = self.deck[self.deck_idx + 1];
                self.board_size = 2;
                self.deck_idx += 2;
                self.street = Street::Flop;
                self.current_player = 1; // BB acts first postflop
            }
            Street::Flop => {
                self.street = Street::BbDiscard;
                self.current_player = 1; // BB discards first
            }
            Street::Turn => {
                self.board[self.board_size] = self.deck[self.deck_idx];
                self.board_size += 1;
                self.deck_idx += 1;
                self.street = Street::River;
                self.current_player = 1;
            }
            Street::River => {
                self.showdown();
            }
            // Discard streets are resolved by apply_discard, not here.
            Street::BbDiscard | Street::SbDiscard => {}
        }
    }

    /// Move the chosen hole card to the board. The SB discard also deals the
    /// turn card and opens turn betting.
    fn apply_discard(&mut self, discard_idx: usize) {
        let p = if self.street == Street::BbDiscard { 1 } else { 0 };
        let card = self.hands[p][discard_idx];
        let hs = self.hand_sizes[p];
        self.hands[p][discard_idx] = self.hands[p][hs - 1];
        self.hand_sizes[p] = hs - 1;

        self.board[self.board_size] = card;
        self.board_size += 1;

        if p == 1 {
            self.bb_discarded = true;
            self.street = Street::SbDiscard;
            self.current_player = 0;
        } else {
            self.sb_discarded = true;
            self.board[self.board_size] = self.deck[self.deck_idx];
            self.board_size += 1;
            self.deck_idx += 1;
            self.street = Street::Turn;
            self.current_player = 1;
            self.pips = [0, 0];
            self.street_history.clear();
        }
    }

    fn showdown(&mut self) {
        self.is_terminal = true;

        let mut cards = [[0u8; 8]; 2];
        let mut sizes = [0usize; 2];
        for p in 0..2 {
            let hs = self.hand_sizes[p];
            cards[p][..hs].copy_from_slice(&self.hands[p][..hs]);
            cards[p][hs..hs + self.board_size].copy_from_slice(&self.board[..self.board_size]);
            sizes[p] = hs + self.board_size;
        }

        let h0 = evaluate_best(&cards[0][..sizes[0]]);
        let h1 = evaluate_best(&cards[1][..sizes[1]]);

        let half_pot = self.pot() as f64 / 2.0;
        self.payoffs = match h0.cmp(&h1) {
            std::cmp::Ordering::Greater => [half_pot, -half_pot],
            std::cmp::Ordering::Less => [-half_pot, half_pot],
            std::cmp::Ordering::Equal => [0.0, 0.0],
        };
    }

    /// Apply one legal action and return the record that undoes it.
    pub fn apply_action(&mut self, action: Action) -> Undo {
        let undo = Undo {
            street: self.street,
            current_player: self.current_player,
            pips: self.pips,
            stacks: self.stacks,
            bb_discarded: self.bb_discarded,
            sb_discarded: self.sb_discarded,
            is_terminal: self.is_terminal,
            payoffs: self.payoffs,
            history_len: self.history.len(),
            street_history_len: self.street_history.len(),
            deck_idx: self.deck_idx,
            hands: self.hands,
            hand_sizes: self.hand_sizes,
            board_size: self.board_size,
        };

        if self.is_terminal {
            return undo;
        }

        if self.is_discard_phase() {
            self.apply_discard((action - DISCARD_0) as usize);
            return undo;
        }

        let cost = self.continue_cost();
        let pot = self.pot();
        let player = self.current_player;

        match action {
            FOLD => {
                self.is_terminal = true;
                let winner = 1 - player;
                // The folder forfeits what they have committed so far.
                let delta = (STARTING_STACK - self.stacks[player]) as f64;
                self.payoffs[winner] = delta;
                self.payoffs[player] = -delta;
                return undo;
            }
            CHECK_CALL => {
                if cost > 0 {
                    let actual = cost.min(self.stacks[player]);
                    self.pips[player] += actual;
                    self.stacks[player] -= actual;
                }
            }
            RAISE_SMALL | RAISE_LARGE => {
                let fraction = if action == RAISE_SMALL {
                    RAISE_SMALL_FRACTION
                } else {
                    RAISE_LARGE_FRACTION
                };
                let mut raise_amt = (pot as f64 * fraction) as i32;
                let min_raise = cost + cost.max(BIG_BLIND);
                raise_amt = raise_amt.max(min_raise);
                raise_amt = raise_amt.min(self.stacks[player]);

                let total_contrib = (cost + raise_amt).min(self.stacks[player]);
                self.pips[player] += total_contrib;
                self.stacks[player] -= total_contrib;
            }
            _ => debug_assert!(false, "discard action outside discard phase"),
        }

        self.history.push((player as u8, action));
        self.street_history.push((player as u8, action));

        if self.should_advance_street() {
            self.advance_street();
        } else {
            self.current_player = 1 - self.current_player;
        }

        undo
    }

    /// Restore the state captured by `undo`. Undo records must be applied in
    /// strict reverse order of their `apply_action` calls.
    pub fn undo_action(&mut self, undo: &Undo) {
        self.street = undo.street;
        self.current_player = undo.current_player;
        self.pips = undo.pips;
        self.stacks = undo.stacks;
        self.bb_discarded = undo.bb_discarded;
        self.sb_discarded = undo.sb_discarded;
        self.is_terminal = undo.is_terminal;
        self.payoffs = undo.payoffs;

        self.history.truncate(undo.history_len);
        self.street_history.truncate(undo.street_history_len);

        self.deck_idx = undo.deck_idx;
        self.hands = undo.hands;
        self.hand_sizes = undo.hand_sizes;
        self.board_size = undo.board_size;
    }

    /// The information-state key for `player` at this decision point.
    pub fn info_key(&self, player: usize, legal_actions: &[Action]) -> InfoKey {
        let mut mask = 0u8;
        for &a in legal_actions {
            if (a as usize) < NUM_DISTINCT_ACTIONS {
                mask |= 1 << a;
            }
        }

        compute_info_key(
            player,
            self.street,
            &self.hands[player][..self.hand_sizes[player]],
            &self.board[..self.board_size],
            self.pot(),
            self.effective_stack(),
            &self.history,
            self.bb_discarded,
            self.sb_discarded,
            mask,
        )
    }
}
