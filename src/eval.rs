//! Five-card hand evaluation.
//!
//! [`evaluate_best`] maps any bag of cards to the best [`HandValue`] over all
//! five-card subsets. Values compare lexicographically on (category, kickers),
//! so `>` directly answers "which hand wins at showdown".

use crate::cards::{rank, suit, Card};

/// Hand category constants (higher = better).
pub const HIGH_CARD: u8 = 0;
pub const PAIR: u8 = 1;
pub const TWO_PAIR: u8 = 2;
pub const TRIPS: u8 = 3;
pub const STRAIGHT: u8 = 4;
pub const FLUSH: u8 = 5;
pub const FULL_HOUSE: u8 = 6;
pub const QUADS: u8 = 7;
pub const STRAIGHT_FLUSH: u8 = 8;

/// A comparable hand value: category plus kicker ranks in significance order,
/// padded with zeros.
///
/// The derived ordering is lexicographic on (category, kickers), which is the
/// total order poker needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue {
    pub category: u8,
    pub kickers: [u8; 5],
}

/// Evaluate exactly five cards.
fn eval_five(cards: &[Card; 5]) -> HandValue {
    let mut ranks = [0u8; 5];
    let mut suits = [0u8; 5];
    for i in 0..5 {
        ranks[i] = rank(cards[i]);
        suits[i] = suit(cards[i]);
    }
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = suits.iter().all(|&s| s == suits[0]);

    // Group ranks by multiplicity: (count, rank), count desc then rank desc.
    let mut counts = [0u8; 13];
    for &r in &ranks {
        counts[r as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
    for r in (0..13u8).rev() {
        if counts[r as usize] > 0 {
            groups.push((counts[r as usize], r));
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));

    // Unique ranks, descending, for straight detection.
    let mut uniq: Vec<u8> = Vec::with_capacity(5);
    for &r in &ranks {
        if uniq.last() != Some(&r) {
            uniq.push(r);
        }
    }

    let mut is_straight = false;
    let mut straight_high = 0u8;
    if uniq.len() == 5 {
        if uniq[0] - uniq[4] == 4 {
            is_straight = true;
            straight_high = uniq[0];
        } else if uniq == [12, 3, 2, 1, 0] {
            // wheel: A-5-4-3-2 plays as a 5-high straight
            is_straight = true;
            straight_high = 3;
        }
    }

    if is_straight && is_flush {
        return HandValue {
            category: STRAIGHT_FLUSH,
            kickers: [straight_high, 0, 0, 0, 0],
        };
    }
    if groups[0].0 == 4 {
        return HandValue {
            category: QUADS,
            kickers: [groups[0].1, groups[1].1, 0, 0, 0],
        };
    }
    if groups[0].0 == 3 && groups.len() > 1 && groups[1].0 == 2 {
        return HandValue {
            category: FULL_HOUSE,
            kickers: [groups[0].1, groups[1].1, 0, 0, 0],
        };
    }
    if is_flush {
        return HandValue {
            category: FLUSH,
            kickers: ranks,
        };
    }
    if is_straight {
        return HandValue {
            category: STRAIGHT,
            kickers: [straight_high, 0, 0, 0, 0],
        };
    }
    if groups[0].0 == 3 {
        let singles = singles_desc(&groups);
        return HandValue {
            category: TRIPS,
            kickers: [groups[0].1, singles[0], singles[1], 0, 0],
        };
    }
    if groups[0].0 == 2 && groups.len() > 1 && groups[1].0 == 2 {
        let hi = groups[0].1.max(groups[1].1);
        let lo = groups[0].1.min(groups[1].1);
        let singles = singles_desc(&groups);
        return HandValue {
            category: TWO_PAIR,
            kickers: [hi, lo, singles[0], 0, 0],
        };
    }
    if groups[0].0 == 2 {
        let singles = singles_desc(&groups);
        return HandValue {
            category: PAIR,
            kickers: [groups[0].1, singles[0], singles[1], singles[2], 0],
        };
    }
    HandValue {
        category: HIGH_CARD,
        kickers: ranks,
    }
}

/// Ranks appearing exactly once, descending, padded with zeros.
fn singles_desc(groups: &[(u8, u8)]) -> [u8; 5] {
    let mut out = [0u8; 5];
    let mut n = 0;
    for &(count, r) in groups {
        if count == 1 && n < 5 {
            out[n] = r;
            n += 1;
        }
    }
    out
}

/// Evaluate the best five-card hand from any bag of cards.
///
/// With fewer than five cards this degrades to a high-card value over the
/// ranks present (never reached during normal training). Order-independent:
/// a pure function of the card multiset.
pub fn evaluate_best(cards: &[Card]) -> HandValue {
    let n = cards.len();
    if n < 5 {
        let mut ranks: Vec<u8> = cards.iter().map(|&c| rank(c)).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let mut kickers = [0u8; 5];
        for (i, &r) in ranks.iter().take(5).enumerate() {
            kickers[i] = r;
        }
        return HandValue {
            category: HIGH_CARD,
            kickers,
        };
    }

    // Brute-force all C(n,5) subsets; 56 combinations for the usual n=8.
    let mut best = HandValue::default();
    let mut first = true;
    for a in 0..n - 4 {
        for b in a + 1..n - 3 {
            for c in b + 1..n - 2 {
                for d in c + 1..n - 1 {
                    for e in d + 1..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let hv = eval_five(&five);
                        if first || hv > best {
                            best = hv;
                            first = false;
                        }
                    }
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::make_card;

    #[test]
    fn test_high_card() {
        // A K Q J 9, mixed suits
        let cards = [
            make_card(12, 0),
            make_card(11, 1),
            make_card(10, 2),
            make_card(9, 3),
            make_card(7, 0),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, HIGH_CARD);
        assert_eq!(hv.kickers, [12, 11, 10, 9, 7]);
    }

    #[test]
    fn test_pair_kickers() {
        let cards = [
            make_card(12, 0),
            make_card(12, 1),
            make_card(10, 2),
            make_card(9, 3),
            make_card(7, 0),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, PAIR);
        assert_eq!(hv.kickers, [12, 10, 9, 7, 0]);
    }

    #[test]
    fn test_two_pair_orders_pairs() {
        let cards = [
            make_card(3, 0),
            make_card(3, 1),
            make_card(9, 2),
            make_card(9, 3),
            make_card(7, 0),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, TWO_PAIR);
        assert_eq!(hv.kickers, [9, 3, 7, 0, 0]);
    }

    #[test]
    fn test_full_house() {
        let cards = [
            make_card(8, 0),
            make_card(8, 1),
            make_card(8, 2),
            make_card(2, 0),
            make_card(2, 1),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, FULL_HOUSE);
        assert_eq!(hv.kickers, [8, 2, 0, 0, 0]);
    }

    #[test]
    fn test_wheel_is_five_high_straight() {
        // A 2 3 4 5, mixed suits
        let cards = [
            make_card(12, 0),
            make_card(0, 1),
            make_card(1, 2),
            make_card(2, 3),
            make_card(3, 0),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, STRAIGHT);
        assert_eq!(hv.kickers[0], 3); // high card is the five
    }

    #[test]
    fn test_wheel_beats_pair_of_kings() {
        let wheel = [
            make_card(12, 0),
            make_card(0, 1),
            make_card(1, 2),
            make_card(2, 3),
            make_card(3, 0),
        ];
        let kings = [
            make_card(11, 0),
            make_card(11, 1),
            make_card(5, 2),
            make_card(2, 3),
            make_card(0, 0),
        ];
        assert!(evaluate_best(&wheel) > evaluate_best(&kings));
    }

    #[test]
    fn test_category_monotonicity() {
        // One witness per category, ascending.
        let witnesses: Vec<Vec<Card>> = vec![
            // high card
            vec![make_card(12, 0), make_card(10, 1), make_card(8, 2), make_card(6, 3), make_card(4, 0)],
            // pair
            vec![make_card(0, 0), make_card(0, 1), make_card(8, 2), make_card(6, 3), make_card(4, 0)],
            // two pair
            vec![make_card(0, 0), make_card(0, 1), make_card(1, 2), make_card(1, 3), make_card(4, 0)],
            // trips
            vec![make_card(0, 0), make_card(0, 1), make_card(0, 2), make_card(6, 3), make_card(4, 0)],
            // straight
            vec![make_card(0, 0), make_card(1, 1), make_card(2, 2), make_card(3, 3), make_card(4, 0)],
            // flush
            vec![make_card(0, 1), make_card(2, 1), make_card(4, 1), make_card(6, 1), make_card(8, 1)],
            // full house
            vec![make_card(0, 0), make_card(0, 1), make_card(0, 2), make_card(1, 0), make_card(1, 1)],
            // quads
            vec![make_card(0, 0), make_card(0, 1), make_card(0, 2), make_card(0, 3), make_card(1, 0)],
            // straight flush
            vec![make_card(0, 2), make_card(1, 2), make_card(2, 2), make_card(3, 2), make_card(4, 2)],
        ];
        for pair in witnesses.windows(2) {
            assert!(
                evaluate_best(&pair[1]) > evaluate_best(&pair[0]),
                "{:?} should beat {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_order_independence() {
        let cards = [
            make_card(12, 3),
            make_card(11, 3),
            make_card(10, 3),
            make_card(9, 3),
            make_card(8, 3),
            make_card(2, 0),
            make_card(0, 1),
            make_card(5, 2),
        ];
        let baseline = evaluate_best(&cards);
        assert_eq!(baseline.category, STRAIGHT_FLUSH);

        // Rotations and a reversal cover enough permutations to catch
        // order-dependent bugs without enumerating all 8!.
        let mut rotated = cards;
        for _ in 0..cards.len() {
            rotated.rotate_left(1);
            assert_eq!(evaluate_best(&rotated), baseline);
        }
        let mut reversed = cards;
        reversed.reverse();
        assert_eq!(evaluate_best(&reversed), baseline);
    }

    #[test]
    fn test_best_of_eight_finds_hidden_flush() {
        // Flush buried among eight cards.
        let cards = [
            make_card(12, 1),
            make_card(9, 1),
            make_card(7, 1),
            make_card(4, 1),
            make_card(2, 1),
            make_card(11, 0),
            make_card(11, 2),
            make_card(11, 3),
        ];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, FLUSH);
        assert_eq!(hv.kickers, [12, 9, 7, 4, 2]);
    }

    #[test]
    fn test_fewer_than_five_cards() {
        let cards = [make_card(4, 0), make_card(12, 1), make_card(0, 2)];
        let hv = evaluate_best(&cards);
        assert_eq!(hv.category, HIGH_CARD);
        assert_eq!(hv.kickers, [12, 4, 0, 0, 0]);
    }
}
