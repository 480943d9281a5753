//! Card encoding and deck helpers.
//!
//! Cards are encoded as `card_id = 4 * rank + suit` where:
//! - rank: 0 (deuce) to 12 (ace)
//! - suit: 0-3 (clubs, diamonds, hearts, spades)

use rand::seq::SliceRandom;
use rand::Rng;

/// A card encoded as `4 * rank + suit` (0-51).
pub type Card = u8;

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Extract rank (0-12) from a card.
#[inline]
pub fn rank(card: Card) -> u8 {
    card / 4
}

/// Extract suit (0-3) from a card.
#[inline]
pub fn suit(card: Card) -> u8 {
    card % 4
}

/// Create a card from rank (0-12) and suit (0-3).
#[inline]
pub fn make_card(rank: u8, suit: u8) -> Card {
    rank * 4 + suit
}

/// The full 52-card deck in encoding order.
pub fn full_deck() -> [Card; DECK_SIZE] {
    let mut deck = [0u8; DECK_SIZE];
    for (i, card) in deck.iter_mut().enumerate() {
        *card = i as Card;
    }
    deck
}

/// Shuffle a deck in place.
pub fn shuffle_deck<R: Rng>(rng: &mut R, deck: &mut [Card]) {
    deck.shuffle(rng);
}

/// Format a card for display (e.g., "As", "Kh", "2c").
pub fn card_to_string(card: Card) -> String {
    const RANKS: &[char] = &['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
    const SUITS: &[char] = &['c', 'd', 'h', 's'];
    let r = rank(card) as usize;
    let s = suit(card) as usize;
    format!("{}{}", RANKS[r], SUITS[s])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_card_encoding_roundtrip() {
        for r in 0..13u8 {
            for s in 0..4u8 {
                let card = make_card(r, s);
                assert_eq!(rank(card), r);
                assert_eq!(suit(card), s);
            }
        }
    }

    #[test]
    fn test_full_deck_is_distinct() {
        let deck = full_deck();
        for (i, &card) in deck.iter().enumerate() {
            assert_eq!(card as usize, i);
        }
    }

    #[test]
    fn test_shuffle_preserves_cards() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut deck = full_deck();
        shuffle_deck(&mut rng, &mut deck);
        let mut sorted = deck;
        sorted.sort_unstable();
        assert_eq!(sorted, full_deck());
    }

    #[test]
    fn test_card_to_string() {
        assert_eq!(card_to_string(make_card(0, 0)), "2c");
        assert_eq!(card_to_string(make_card(12, 3)), "As");
        assert_eq!(card_to_string(make_card(8, 2)), "Th");
    }
}
