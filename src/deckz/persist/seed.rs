//! Built-in sample dataset used when no saved decks exist yet, so the
//! application always starts in a usable state.

use crate::model::{Card, Deck};

pub fn sample_decks() -> Vec<Deck> {
    vec![
        deck(
            "French – Subjonctif",
            &[
                ("être — je", "je sois"),
                ("aller — nous", "nous allions"),
                ("faire — il/elle", "qu'il/elle fasse"),
            ],
        ),
        deck(
            "Calc – Derivatives",
            &[
                ("d/dx (x²)", "2x"),
                ("d/dx (sin x)", "cos x"),
                ("d/dx (e^x)", "e^x"),
            ],
        ),
    ]
}

fn deck(title: &str, cards: &[(&str, &str)]) -> Deck {
    let mut deck = Deck::new(title.to_string());
    for (front, back) in cards {
        deck.cards
            .push(Card::new(front.to_string(), back.to_string(), deck.id));
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_two_populated_decks() {
        let decks = sample_decks();
        assert_eq!(decks.len(), 2);
        for d in &decks {
            assert_eq!(d.card_count(), 3);
            assert!(d.cards.iter().all(|c| c.deck_id == d.id));
            assert!(d.cards.iter().all(|c| !c.is_marked));
        }
    }
}
