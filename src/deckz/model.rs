use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A front/back text pair belonging to exactly one deck.
///
/// `is_marked` was added after the first released file format, so it is
/// optional on decode and defaults to `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub front_text: String,
    pub back_text: String,
    pub deck_id: Uuid,
    #[serde(default)]
    pub is_marked: bool,
}

impl Card {
    pub fn new(front_text: String, back_text: String, deck_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            front_text,
            back_text,
            deck_id,
            is_marked: false,
        }
    }
}

// Identity is the id, not the text. Two edits of the same card compare equal.
impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

/// A named, ordered collection of cards. Order is user-controlled (manual
/// reordering and shuffle), so it is preserved through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            cards: Vec::new(),
        }
    }

    /// Derived, never stored.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Deck {}

/// Outcome of one completed quiz session. Immutable once created; kept
/// forever even if the deck it refers to is later deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub date: DateTime<Utc>,
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    pub elapsed_seconds: u64,
}

impl QuizResult {
    pub fn new(deck_id: Uuid, correct: u32, wrong: u32, total: u32, elapsed_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            deck_id,
            date: Utc::now(),
            correct,
            wrong,
            total,
            elapsed_seconds,
        }
    }

    /// Fraction of correct answers, 0 for an empty session.
    pub fn accuracy(&self) -> f64 {
        if self.total > 0 {
            f64::from(self.correct) / f64::from(self.total)
        } else {
            0.0
        }
    }
}

impl PartialEq for QuizResult {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QuizResult {}
