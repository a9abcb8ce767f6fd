//! Read-only derivations over the quiz history. Pure functions; safe to
//! recompute at any time.

use crate::model::QuizResult;
use uuid::Uuid;

/// How many recent sessions feed the mastery score.
const MASTERY_WINDOW: usize = 10;

/// Per-deck rollup of the quiz history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckStats {
    pub sessions: usize,
    pub avg_accuracy: f64,
    pub best_accuracy: f64,
}

impl DeckStats {
    pub fn empty() -> Self {
        Self {
            sessions: 0,
            avg_accuracy: 0.0,
            best_accuracy: 0.0,
        }
    }
}

/// Session count, average accuracy and best accuracy for one deck.
pub fn stats_for_deck(history: &[QuizResult], deck_id: Uuid) -> DeckStats {
    let accuracies: Vec<f64> = history
        .iter()
        .filter(|r| r.deck_id == deck_id)
        .map(QuizResult::accuracy)
        .collect();

    if accuracies.is_empty() {
        return DeckStats::empty();
    }

    let sum: f64 = accuracies.iter().sum();
    let best = accuracies.iter().cloned().fold(0.0, f64::max);
    DeckStats {
        sessions: accuracies.len(),
        avg_accuracy: sum / accuracies.len() as f64,
        best_accuracy: best,
    }
}

/// Recency-weighted mastery in [0, 1].
///
/// Takes up to the 10 most recent results for the deck (history is stored
/// newest-first), weights them n, n-1, ..., 1 from newest to oldest and
/// returns the weighted mean of their accuracies. Clamped against
/// floating-point drift.
pub fn mastery_for_deck(history: &[QuizResult], deck_id: Uuid) -> f64 {
    let recent: Vec<f64> = history
        .iter()
        .filter(|r| r.deck_id == deck_id)
        .take(MASTERY_WINDOW)
        .map(QuizResult::accuracy)
        .collect();

    if recent.is_empty() {
        return 0.0;
    }

    let n = recent.len();
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (i, accuracy) in recent.iter().enumerate() {
        let weight = (n - i) as f64;
        weighted += accuracy * weight;
        total_weight += weight;
    }

    (weighted / total_weight).clamp(0.0, 1.0)
}

/// Letter grade for an accuracy, matching the progress screen's scale.
pub fn grade(accuracy: f64) -> char {
    if accuracy >= 0.90 {
        'A'
    } else if accuracy >= 0.80 {
        'B'
    } else if accuracy >= 0.70 {
        'C'
    } else if accuracy >= 0.60 {
        'D'
    } else {
        'F'
    }
}
