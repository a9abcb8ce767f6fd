//! The authoritative state container.
//!
//! A [`Store`] owns the deck collection and the quiz history; every other
//! component works on snapshots and feeds changes back through these
//! mutation methods. There is no implicit singleton: the binary constructs
//! one store at startup and tests construct isolated instances.
//!
//! The mutation contract is deliberately permissive: bad input (missing
//! ids, empty text, inconsistent counters) makes the call a no-op. The
//! store never corrupts state and never raises on bad input; callers are
//! expected to pre-validate where they want feedback.
//!
//! Every successful mutation emits a [`StoreEvent`] carrying a snapshot of
//! the changed collection. The autosave worker drains these events and
//! performs debounced writes; the store itself never touches the disk.

use crate::model::{Card, Deck, QuizResult};
use crate::persist::seed;
use rand::seq::SliceRandom;
use std::sync::mpsc::Sender;
use uuid::Uuid;

/// Change notification, one per tracked collection. Decks and quiz
/// history are persisted independently.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    DecksChanged(Vec<Deck>),
    HistoryChanged(Vec<QuizResult>),
}

pub struct Store {
    decks: Vec<Deck>,
    /// Newest first: results are inserted at the head.
    history: Vec<QuizResult>,
    events: Option<Sender<StoreEvent>>,
}

impl Store {
    pub fn new(decks: Vec<Deck>, history: Vec<QuizResult>) -> Self {
        Self {
            decks,
            history,
            events: None,
        }
    }

    /// Registers the channel that receives change snapshots.
    pub fn with_events(mut self, events: Sender<StoreEvent>) -> Self {
        self.events = Some(events);
        self
    }

    // --- Queries ---

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, id: Uuid) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn history(&self) -> &[QuizResult] {
        &self.history
    }

    /// Count of marked cards in a deck; 0 when the deck is absent.
    pub fn marked_count(&self, deck_id: Uuid) -> usize {
        self.deck(deck_id)
            .map(|d| d.cards.iter().filter(|c| c.is_marked).count())
            .unwrap_or(0)
    }

    /// Case-insensitive front/back filter within one deck.
    pub fn search_cards(&self, deck_id: Uuid, query: &str) -> Vec<&Card> {
        let q = query.trim().to_lowercase();
        let Some(deck) = self.deck(deck_id) else {
            return Vec::new();
        };
        if q.is_empty() {
            return deck.cards.iter().collect();
        }
        deck.cards
            .iter()
            .filter(|c| {
                c.front_text.to_lowercase().contains(&q) || c.back_text.to_lowercase().contains(&q)
            })
            .collect()
    }

    // --- Deck mutations ---

    /// Appends a new empty deck and returns its id. Always succeeds;
    /// keeping the title non-empty is the caller's job.
    pub fn add_deck(&mut self, title: &str) -> Uuid {
        let deck = Deck::new(title.to_string());
        let id = deck.id;
        self.decks.push(deck);
        self.emit_decks();
        id
    }

    pub fn rename_deck(&mut self, id: Uuid, title: &str) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == id) else {
            return;
        };
        deck.title = title.to_string();
        self.emit_decks();
    }

    /// Removes the deck and all its cards. Quiz history for the deck is
    /// kept; history entries hold only a weak reference.
    pub fn delete_deck(&mut self, id: Uuid) {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != id);
        if self.decks.len() != before {
            self.emit_decks();
        }
    }

    /// Drops every deck. History is untouched.
    pub fn delete_all(&mut self) {
        self.decks.clear();
        self.emit_decks();
    }

    /// Replaces the deck collection with the built-in sample dataset.
    pub fn reset_to_sample(&mut self) {
        self.decks = seed::sample_decks();
        self.emit_decks();
    }

    // --- Card mutations ---

    pub fn add_card(&mut self, front: &str, back: &str, deck_id: Uuid) {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() || back.is_empty() {
            return;
        }
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        deck.cards
            .push(Card::new(front.to_string(), back.to_string(), deck_id));
        self.emit_decks();
    }

    /// Appends many cards in input order. Pairs that are empty after
    /// trimming are skipped, not reported.
    pub fn add_cards(&mut self, pairs: &[(String, String)], deck_id: Uuid) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        for (front, back) in pairs {
            let front = front.trim();
            let back = back.trim();
            if front.is_empty() || back.is_empty() {
                continue;
            }
            deck.cards
                .push(Card::new(front.to_string(), back.to_string(), deck_id));
        }
        self.emit_decks();
    }

    /// Updates only the provided sides; id, deck membership and the
    /// marked flag are preserved.
    pub fn update_card(
        &mut self,
        card_id: Uuid,
        deck_id: Uuid,
        front: Option<&str>,
        back: Option<&str>,
    ) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        let Some(card) = deck.cards.iter_mut().find(|c| c.id == card_id) else {
            return;
        };
        if let Some(front) = front {
            card.front_text = front.to_string();
        }
        if let Some(back) = back {
            card.back_text = back.to_string();
        }
        self.emit_decks();
    }

    pub fn delete_card(&mut self, card_id: Uuid, deck_id: Uuid) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        let before = deck.cards.len();
        deck.cards.retain(|c| c.id != card_id);
        if deck.cards.len() != before {
            self.emit_decks();
        }
    }

    /// Moves the cards at `from` (any order, duplicates ignored) so the
    /// block lands at offset `to` of the remaining sequence, preserving
    /// the relative order of the moved cards.
    ///
    /// Any out-of-range source index rejects the whole call; the
    /// destination offset is clamped.
    pub fn move_cards(&mut self, deck_id: Uuid, from: &[usize], to: usize) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        if from.is_empty() || from.iter().any(|&i| i >= deck.cards.len()) {
            return;
        }

        let mut sources = from.to_vec();
        sources.sort_unstable();
        sources.dedup();

        let mut moved = Vec::with_capacity(sources.len());
        for &i in sources.iter().rev() {
            moved.push(deck.cards.remove(i));
        }
        moved.reverse();

        let at = to.min(deck.cards.len());
        for (offset, card) in moved.into_iter().enumerate() {
            deck.cards.insert(at + offset, card);
        }
        self.emit_decks();
    }

    /// Randomizes the stored order of a deck's cards.
    pub fn shuffle_deck(&mut self, deck_id: Uuid) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        deck.cards.shuffle(&mut rand::thread_rng());
        self.emit_decks();
    }

    pub fn toggle_mark(&mut self, card_id: Uuid, deck_id: Uuid) {
        let Some(deck) = self.decks.iter_mut().find(|d| d.id == deck_id) else {
            return;
        };
        let Some(card) = deck.cards.iter_mut().find(|c| c.id == card_id) else {
            return;
        };
        card.is_marked = !card.is_marked;
        self.emit_decks();
    }

    // --- Quiz history ---

    /// Appends a result at the head of the history (newest first).
    /// Declines when the counters are inconsistent; the session engine
    /// guarantees `correct + wrong == total`.
    pub fn record_quiz_result(
        &mut self,
        deck_id: Uuid,
        correct: u32,
        wrong: u32,
        total: u32,
        elapsed_seconds: u64,
    ) {
        if correct + wrong != total {
            return;
        }
        self.history
            .insert(0, QuizResult::new(deck_id, correct, wrong, total, elapsed_seconds));
        self.emit_history();
    }

    // --- Change notification ---

    fn emit_decks(&self) {
        if let Some(events) = &self.events {
            // The worker may be gone during shutdown; mutations still apply.
            let _ = events.send(StoreEvent::DecksChanged(self.decks.clone()));
        }
    }

    fn emit_history(&self) {
        if let Some(events) = &self.events {
            let _ = events.send(StoreEvent::HistoryChanged(self.history.clone()));
        }
    }
}
