//! In-session state machines for the two study modes.
//!
//! Both run over an order-frozen snapshot of a deck's cards taken at
//! session start; edits made to the store mid-session do not affect a
//! running session. Neither session persists anything itself: a finished
//! [`QuizSession`] yields a [`QuizOutcome`] and the caller decides whether
//! to record it through the store.

use crate::model::Card;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Wrong,
}

/// What a finished quiz hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    pub elapsed_seconds: u64,
}

/// A scored, non-repeating, single pass over a card snapshot.
///
/// `AwaitingAnswer(index)` advances by one on each answer until the index
/// reaches the snapshot length, which is the terminal `Finished` state.
/// An empty snapshot never constructs a session (`new` returns `None`), so
/// a 0/0 result can never be produced.
pub struct QuizSession {
    cards: Vec<Card>,
    index: usize,
    correct: u32,
    wrong: u32,
    started: Instant,
}

impl QuizSession {
    /// Starts a session over the snapshot. `None` when the snapshot is
    /// empty; the caller shows a "no cards" state instead.
    pub fn new(cards: Vec<Card>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            cards,
            index: 0,
            correct: 0,
            wrong: 0,
            started: Instant::now(),
        })
    }

    /// The card awaiting an answer, or `None` once finished.
    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.index)
    }

    /// Scores the current card and advances. No-op once finished.
    pub fn answer(&mut self, answer: Answer) {
        if self.is_finished() {
            return;
        }
        match answer {
            Answer::Correct => self.correct += 1,
            Answer::Wrong => self.wrong += 1,
        }
        self.index += 1;
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.cards.len()
    }

    pub fn answered(&self) -> u32 {
        self.correct + self.wrong
    }

    pub fn total(&self) -> u32 {
        self.cards.len() as u32
    }

    /// Wall-clock seconds since session start, rounded down.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// The session's result, available only in the terminal state.
    /// Quitting early yields nothing; progress is discarded.
    pub fn outcome(&self) -> Option<QuizOutcome> {
        if !self.is_finished() {
            return None;
        }
        Some(QuizOutcome {
            correct: self.correct,
            wrong: self.wrong,
            total: self.total(),
            elapsed_seconds: self.elapsed_seconds(),
        })
    }
}

/// Whether "skip" in free-study mode counts against the wrong tally.
/// Both behaviors shipped at different points, so it stays configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    CountAsWrong,
    #[default]
    Neutral,
}

/// Unscored wraparound review: after the last card it returns to the
/// first. Tracks right/wrong tallies for in-session display only; it has
/// no terminal state and never produces a [`QuizOutcome`].
pub struct StudySession {
    cards: Vec<Card>,
    index: usize,
    right: u32,
    wrong: u32,
    attempted: u32,
    skip_policy: SkipPolicy,
}

impl StudySession {
    pub fn new(cards: Vec<Card>, skip_policy: SkipPolicy) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            cards,
            index: 0,
            right: 0,
            wrong: 0,
            attempted: 0,
            skip_policy,
        })
    }

    pub fn current_card(&self) -> &Card {
        &self.cards[self.index]
    }

    pub fn mark_correct(&mut self) {
        self.right += 1;
        self.attempted += 1;
        self.advance();
    }

    pub fn mark_wrong(&mut self) {
        self.wrong += 1;
        self.attempted += 1;
        self.advance();
    }

    /// Moves on without an answer. Under `CountAsWrong` this tallies a
    /// wrong answer, matching the earlier product behavior.
    pub fn skip(&mut self) {
        if self.skip_policy == SkipPolicy::CountAsWrong {
            self.wrong += 1;
            self.attempted += 1;
        }
        self.advance();
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.cards.len();
    }

    pub fn tallies(&self) -> (u32, u32) {
        (self.right, self.wrong)
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn snapshot(n: usize) -> Vec<Card> {
        let deck_id = Uuid::new_v4();
        (0..n)
            .map(|i| Card::new(format!("front {i}"), format!("back {i}"), deck_id))
            .collect()
    }

    #[test]
    fn quiz_refuses_empty_snapshot() {
        assert!(QuizSession::new(Vec::new()).is_none());
    }

    #[test]
    fn quiz_walks_snapshot_once_and_finishes() {
        let mut s = QuizSession::new(snapshot(3)).unwrap();
        assert_eq!(s.current_card().unwrap().front_text, "front 0");
        assert!(s.outcome().is_none());

        s.answer(Answer::Correct);
        s.answer(Answer::Wrong);
        assert_eq!(s.current_card().unwrap().front_text, "front 2");
        assert!(!s.is_finished());

        s.answer(Answer::Correct);
        assert!(s.is_finished());
        assert!(s.current_card().is_none());

        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.wrong, 1);
        assert_eq!(outcome.total, 3);
    }

    #[test]
    fn quiz_total_is_snapshot_length_and_counters_sum_to_it() {
        let mut s = QuizSession::new(snapshot(4)).unwrap();
        for _ in 0..4 {
            s.answer(Answer::Wrong);
        }
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.correct + outcome.wrong, outcome.total);
        assert_eq!(outcome.total, 4);
    }

    #[test]
    fn quiz_answers_after_finish_are_ignored() {
        let mut s = QuizSession::new(snapshot(1)).unwrap();
        s.answer(Answer::Correct);
        s.answer(Answer::Correct);
        s.answer(Answer::Wrong);

        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.wrong, 0);
    }

    #[test]
    fn quiz_unfinished_session_has_no_outcome() {
        let mut s = QuizSession::new(snapshot(2)).unwrap();
        s.answer(Answer::Correct);
        assert!(s.outcome().is_none());
    }

    #[test]
    fn study_refuses_empty_snapshot() {
        assert!(StudySession::new(Vec::new(), SkipPolicy::Neutral).is_none());
    }

    #[test]
    fn study_wraps_around() {
        let mut s = StudySession::new(snapshot(2), SkipPolicy::Neutral).unwrap();
        assert_eq!(s.current_card().front_text, "front 0");
        s.mark_correct();
        assert_eq!(s.current_card().front_text, "front 1");
        s.mark_wrong();
        // Back to the first card: no terminal state.
        assert_eq!(s.current_card().front_text, "front 0");
        assert_eq!(s.tallies(), (1, 1));
        assert_eq!(s.attempted(), 2);
    }

    #[test]
    fn study_skip_neutral_leaves_tallies_alone() {
        let mut s = StudySession::new(snapshot(2), SkipPolicy::Neutral).unwrap();
        s.skip();
        assert_eq!(s.tallies(), (0, 0));
        assert_eq!(s.attempted(), 0);
        assert_eq!(s.current_card().front_text, "front 1");
    }

    #[test]
    fn study_skip_can_count_as_wrong() {
        let mut s = StudySession::new(snapshot(2), SkipPolicy::CountAsWrong).unwrap();
        s.skip();
        assert_eq!(s.tallies(), (0, 1));
        assert_eq!(s.attempted(), 1);
    }
}
