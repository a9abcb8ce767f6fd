//! # Persistence
//!
//! Two independent JSON documents in the data directory:
//!
//! ```text
//! <data dir>/
//! ├── decks.json          # Ordered decks, each with its nested cards
//! ├── quiz_history.json   # Quiz results, newest first
//! └── config.json         # Settings (see config.rs)
//! ```
//!
//! Writes are atomic (temp file + rename) so a crash mid-write never
//! leaves a truncated document behind. Loading is fail-soft: an absent,
//! empty or undecodable decks file falls back to the built-in sample
//! dataset (written back immediately so later launches are stable), and a
//! bad history file yields an empty history. Decode problems go to the
//! log, never to the caller.

use crate::error::Result;
use crate::model::{Deck, QuizResult};
use log::warn;
use std::fs;
use std::path::Path;

pub mod autosave;
pub mod seed;

pub const DECKS_FILE: &str = "decks.json";
pub const HISTORY_FILE: &str = "quiz_history.json";

/// Loads the deck collection, seeding (and writing the seed) when the
/// file is absent, empty or unreadable.
pub fn load_decks(dir: &Path) -> Vec<Deck> {
    let path = dir.join(DECKS_FILE);
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<Deck>>(&content) {
                Ok(decks) if !decks.is_empty() => return decks,
                Ok(_) => {}
                Err(e) => warn!("decks file undecodable, falling back to sample data: {e}"),
            },
            Err(e) => warn!("decks file unreadable, falling back to sample data: {e}"),
        }
    }

    let decks = seed::sample_decks();
    if let Err(e) = save_decks(dir, &decks) {
        warn!("could not write seed decks: {e}");
    }
    decks
}

/// Loads the quiz history. Absent or undecodable files yield an empty
/// history; there is no seeding.
pub fn load_history(dir: &Path) -> Vec<QuizResult> {
    let path = dir.join(HISTORY_FILE);
    if !path.exists() {
        return Vec::new();
    }
    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(history) => history,
            Err(e) => {
                warn!("quiz history undecodable, starting empty: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            warn!("quiz history unreadable, starting empty: {e}");
            Vec::new()
        }
    }
}

pub fn save_decks(dir: &Path, decks: &[Deck]) -> Result<()> {
    let content = serde_json::to_string_pretty(decks)?;
    write_atomic(&dir.join(DECKS_FILE), &content)
}

pub fn save_history(dir: &Path, history: &[QuizResult]) -> Result<()> {
    let content = serde_json::to_string_pretty(history)?;
    write_atomic(&dir.join(HISTORY_FILE), &content)
}

/// Write-then-rename so readers only ever see a complete document.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Card;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn populated_decks() -> Vec<Deck> {
        let mut deck = Deck::new("Round Trip".into());
        deck.cards
            .push(Card::new("front".into(), "back".into(), deck.id));
        let mut marked = Card::new("f2".into(), "b2".into(), deck.id);
        marked.is_marked = true;
        deck.cards.push(marked);
        vec![deck]
    }

    #[test]
    fn decks_round_trip() {
        let dir = TempDir::new().unwrap();
        let decks = populated_decks();
        save_decks(dir.path(), &decks).unwrap();

        let loaded = load_decks(dir.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, decks[0].id);
        assert_eq!(loaded[0].title, "Round Trip");
        assert_eq!(loaded[0].cards.len(), 2);
        assert_eq!(loaded[0].cards[0].front_text, "front");
        assert!(!loaded[0].cards[0].is_marked);
        assert!(loaded[0].cards[1].is_marked);
    }

    #[test]
    fn absent_decks_file_seeds_and_writes() {
        let dir = TempDir::new().unwrap();
        let decks = load_decks(dir.path());
        assert_eq!(decks.len(), 2);
        assert!(dir.path().join(DECKS_FILE).exists());

        // Second load reads the same seed back, ids included.
        let again = load_decks(dir.path());
        assert_eq!(again[0].id, decks[0].id);
    }

    #[test]
    fn empty_decks_file_seeds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DECKS_FILE), "[]").unwrap();
        let decks = load_decks(dir.path());
        assert_eq!(decks.len(), 2);
    }

    #[test]
    fn corrupt_decks_file_seeds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DECKS_FILE), "{not json").unwrap();
        let decks = load_decks(dir.path());
        assert_eq!(decks.len(), 2);
    }

    #[test]
    fn legacy_cards_without_is_marked_load_as_unmarked() {
        let dir = TempDir::new().unwrap();
        let deck_id = Uuid::new_v4();
        let card_id = Uuid::new_v4();
        let json = format!(
            r#"[{{"id":"{deck_id}","title":"Old Format","cards":[
                {{"id":"{card_id}","frontText":"a","backText":"b","deckId":"{deck_id}"}}
            ]}}]"#
        );
        fs::write(dir.path().join(DECKS_FILE), json).unwrap();

        let decks = load_decks(dir.path());
        assert_eq!(decks[0].title, "Old Format");
        assert!(!decks[0].cards[0].is_marked);
    }

    #[test]
    fn history_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let deck_id = Uuid::new_v4();
        let history = vec![
            QuizResult::new(deck_id, 9, 1, 10, 80),
            QuizResult::new(deck_id, 5, 5, 10, 120),
        ];
        save_history(dir.path(), &history).unwrap();

        let loaded = load_history(dir.path());
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, history[0].id);
        assert_eq!(loaded[0].correct, 9);
        assert_eq!(loaded[1].elapsed_seconds, 120);
    }

    #[test]
    fn absent_history_is_empty_and_not_seeded() {
        let dir = TempDir::new().unwrap();
        assert!(load_history(dir.path()).is_empty());
        assert!(!dir.path().join(HISTORY_FILE).exists());
    }

    #[test]
    fn corrupt_history_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "oops").unwrap();
        assert!(load_history(dir.path()).is_empty());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        save_decks(dir.path(), &populated_decks()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
