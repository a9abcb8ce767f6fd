//! Debounced background persistence.
//!
//! The store emits a snapshot event after every successful mutation; this
//! worker drains those events on its own thread and writes each tracked
//! collection at most once per burst. A burst ends when no new snapshot
//! for that collection arrives within the debounce window. Writes are
//! fire-and-forget from the store's point of view: failures are logged
//! and the in-memory state stays authoritative.
//!
//! Decks and quiz history debounce independently, matching their
//! independent files on disk.

use crate::model::{Deck, QuizResult};
use crate::persist;
use crate::store::StoreEvent;
use log::warn;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub struct Autosave {
    tx: Sender<StoreEvent>,
    worker: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Spawns the writer thread. Snapshots sent to [`Autosave::sender`]
    /// are written to `dir` after `debounce` of quiet time.
    pub fn spawn(dir: PathBuf, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || run(&dir, debounce, &rx));
        Self {
            tx,
            worker: Some(worker),
        }
    }

    /// Channel endpoint to hand to [`crate::store::Store::with_events`].
    pub fn sender(&self) -> Sender<StoreEvent> {
        self.tx.clone()
    }

    /// Flushes pending snapshots and stops the worker. The caller must
    /// drop every other sender clone (i.e. the store) first, or this
    /// will wait forever.
    pub fn shutdown(mut self) {
        // Dropping self drops our sender; once the store's clone is gone
        // too, the worker sees the disconnect, flushes and exits.
        let worker = self.worker.take();
        drop(self);
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        // tx drops here; a still-running worker sees the disconnect and
        // flushes on its own even without an explicit shutdown().
    }
}

struct PendingWrite<T> {
    snapshot: Option<T>,
    due: Option<Instant>,
}

impl<T> PendingWrite<T> {
    fn new() -> Self {
        Self {
            snapshot: None,
            due: None,
        }
    }

    fn replace(&mut self, snapshot: T, debounce: Duration) {
        self.snapshot = Some(snapshot);
        self.due = Some(Instant::now() + debounce);
    }

    fn take_if_due(&mut self, now: Instant) -> Option<T> {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                self.snapshot.take()
            }
            _ => None,
        }
    }
}

fn run(dir: &PathBuf, debounce: Duration, rx: &Receiver<StoreEvent>) {
    let mut decks: PendingWrite<Vec<Deck>> = PendingWrite::new();
    let mut history: PendingWrite<Vec<QuizResult>> = PendingWrite::new();

    loop {
        let next_due = [decks.due, history.due].into_iter().flatten().min();

        let event = match next_due {
            Some(due) => {
                let now = Instant::now();
                if now >= due {
                    flush_due(dir, &mut decks, &mut history, now);
                    continue;
                }
                match rx.recv_timeout(due - now) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };

        match event {
            Some(StoreEvent::DecksChanged(snapshot)) => decks.replace(snapshot, debounce),
            Some(StoreEvent::HistoryChanged(snapshot)) => history.replace(snapshot, debounce),
            None => flush_due(dir, &mut decks, &mut history, Instant::now()),
        }
    }

    // Channel disconnected: write whatever is still pending so a
    // short-lived process never loses its final state.
    if let Some(snapshot) = decks.snapshot.take() {
        write_decks(dir, &snapshot);
    }
    if let Some(snapshot) = history.snapshot.take() {
        write_history(dir, &snapshot);
    }
}

fn flush_due(
    dir: &PathBuf,
    decks: &mut PendingWrite<Vec<Deck>>,
    history: &mut PendingWrite<Vec<QuizResult>>,
    now: Instant,
) {
    if let Some(snapshot) = decks.take_if_due(now) {
        write_decks(dir, &snapshot);
    }
    if let Some(snapshot) = history.take_if_due(now) {
        write_history(dir, &snapshot);
    }
}

fn write_decks(dir: &PathBuf, snapshot: &[Deck]) {
    if let Err(e) = persist::save_decks(dir, snapshot) {
        warn!("deck autosave failed: {e}");
    }
}

fn write_history(dir: &PathBuf, snapshot: &[QuizResult]) {
    if let Err(e) = persist::save_history(dir, snapshot) {
        warn!("quiz history autosave failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Deck};
    use crate::persist::{DECKS_FILE, HISTORY_FILE};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn one_deck(title: &str) -> Vec<Deck> {
        let mut deck = Deck::new(title.into());
        deck.cards.push(Card::new("f".into(), "b".into(), deck.id));
        vec![deck]
    }

    #[test]
    fn shutdown_flushes_pending_writes() {
        let dir = TempDir::new().unwrap();
        let autosave = Autosave::spawn(dir.path().to_path_buf(), Duration::from_secs(60));
        let tx = autosave.sender();

        tx.send(StoreEvent::DecksChanged(one_deck("Flushed"))).unwrap();
        tx.send(StoreEvent::HistoryChanged(vec![QuizResult::new(
            Uuid::new_v4(),
            1,
            0,
            1,
            3,
        )]))
        .unwrap();

        drop(tx);
        autosave.shutdown();

        assert!(dir.path().join(DECKS_FILE).exists());
        assert!(dir.path().join(HISTORY_FILE).exists());
        let decks = persist::load_decks(dir.path());
        assert_eq!(decks[0].title, "Flushed");
    }

    #[test]
    fn burst_coalesces_into_final_snapshot() {
        let dir = TempDir::new().unwrap();
        let autosave = Autosave::spawn(dir.path().to_path_buf(), Duration::from_millis(20));
        let tx = autosave.sender();

        for i in 0..10 {
            tx.send(StoreEvent::DecksChanged(one_deck(&format!("Rev {i}"))))
                .unwrap();
        }

        // Wait out the debounce window, then confirm only the last
        // snapshot is on disk.
        thread::sleep(Duration::from_millis(200));
        let decks = persist::load_decks(dir.path());
        assert_eq!(decks[0].title, "Rev 9");

        drop(tx);
        autosave.shutdown();
    }

    #[test]
    fn write_failure_does_not_kill_the_worker() {
        let dir = TempDir::new().unwrap();
        // Point at a path whose parent is a file: every write fails.
        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, "x").unwrap();

        let autosave = Autosave::spawn(blocked.join("sub"), Duration::from_millis(5));
        let tx = autosave.sender();
        tx.send(StoreEvent::DecksChanged(one_deck("Doomed"))).unwrap();
        thread::sleep(Duration::from_millis(50));

        // Worker is still alive and accepts further events.
        tx.send(StoreEvent::DecksChanged(one_deck("Also doomed")))
            .unwrap();
        drop(tx);
        autosave.shutdown();
    }
}
