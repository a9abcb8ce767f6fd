use crate::config::DeckzConfig;
use crate::persist::{self, autosave::Autosave};
use crate::store::Store;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Everything a running app needs: the loaded store wired to its
/// autosave worker, plus the settings and the directory they came from.
pub struct AppContext {
    pub store: Store,
    pub config: DeckzConfig,
    pub data_dir: PathBuf,
    autosave: Autosave,
}

/// Resolve the data directory: an explicit override wins, otherwise the
/// platform data dir (e.g. `~/.local/share/deckz` on Linux).
pub fn data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    ProjectDirs::from("com", "deckz", "deckz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".deckz"))
}

pub fn initialize(override_dir: Option<PathBuf>) -> AppContext {
    let dir = data_dir(override_dir);
    let config = DeckzConfig::load(&dir).unwrap_or_default();

    let decks = persist::load_decks(&dir);
    let history = persist::load_history(&dir);

    let autosave = Autosave::spawn(dir.clone(), config.autosave_debounce());
    let store = Store::new(decks, history).with_events(autosave.sender());

    AppContext {
        store,
        config,
        data_dir: dir,
        autosave,
    }
}

impl AppContext {
    /// Flushes pending writes and stops the autosave worker. Call this
    /// before process exit; otherwise the last debounce window of
    /// changes may never reach disk.
    pub fn shutdown(self) {
        // The store holds the only other sender clone; dropping it lets
        // the worker see the disconnect and flush.
        drop(self.store);
        self.autosave.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::DECKS_FILE;
    use tempfile::TempDir;

    #[test]
    fn initialize_seeds_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let ctx = initialize(Some(dir.path().to_path_buf()));
        assert_eq!(ctx.store.decks().len(), 2);
        assert_eq!(ctx.data_dir, dir.path());
        ctx.shutdown();
        assert!(dir.path().join(DECKS_FILE).exists());
    }

    #[test]
    fn shutdown_persists_unflushed_mutations() {
        let dir = TempDir::new().unwrap();

        let mut ctx = initialize(Some(dir.path().to_path_buf()));
        let id = ctx.store.add_deck("Written At Exit");
        assert!(ctx.store.deck(id).is_some());
        ctx.shutdown();

        let ctx = initialize(Some(dir.path().to_path_buf()));
        assert!(ctx.store.decks().iter().any(|d| d.title == "Written At Exit"));
        ctx.shutdown();
    }

    #[test]
    fn override_dir_beats_platform_dir() {
        let explicit = PathBuf::from("/tmp/somewhere-else");
        assert_eq!(data_dir(Some(explicit.clone())), explicit);
    }
}
