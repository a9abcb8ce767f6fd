use crate::error::{DeckzError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 300;

/// Settings stored next to the data files, in config.json. Missing keys
/// fall back to their defaults so older config files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeckzConfig {
    /// In free study mode, whether skipping a card tallies a wrong answer.
    #[serde(default)]
    pub study_skip_counts_wrong: bool,

    /// Quiet time before a changed collection is written to disk.
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,
}

fn default_autosave_debounce_ms() -> u64 {
    DEFAULT_AUTOSAVE_DEBOUNCE_MS
}

impl Default for DeckzConfig {
    fn default() -> Self {
        Self {
            study_skip_counts_wrong: false,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
        }
    }
}

impl DeckzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DeckzError::Io)?;
        let config: DeckzConfig =
            serde_json::from_str(&content).map_err(DeckzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DeckzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DeckzError::Serialization)?;
        fs::write(config_path, content).map_err(DeckzError::Io)?;
        Ok(())
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn skip_policy(&self) -> crate::session::SkipPolicy {
        if self.study_skip_counts_wrong {
            crate::session::SkipPolicy::CountAsWrong
        } else {
            crate::session::SkipPolicy::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SkipPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DeckzConfig::default();
        assert!(!config.study_skip_counts_wrong);
        assert_eq!(config.autosave_debounce_ms, 300);
        assert_eq!(config.skip_policy(), SkipPolicy::Neutral);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = DeckzConfig::load(temp_dir.path().join("absent")).unwrap();
        assert_eq!(config, DeckzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = DeckzConfig::default();
        config.study_skip_counts_wrong = true;
        config.autosave_debounce_ms = 50;
        config.save(temp_dir.path()).unwrap();

        let loaded = DeckzConfig::load(temp_dir.path()).unwrap();
        assert!(loaded.study_skip_counts_wrong);
        assert_eq!(loaded.autosave_debounce(), Duration::from_millis(50));
        assert_eq!(loaded.skip_policy(), SkipPolicy::CountAsWrong);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"studySkipCountsWrong": true}"#,
        )
        .unwrap();

        let loaded = DeckzConfig::load(temp_dir.path()).unwrap();
        assert!(loaded.study_skip_counts_wrong);
        assert_eq!(loaded.autosave_debounce_ms, 300);
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = serde_json::to_string(&DeckzConfig::default()).unwrap();
        assert!(json.contains("studySkipCountsWrong"));
        assert!(json.contains("autosaveDebounceMs"));
    }
}
