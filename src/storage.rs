/// Progress persistence through a flat key-value store.
///
/// The simulation only ever reads and writes a handful of numeric counters,
/// so the store interface is string keys to string values and nothing more.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::entities::{GameState, GameStatus};
use crate::error::Result;
use crate::levels::MAX_LEVEL;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    /// Make pending writes durable.
    fn flush(&mut self) -> Result<()>;
}

// ── In-memory store ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// ── JSON file store ───────────────────────────────────────────────────────────

/// A single JSON object on disk, rewritten on every flush.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(JsonFileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// `$HOME/.butterfly_brawl.json`, or the working directory without a HOME.
pub fn default_save_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".butterfly_brawl.json")
}

// ── Progress counters ─────────────────────────────────────────────────────────

pub const KEY_HIGH_SCORE: &str = "high_score";
pub const KEY_MAX_LEVEL: &str = "max_level";
pub const KEY_ENEMIES_DEFEATED: &str = "enemies_defeated";
pub const KEY_SURVIVAL_SECS: &str = "total_survival_time";
pub const KEY_BOSS_DEFEATS: &str = "boss_defeats";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub high_score: u32,
    pub max_level: u32,
    pub enemies_defeated: u32,
    pub total_survival_secs: u64,
    pub boss_defeats: u32,
}

fn read_counter<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: std::str::FromStr + Default,
{
    match store.get(key) {
        None => T::default(),
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "malformed progress counter, treating as 0");
            T::default()
        }),
    }
}

impl ProgressStats {
    /// Missing or malformed counters read as zero.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        ProgressStats {
            high_score: read_counter(store, KEY_HIGH_SCORE),
            max_level: read_counter(store, KEY_MAX_LEVEL),
            enemies_defeated: read_counter(store, KEY_ENEMIES_DEFEATED),
            total_survival_secs: read_counter(store, KEY_SURVIVAL_SECS),
            boss_defeats: read_counter(store, KEY_BOSS_DEFEATS),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(KEY_HIGH_SCORE, self.high_score.to_string());
        store.set(KEY_MAX_LEVEL, self.max_level.to_string());
        store.set(KEY_ENEMIES_DEFEATED, self.enemies_defeated.to_string());
        store.set(KEY_SURVIVAL_SECS, self.total_survival_secs.to_string());
        store.set(KEY_BOSS_DEFEATS, self.boss_defeats.to_string());
        store.flush()
    }

    /// Fold a finished (or abandoned) run into the lifetime counters.
    pub fn record_session(&mut self, state: &GameState) {
        // During the transition `level` already names the next, unplayed level.
        let reached = match state.status {
            GameStatus::GameComplete => MAX_LEVEL,
            GameStatus::LevelComplete => state.level.saturating_sub(1).max(1),
            _ => state.level,
        };
        self.high_score = self.high_score.max(state.score);
        self.max_level = self.max_level.max(reached);
        self.enemies_defeated = self.enemies_defeated.saturating_add(state.enemies_defeated);
        self.total_survival_secs = self
            .total_survival_secs
            .saturating_add((state.game_time / 1000.0) as u64);
        self.boss_defeats = self.boss_defeats.saturating_add(state.boss_defeats);
    }
}
