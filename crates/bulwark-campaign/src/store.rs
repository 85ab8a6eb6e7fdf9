//! Persistence gateway for meta progression.
//!
//! The engine loads once at construction and on reset, and saves after
//! every coin-affecting command. Failures are the caller's to log; the
//! engine never retries.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::progress::MetaProgress;

/// Load/save contract for [`MetaProgress`].
pub trait ProgressStore {
    fn load(&self) -> Result<MetaProgress>;
    fn save(&mut self, progress: &MetaProgress) -> Result<()>;
}

/// Stores progress as a pretty-printed JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    file_name: String,
}

impl JsonFileStore {
    pub const DEFAULT_FILE: &'static str = "progress.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: Self::DEFAULT_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl ProgressStore for JsonFileStore {
    /// A missing file is a fresh profile, not an error.
    fn load(&self) -> Result<MetaProgress> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no progress file");
            return Ok(MetaProgress::default());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn save(&mut self, progress: &MetaProgress) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(progress).context("failed to serialize progress")?;
        let path = self.path();
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), coins = progress.coins, "progress saved");
        Ok(())
    }
}

/// In-process store. Clones share the same slot, so a test can keep a
/// handle and inspect what the engine saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<MetaProgress>>>,
    saves: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: MetaProgress) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(progress))),
            saves: Arc::default(),
        }
    }

    /// Last saved (or seeded) progress.
    pub fn stored(&self) -> Option<MetaProgress> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> u32 {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<MetaProgress> {
        let slot = self.slot.lock().map_err(|_| anyhow!("progress slot poisoned"))?;
        Ok(slot.clone().unwrap_or_default())
    }

    fn save(&mut self, progress: &MetaProgress) -> Result<()> {
        *self.slot.lock().map_err(|_| anyhow!("progress slot poisoned"))? = Some(progress.clone());
        *self.saves.lock().map_err(|_| anyhow!("save counter poisoned"))? += 1;
        Ok(())
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn load(&self) -> Result<MetaProgress> {
        (**self).load()
    }

    fn save(&mut self, progress: &MetaProgress) -> Result<()> {
        (**self).save(progress)
    }
}
