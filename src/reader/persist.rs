//! Session persistence: only read-state and settings outlive a session.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{PagespotError, PagespotResult},
    reader::state::{FeatureFlags, ReadState, ReaderSettings, ReaderState},
};

/// Key the session record is stored under.
pub const STORAGE_KEY: &str = "reader-store";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// The persisted subset of [`ReaderState`].
pub struct PersistedSession {
    /// Hotspots the reader has visited.
    #[serde(default)]
    pub read_state: ReadState,
    /// User preferences.
    #[serde(default)]
    pub settings: ReaderSettings,
}

impl PersistedSession {
    /// Persisted subset of `state`.
    pub fn from_state(state: &ReaderState) -> Self {
        Self {
            read_state: state.read_state.clone(),
            settings: state.settings,
        }
    }

    /// Rebuild a reader state. Playback, zoom and flags always start from defaults.
    pub fn restore(self, flags: FeatureFlags) -> ReaderState {
        ReaderState {
            read_state: self
                .read_state
                .into_iter()
                .filter(|(_, read)| *read)
                .collect(),
            settings: self.settings,
            ..ReaderState::with_flags(flags)
        }
    }
}

/// Storage backend for [`PersistedSession`] records.
pub trait SessionStore {
    /// Read the stored record; `None` when nothing was saved yet.
    fn load(&mut self) -> PagespotResult<Option<PersistedSession>>;
    /// Replace the stored record.
    fn save(&mut self, session: &PersistedSession) -> PagespotResult<()>;
}

/// In-process store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<PersistedSession>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `session`.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Current stored record, if any.
    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SessionStore for MemoryStore {
    fn load(&mut self) -> PagespotResult<Option<PersistedSession>> {
        let guard = self
            .slot
            .lock()
            .map_err(|_| PagespotError::storage("memory store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&mut self, session: &PersistedSession) -> PagespotResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| PagespotError::storage("memory store lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }
}

/// JSON file on disk, written via a temporary sibling and rename.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/reader-store.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&mut self) -> PagespotResult<Option<PersistedSession>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PagespotError::storage(format!(
                    "read session '{}': {e}",
                    self.path.display()
                )));
            }
        };
        let session = serde_json::from_slice(&bytes).map_err(|e| {
            PagespotError::serde(format!("parse session '{}': {e}", self.path.display()))
        })?;
        Ok(Some(session))
    }

    fn save(&mut self, session: &PersistedSession) -> PagespotResult<()> {
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| PagespotError::serde(format!("encode session: {e}")))?;
        write_atomically(&self.path, &json)
            .map_err(|e| PagespotError::storage(format!("{e:#}")))
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create session dir '{}'", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("replace session '{}'", path.display()))?;
    Ok(())
}

/// Load a session, falling back to defaults when the store is empty or unreadable.
pub fn restore_state(store: &mut dyn SessionStore, flags: FeatureFlags) -> ReaderState {
    match store.load() {
        Ok(Some(session)) => session.restore(flags),
        Ok(None) => ReaderState::with_flags(flags),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable session record");
            ReaderState::with_flags(flags)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/persist.rs"]
mod tests;
