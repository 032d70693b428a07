//! Bookkeeping of the last successful sync, stored as JSON in the sync root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GistError;

pub const STATE_FILE: &str = ".gist-sync.json";

/// What both sides looked like right after a gist was last synced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncedGist {
    /// Remote `updated_at` after the sync.
    pub remote_updated: DateTime<Utc>,
    /// Newest local modification time after the sync.
    pub local_modified: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Keyed by gist id.
    #[serde(default)]
    pub gists: BTreeMap<String, SyncedGist>,
    /// Directory name -> gist id for uploads whose directory still has to be
    /// renamed to the new id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pending_renames: BTreeMap<String, String>,
}

impl SyncState {
    pub fn path(root: &Path) -> PathBuf {
        root.join(STATE_FILE)
    }

    /// Loads the state of `root`, or an empty state on first sync.
    pub fn load(root: &Path) -> Result<Self, GistError> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|e| GistError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|e| GistError::State {
            path,
            message: e.to_string(),
        })
    }

    pub fn save(&self, root: &Path) -> Result<(), GistError> {
        let path = Self::path(root);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| GistError::io(&path, e))
    }

    pub fn get(&self, id: &str) -> Option<&SyncedGist> {
        self.gists.get(id)
    }

    pub fn record(&mut self, id: &str, entry: SyncedGist) {
        self.gists.insert(id.to_string(), entry);
    }

    pub fn forget(&mut self, id: &str) {
        self.gists.remove(id);
    }

    /// Gist id a local directory was already uploaded as, if its rename is pending.
    pub fn pending_rename(&self, dir: &str) -> Option<&str> {
        self.pending_renames.get(dir).map(String::as_str)
    }

    /// True when `id` is waiting for a local directory to be renamed onto it.
    pub fn awaits_rename(&self, id: &str) -> bool {
        self.pending_renames.values().any(|pending| pending == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_state_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SyncState::load(dir.path()).unwrap(), SyncState::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SyncState::default();
        let at: DateTime<Utc> = "2025-11-06T12:00:00Z".parse().unwrap();
        state.record("abc", SyncedGist { remote_updated: at, local_modified: at });
        state.save(dir.path()).unwrap();

        let loaded = SyncState::load(dir.path()).unwrap();
        assert_eq!(loaded.get("abc"), Some(&SyncedGist { remote_updated: at, local_modified: at }));
        assert!(!fs::read_to_string(SyncState::path(dir.path())).unwrap().contains("pending_renames"));
    }

    #[test]
    fn test_pending_renames_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SyncState::default();
        state.pending_renames.insert("drafts".into(), "f00d".into());
        state.save(dir.path()).unwrap();

        let loaded = SyncState::load(dir.path()).unwrap();
        assert_eq!(loaded.pending_rename("drafts"), Some("f00d"));
        assert!(loaded.awaits_rename("f00d"));
        assert!(!loaded.awaits_rename("drafts"));
    }

    #[test]
    fn test_corrupt_state_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(SyncState::path(dir.path()), "{not json").unwrap();
        assert!(matches!(SyncState::load(dir.path()), Err(GistError::State { .. })));
    }
}
