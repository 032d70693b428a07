//! Two-way sync between a user's gists and a local directory tree.
//!
//! Layout: `<root>/<gist-id>/<filename>`. Changes are detected by comparing
//! timestamps with the values recorded at the last sync ([`SyncState`]).
//! When both sides changed, the newer one wins and ties go to local.
//!
//! Planning is pure; [`apply_plan`] performs the actions. Deletions only run
//! when the caller passes `confirm = true`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::client::GistApi;
use super::model::Gist;
use super::state::{SyncState, SyncedGist};
use crate::config::SyncConfig;
use crate::error::GistError;

/// A gist directory found under the sync root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalGist {
    /// Directory name: a gist id, or any name for a gist not yet uploaded.
    pub dir_name: String,
    /// Filename -> path.
    pub files: BTreeMap<String, PathBuf>,
    /// Newest mtime of the directory and its files.
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// New remote gist: create the local directory.
    Download { id: String },
    /// New local directory: create a gist from it.
    Upload { dir: String },
    /// Uploaded directory whose rename to the gist id failed last time.
    Rename { dir: String, id: String },
    /// Remote is newer: overwrite local files.
    Pull { id: String },
    /// Local is newer: send local files; `removed` are remote files gone locally.
    Push { id: String, removed: Vec<String> },
    /// Gist deleted on GitHub since the last sync.
    DeleteLocal { id: String },
    /// Directory deleted locally since the last sync.
    DeleteRemote { id: String },
}

impl SyncAction {
    pub fn is_destructive(&self) -> bool {
        matches!(self, SyncAction::DeleteLocal { .. } | SyncAction::DeleteRemote { .. })
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Download { id } => write!(f, "download  {}", id),
            SyncAction::Upload { dir } => write!(f, "upload    {}/", dir),
            SyncAction::Rename { dir, id } => write!(f, "rename    {}/ -> {}/", dir, id),
            SyncAction::Pull { id } => write!(f, "pull      {}", id),
            SyncAction::Push { id, removed } if removed.is_empty() => write!(f, "push      {}", id),
            SyncAction::Push { id, removed } => {
                write!(f, "push      {} (removing {})", id, removed.join(", "))
            }
            SyncAction::DeleteLocal { id } => write!(f, "delete    {}/ (local)", id),
            SyncAction::DeleteRemote { id } => write!(f, "delete    {} (remote)", id),
        }
    }
}

/// Outcome of [`apply_plan`].
#[derive(Debug, Default)]
pub struct SyncReport {
    pub applied: Vec<SyncAction>,
    /// Destructive actions left out for lack of confirmation.
    pub skipped: Vec<SyncAction>,
    pub failed: Vec<(SyncAction, String)>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn mtime(path: &Path) -> Result<DateTime<Utc>, GistError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| GistError::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Reads the gist directories under `root`. Hidden entries are ignored.
pub fn scan_local(root: &Path) -> Result<Vec<LocalGist>, GistError> {
    let mut gists: BTreeMap<String, LocalGist> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            GistError::io(path, e.into())
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let modified = mtime(entry.path())?;

        if entry.depth() == 1 {
            if entry.file_type().is_dir() {
                gists.insert(
                    name.clone(),
                    LocalGist {
                        dir_name: name,
                        files: BTreeMap::new(),
                        modified,
                    },
                );
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }
        let parent = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|p| p.to_string_lossy().into_owned());
        if let Some(gist) = parent.and_then(|p| gists.get_mut(&p)) {
            gist.modified = gist.modified.max(modified);
            gist.files.insert(name, entry.path().to_path_buf());
        }
    }

    Ok(gists.into_values().collect())
}

enum Direction {
    Push,
    Pull,
}

fn direction(local: DateTime<Utc>, remote: DateTime<Utc>, last: Option<&SyncedGist>) -> Option<Direction> {
    let newer = || {
        if local >= remote {
            Direction::Push
        } else {
            Direction::Pull
        }
    };
    let Some(last) = last else {
        return Some(newer());
    };
    match (local > last.local_modified, remote > last.remote_updated) {
        (false, false) => None,
        (true, false) => Some(Direction::Push),
        (false, true) => Some(Direction::Pull),
        (true, true) => Some(newer()),
    }
}

/// Works out what has to happen on each side. Remote gists come first
/// (by id), then local-only directories (by name).
pub fn plan(remote: &[Gist], local: &[LocalGist], state: &SyncState) -> Vec<SyncAction> {
    let local_by_name: BTreeMap<&str, &LocalGist> =
        local.iter().map(|l| (l.dir_name.as_str(), l)).collect();
    let remote_by_id: BTreeMap<&str, &Gist> = remote.iter().map(|g| (g.id.as_str(), g)).collect();
    let mut actions = Vec::new();

    for (&id, gist) in &remote_by_id {
        let last = state.get(id);
        let action = match (local_by_name.get(id), last) {
            // Its local copy is still under the old directory name.
            (None, _) if state.awaits_rename(id) => None,
            (None, None) => Some(SyncAction::Download { id: id.to_string() }),
            (None, Some(_)) => Some(SyncAction::DeleteRemote { id: id.to_string() }),
            (Some(dir), last) => match direction(dir.modified, gist.updated_at, last) {
                Some(Direction::Pull) => Some(SyncAction::Pull { id: id.to_string() }),
                Some(Direction::Push) => Some(SyncAction::Push {
                    id: id.to_string(),
                    removed: gist
                        .files
                        .keys()
                        .filter(|name| !dir.files.contains_key(*name))
                        .cloned()
                        .collect(),
                }),
                None => None,
            },
        };
        actions.extend(action);
    }

    for (&name, dir) in &local_by_name {
        if remote_by_id.contains_key(name) {
            continue;
        }
        if let Some(id) = state.pending_rename(name).filter(|id| remote_by_id.contains_key(id)) {
            actions.push(SyncAction::Rename {
                dir: name.to_string(),
                id: id.to_string(),
            });
        } else if state.get(name).is_some() {
            actions.push(SyncAction::DeleteLocal { id: name.to_string() });
        } else if dir.files.is_empty() {
            debug!(dir = name, "empty directory, nothing to upload");
        } else {
            actions.push(SyncAction::Upload { dir: name.to_string() });
        }
    }

    actions
}

/// Drops state for gists that exist on neither side, and pending renames
/// whose directory is gone.
pub fn prune_state(state: &mut SyncState, remote: &[Gist], local: &[LocalGist]) {
    let dirs: BTreeSet<&str> = local.iter().map(|l| l.dir_name.as_str()).collect();
    let live: BTreeSet<&str> = remote.iter().map(|g| g.id.as_str()).chain(dirs.iter().copied()).collect();
    state.gists.retain(|id, _| live.contains(id.as_str()));
    state.pending_renames.retain(|dir, _| dirs.contains(dir.as_str()));
}

fn check_file_name(dir: &Path, name: &str) -> Result<PathBuf, GistError> {
    if name.is_empty() || name.contains(|c| c == '/' || c == '\\') || name == "." || name == ".." {
        return Err(GistError::io(
            dir.join(name),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unsafe gist filename"),
        ));
    }
    Ok(dir.join(name))
}

fn read_files(dir: &Path) -> Result<BTreeMap<String, String>, GistError> {
    let mut contents = BTreeMap::new();
    for path in file_paths(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = fs::read_to_string(&path).map_err(|e| GistError::io(&path, e))?;
        contents.insert(name, text);
    }
    Ok(contents)
}

/// Makes `dir` mirror `gist`: writes every file and removes the rest.
fn write_gist(dir: &Path, gist: &Gist) -> Result<(), GistError> {
    fs::create_dir_all(dir).map_err(|e| GistError::io(dir, e))?;
    for (name, file) in &gist.files {
        let path = check_file_name(dir, name)?;
        let content = file.content.as_deref().unwrap_or_default();
        fs::write(&path, content).map_err(|e| GistError::io(&path, e))?;
    }
    let entries = fs::read_dir(dir).map_err(|e| GistError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| GistError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_hidden(&name) && entry.path().is_file() && !gist.files.contains_key(&name) {
            fs::remove_file(entry.path()).map_err(|e| GistError::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Newest mtime of `dir` and the files directly inside it.
fn local_modified(dir: &Path) -> Result<DateTime<Utc>, GistError> {
    let mut newest = mtime(dir)?;
    for path in file_paths(dir)? {
        newest = newest.max(mtime(&path)?);
    }
    Ok(newest)
}

/// Non-hidden regular files directly inside `dir`.
fn file_paths(dir: &Path) -> Result<Vec<PathBuf>, GistError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| GistError::io(dir, e))? {
        let entry = entry.map_err(|e| GistError::io(dir, e))?;
        if !is_hidden(&entry.file_name().to_string_lossy()) && entry.path().is_file() {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}

fn synced(gist: &Gist, dir: &Path) -> Result<SyncedGist, GistError> {
    Ok(SyncedGist {
        remote_updated: gist.updated_at,
        local_modified: local_modified(dir)?,
    })
}

/// Moves an uploaded directory onto its gist id and clears the pending entry.
fn rename_uploaded(root: &Path, name: &str, id: &str, state: &mut SyncState) -> Result<PathBuf, GistError> {
    let from = root.join(name);
    let to = root.join(id);
    fs::rename(&from, &to).map_err(|e| GistError::io(&from, e))?;
    state.pending_renames.remove(name);
    Ok(to)
}

fn apply_one(
    api: &dyn GistApi,
    config: &SyncConfig,
    action: &SyncAction,
    state: &mut SyncState,
) -> Result<(), GistError> {
    let root = &config.root;
    match action {
        SyncAction::Download { id } | SyncAction::Pull { id } => {
            let gist = api.get_gist(id)?;
            let dir = root.join(id);
            write_gist(&dir, &gist)?;
            state.record(id, synced(&gist, &dir)?);
        }
        SyncAction::Push { id, removed } => {
            let dir = root.join(id);
            let mut files: BTreeMap<String, Option<String>> =
                read_files(&dir)?.into_iter().map(|(k, v)| (k, Some(v))).collect();
            for name in removed {
                files.insert(name.clone(), None);
            }
            let gist = api.update_gist(id, &files)?;
            state.record(id, synced(&gist, &dir)?);
        }
        SyncAction::Upload { dir: name } => {
            let files = read_files(&root.join(name))?;
            let gist = api.create_gist(name, config.public, &files)?;
            // From here on the gist exists remotely; never upload `name` again.
            state.pending_renames.insert(name.clone(), gist.id.clone());
            let dir = rename_uploaded(root, name, &gist.id, state)?;
            state.record(&gist.id, synced(&gist, &dir)?);
        }
        SyncAction::Rename { dir: name, id } => {
            // No record: the next run compares both sides as a first sync.
            rename_uploaded(root, name, id, state)?;
        }
        SyncAction::DeleteLocal { id } => {
            let dir = root.join(id);
            fs::remove_dir_all(&dir).map_err(|e| GistError::io(&dir, e))?;
            state.forget(id);
        }
        SyncAction::DeleteRemote { id } => {
            api.delete_gist(id)?;
            state.forget(id);
        }
    }
    Ok(())
}

/// Runs `actions` in order. Failures are collected, not fatal; `state` is
/// updated for every action that succeeded.
pub fn apply_plan(
    api: &dyn GistApi,
    config: &SyncConfig,
    actions: &[SyncAction],
    state: &mut SyncState,
    confirm: bool,
) -> SyncReport {
    let mut report = SyncReport::default();
    for action in actions {
        if action.is_destructive() && !confirm {
            info!(%action, "deletion not confirmed, skipping");
            report.skipped.push(action.clone());
            continue;
        }
        match apply_one(api, config, action, state) {
            Ok(()) => {
                info!(%action, "applied");
                report.applied.push(action.clone());
            }
            Err(e) => {
                warn!(%action, error = %e, "sync action failed");
                report.failed.push((action.clone(), e.to_string()));
            }
        }
    }
    report
}
