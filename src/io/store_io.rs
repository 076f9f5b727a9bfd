use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::workspace::Workspace;

/// Error type for workspace store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize workspace: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Get the store directory, respecting XDG_CONFIG_HOME
pub fn store_dir() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("canopy")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn workspace_path(store_dir: &Path) -> PathBuf {
    store_dir.join("workspace.json")
}

/// Directory holding local model definitions that shadow remote ones
pub fn models_dir(store_dir: &Path) -> PathBuf {
    store_dir.join("models")
}

/// Read the workspace from the store.
/// If the file doesn't exist, returns a default workspace.
/// If the file is corrupted, backs it up as .bak and returns a default.
pub fn read_workspace(store_dir: &Path) -> Workspace {
    let path = workspace_path(store_dir);
    if !path.exists() {
        return Workspace::default();
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<Workspace>(&content) {
            Ok(ws) => ws,
            Err(e) => {
                // Corrupted — back up and start fresh
                let bak = path.with_extension("json.bak");
                let _ = fs::copy(&path, &bak);
                eprintln!(
                    "warning: could not parse {} (backed up as {}): {}",
                    path.display(),
                    bak.display(),
                    e
                );
                Workspace::default()
            }
        },
        Err(_) => Workspace::default(),
    }
}

/// Write the workspace to the store, creating the directory if needed.
pub fn write_workspace(store_dir: &Path, ws: &Workspace) -> Result<(), StoreError> {
    fs::create_dir_all(store_dir)?;
    let path = workspace_path(store_dir);
    let content = serde_json::to_string_pretty(ws)?;
    atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path,
        source: e,
    })
}

/// Write via a temp file in the same directory, then rename into place,
/// so a concurrent reader never observes a half-written workspace.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a local model definition from `models/<name>.json`, if present
/// and parseable.
pub fn read_local_model(store_dir: &Path, name: &str) -> Option<serde_json::Value> {
    let path = models_dir(store_dir).join(format!("{name}.json"));
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}
