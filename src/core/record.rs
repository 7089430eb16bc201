use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::config::ResolveConfig;
use crate::core::parallel::{run_indexed, CancelFlag};
use crate::core::report::Batch;
use crate::error::{LhrError, Result};

/// File describing one tracked resource inside its history subdirectory
pub const INDEX_FILE: &str = "entries.json";

/// One stored snapshot of a resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    pub timestamp: i64,
}

/// A tracked file and every snapshot kept for it, in stored order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub resource: String,
    pub entries: Vec<VersionEntry>,
    pub storage_dir: PathBuf,
}

#[derive(Deserialize)]
struct SnapshotIndex {
    resource: String,
    entries: Vec<VersionEntry>,
}

impl SnapshotRecord {
    /// Read `entries.json` from one history subdirectory
    pub fn load(storage_dir: &Path) -> Result<Self> {
        let parse_error = |reason: String| LhrError::Parse {
            dir: storage_dir.to_path_buf(),
            reason,
        };

        let index_path = storage_dir.join(INDEX_FILE);
        let content = fs::read_to_string(&index_path)
            .map_err(|e| parse_error(format!("cannot read {}: {}", INDEX_FILE, e)))?;
        let index: SnapshotIndex = serde_json::from_str(&content)
            .map_err(|e| parse_error(format!("invalid {}: {}", INDEX_FILE, e)))?;

        if index.entries.is_empty() {
            return Err(parse_error("no version entries".to_string()));
        }

        Ok(Self {
            resource: index.resource,
            entries: index.entries,
            storage_dir: storage_dir.to_path_buf(),
        })
    }
}

/// Immediate subdirectories of the history root, sorted by name
pub fn history_dirs(history_root: &Path) -> Result<Vec<PathBuf>> {
    let access_error = |e: std::io::Error| LhrError::Access {
        path: history_root.to_path_buf(),
        role: "history root".to_string(),
        reason: e.to_string(),
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(history_root).map_err(access_error)? {
        let entry = entry.map_err(access_error)?;
        match entry.file_type() {
            Ok(ty) if ty.is_dir() => dirs.push(entry.path()),
            Ok(_) => debug!("ignoring non-directory {}", entry.path().display()),
            Err(e) => warn!("cannot stat {}: {}", entry.path().display(), e),
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Load every snapshot record under the history root.
///
/// Subdirectories are read in parallel; a malformed one becomes an error in
/// the batch without stopping the others.
pub fn load_records(config: &ResolveConfig, cancel: &CancelFlag) -> Result<Batch<SnapshotRecord>> {
    let dirs = history_dirs(&config.history_root)?;
    debug!(
        "loading {} history directories with {} workers",
        dirs.len(),
        config.jobs
    );

    let loaded = run_indexed(&dirs, config.jobs, cancel, |dir| SnapshotRecord::load(dir));

    let batch = dirs
        .iter()
        .zip(loaded)
        .filter_map(|(dir, outcome)| {
            if outcome.is_none() {
                debug!("load of {} cancelled", dir.display());
            }
            outcome
        })
        .inspect(|outcome| {
            if let Err(e) = outcome {
                warn!("{}", e);
            }
        })
        .collect();
    Ok(batch)
}
