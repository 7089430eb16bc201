use std::path::{Component, Path, PathBuf};

use chrono::{TimeZone, Utc};
use log::debug;

use crate::core::record::{SnapshotRecord, VersionEntry};
use crate::error::{LhrError, Result};

/// The newest snapshot chosen for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVersion {
    pub resource: String,
    pub source_path: PathBuf,
    pub timestamp: i64,
}

/// Entry with the greatest timestamp; ties go to the earliest stored entry.
pub fn latest_entry(entries: &[VersionEntry]) -> Option<&VersionEntry> {
    entries.iter().fold(None, |best: Option<&VersionEntry>, entry| match best {
        Some(current) if current.timestamp >= entry.timestamp => Some(current),
        _ => Some(entry),
    })
}

/// Pick the newest version of a record and locate its stored content
pub fn select_latest(record: &SnapshotRecord) -> Result<SelectedVersion> {
    let entry = latest_entry(&record.entries).ok_or_else(|| LhrError::Parse {
        dir: record.storage_dir.clone(),
        reason: "no version entries".to_string(),
    })?;

    if !is_plain_file_name(&entry.id) {
        return Err(LhrError::Parse {
            dir: record.storage_dir.clone(),
            reason: format!("entry id '{}' is not a plain file name", entry.id),
        });
    }

    debug!(
        "{}: using {} from {}",
        record.resource,
        entry.id,
        format_timestamp(entry.timestamp)
    );

    Ok(SelectedVersion {
        resource: record.resource.clone(),
        source_path: record.storage_dir.join(&entry.id),
        timestamp: entry.timestamp,
    })
}

fn is_plain_file_name(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == id
    )
}

/// Millisecond timestamp as a UTC date for log output
pub fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{}ms", millis))
}
