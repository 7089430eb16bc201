use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

use crate::config::ResolveConfig;
use crate::core::record::SnapshotRecord;
use crate::error::{LhrError, Result};

/// A record whose resource lies under the scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub record: SnapshotRecord,
    /// Decoded filesystem path of the resource
    pub path: PathBuf,
}

/// Outcome of matching a single record
#[derive(Debug)]
pub enum MatchOutcome {
    Matched(MatchedRecord),
    Unmatched(SnapshotRecord),
    Rejected(LhrError),
}

/// Local filesystem path named by a `file:` URI.
///
/// Returns `Ok(None)` for other schemes, for URIs naming a remote host and
/// for strings that are not absolute URIs at all.
pub fn resource_path(resource: &str) -> Result<Option<PathBuf>> {
    let mapping_error = |reason: String| LhrError::Mapping {
        resource: resource.to_string(),
        reason,
    };

    let url = match Url::parse(resource) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => return Ok(None),
        Err(e) => return Err(mapping_error(format!("invalid URI: {}", e))),
    };
    if url.scheme() != "file" {
        return Ok(None);
    }
    if !matches!(url.host_str(), None | Some("") | Some("localhost")) {
        return Ok(None);
    }

    let path = url
        .to_file_path()
        .map_err(|_| mapping_error("not a valid local path on this platform".to_string()))?;
    if path.to_str().is_none() {
        return Err(mapping_error("path is not valid UTF-8 after decoding".to_string()));
    }
    Ok(Some(path))
}

/// Component-wise prefix test, so `/a/b` contains `/a/b/c` but not `/a/bc`
pub fn is_under(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Classify one record against the configured scope
pub fn match_record(record: SnapshotRecord, config: &ResolveConfig) -> MatchOutcome {
    match resource_path(&record.resource) {
        Ok(Some(path)) if is_under(&path, &config.scope) => {
            debug!("matched {}", record.resource);
            MatchOutcome::Matched(MatchedRecord { record, path })
        }
        Ok(_) => MatchOutcome::Unmatched(record),
        Err(e) => MatchOutcome::Rejected(e),
    }
}
