use log::{info, warn};

use crate::config::ResolveConfig;
use crate::core::mapper::map_destination;
use crate::core::matcher::{match_record, MatchOutcome};
use crate::core::parallel::CancelFlag;
use crate::core::record::load_records;
use crate::core::report::Report;
use crate::core::selector::select_latest;
use crate::core::validate::{validate, ResolvedFile, ResolvedSet};
use crate::error::{LhrError, Result};

/// Output of the pure resolution phase
#[derive(Debug)]
pub struct Resolution {
    /// Empty when validation found destination collisions
    pub set: ResolvedSet,
    pub report: Report,
}

/// Load, match, select, map and validate.
///
/// Per-record problems and destination collisions land in the report next
/// to each other; only an unreadable history root or an interrupt fails the
/// whole call.
pub fn resolve(config: &ResolveConfig, cancel: &CancelFlag) -> Result<Resolution> {
    let loaded = load_records(config, cancel)?;
    if cancel.is_cancelled() {
        return Err(LhrError::Interrupted);
    }

    let mut report = Report {
        loaded: loaded.values.len(),
        failures: loaded.errors,
        ..Report::default()
    };

    let mut files = Vec::new();
    for record in loaded.values {
        let matched = match match_record(record, config) {
            MatchOutcome::Matched(matched) => matched,
            MatchOutcome::Unmatched(record) => {
                report.unmatched.push(record.resource);
                continue;
            }
            MatchOutcome::Rejected(e) => {
                warn!("{}", e);
                report.failures.push(e);
                continue;
            }
        };
        report.matched += 1;

        let resolved = select_latest(&matched.record).and_then(|selected| {
            let destination_path = map_destination(&selected.resource, &matched.path, config)?;
            Ok(ResolvedFile {
                resource: selected.resource,
                source_path: selected.source_path,
                destination_path,
            })
        });
        match resolved {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("{}", e);
                report.failures.push(e);
            }
        }
    }

    let set = match validate(files) {
        Ok(set) => set,
        Err(e) => {
            warn!("{}", e);
            report.failures.push(e);
            ResolvedSet::default()
        }
    };
    report.resolved = set.len();
    info!(
        "resolved {} of {} records ({} outside {})",
        report.resolved,
        report.loaded,
        report.unmatched.len(),
        config.scope.display()
    );

    Ok(Resolution { set, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn add_history(history: &Path, dir: &str, resource: &str, entries: &[(&str, i64)]) -> PathBuf {
        let storage = history.join(dir);
        fs::create_dir_all(&storage).unwrap();
        let entries: Vec<String> = entries
            .iter()
            .map(|(id, ts)| {
                fs::write(storage.join(id), format!("{} at {}", resource, ts)).unwrap();
                format!(r#"{{"id":"{}","timestamp":{}}}"#, id, ts)
            })
            .collect();
        fs::write(
            storage.join("entries.json"),
            format!(r#"{{"resource":"{}","entries":[{}]}}"#, resource, entries.join(",")),
        )
        .unwrap();
        storage
    }

    fn config(history: &Path, root: &str, destination: &Path) -> ResolveConfig {
        ResolveConfig::new(Path::new("/"), history, Path::new(root), Path::new("."), destination, 2)
            .unwrap()
    }

    #[test]
    fn resolves_latest_versions_under_root() {
        let tmp = tempdir().unwrap();
        let history = tmp.path().join("history");
        let h1 = add_history(&history, "01", "file:///a/b/c/d.txt", &[("x", 100), ("y", 200), ("z", 150)]);
        add_history(&history, "02", "file:///a/bc/d.txt", &[("q", 1)]);
        fs::create_dir_all(history.join("03")).unwrap();

        let resolution = resolve(&config(&history, "/a/b", Path::new("/out")), &CancelFlag::default()).unwrap();

        assert_eq!(resolution.set.len(), 1);
        let file = &resolution.set.files()[0];
        assert_eq!(file.source_path, h1.join("y"));
        assert_eq!(file.destination_path, PathBuf::from("/out/c/d.txt"));

        let report = resolution.report;
        assert_eq!(report.loaded, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, vec!["file:///a/bc/d.txt".to_string()]);
        assert_eq!(report.count("parse"), 1);
    }

    #[test]
    fn mapping_failures_are_excluded_and_reported() {
        let tmp = tempdir().unwrap();
        let history = tmp.path().join("history");
        add_history(&history, "01", "file:///a/b/ok.txt", &[("1", 1)]);
        add_history(&history, "02", "file:///a/b/..%2F..%2Fetc%2Fpasswd", &[("1", 1)]);

        let resolution = resolve(&config(&history, "/a/b", Path::new("/out")), &CancelFlag::default()).unwrap();
        assert_eq!(resolution.set.len(), 1);
        assert_eq!(resolution.report.count("mapping"), 1);
    }

    #[test]
    fn collisions_are_reported_with_other_exclusions() {
        let tmp = tempdir().unwrap();
        let history = tmp.path().join("history");
        add_history(&history, "01", "file:///a/b/x%20y.txt", &[("1", 1)]);
        add_history(&history, "02", "file:///a/b/x y.txt", &[("1", 2)]);
        add_history(&history, "03", "file:///a/b/fine.txt", &[("1", 3)]);
        fs::create_dir_all(history.join("04")).unwrap();

        let resolution = resolve(&config(&history, "/a/b", Path::new("/out")), &CancelFlag::default()).unwrap();
        assert!(resolution.set.is_empty());
        assert_eq!(resolution.report.resolved, 0);
        assert_eq!(resolution.report.count("validation"), 1);
        assert_eq!(resolution.report.count("parse"), 1);
        assert!(resolution.report.has_failures());
    }

    #[test]
    fn cancelled_load_is_interrupted() {
        let tmp = tempdir().unwrap();
        let history = tmp.path().join("history");
        add_history(&history, "01", "file:///a/b/ok.txt", &[("1", 1)]);

        let cancel = CancelFlag::default();
        cancel.cancel();
        let err = resolve(&config(&history, "/a/b", Path::new("/out")), &cancel).unwrap_err();
        assert!(matches!(err, LhrError::Interrupted));
    }
}
