use log::info;

use crate::cli::ui::{create_progress_bar, print_info, print_report, print_unmatched};
use crate::config::ResolveConfig;
use crate::core::{
    resolve, CancelFlag, CopyOutcome, Executor, Report, Resolution, RestoreOptions, StdFs,
};
use crate::error::Result;

/// Copy the newest snapshot of every resolved file into the destination
pub fn handle_restore(
    config: &ResolveConfig,
    options: RestoreOptions,
    cancel: &CancelFlag,
    progress: bool,
    verbose: bool,
) -> Result<Report> {
    config.check_access()?;

    let Resolution { set, mut report } = resolve(config, cancel)?;
    if verbose {
        print_unmatched(&report);
    }

    if set.is_empty() {
        if report.count("validation") == 0 {
            print_info(&format!("nothing to restore under {}", config.scope.display()));
        }
        print_report(&report, true);
        return Ok(report);
    }

    info!(
        "restoring {} files into {}",
        set.len(),
        config.destination_root.display()
    );

    let pb = create_progress_bar(set.len() as u64, progress);
    let executor = Executor::new(&StdFs, options, cancel.clone());
    let outcomes = executor.restore(&set, |file, outcome| {
        if let CopyOutcome::Failed(_) = outcome {
            pb.set_message(format!("failed: {}", file.destination_path.display()));
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    report.record_restore(outcomes);
    print_report(&report, true);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LhrError;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn interrupt_before_copying_restores_nothing() {
        let tmp = tempdir().unwrap();
        let history = tmp.path().join("history");
        let out = tmp.path().join("out");
        let storage = history.join("01");
        fs::create_dir_all(&storage).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(storage.join("1"), b"content").unwrap();
        fs::write(
            storage.join("entries.json"),
            r#"{"resource":"file:///proj/a.txt","entries":[{"id":"1","timestamp":1}]}"#,
        )
        .unwrap();

        let config =
            ResolveConfig::new(tmp.path(), &history, Path::new("/proj"), Path::new("."), &out, 2)
                .unwrap();
        let cancel = CancelFlag::default();
        cancel.cancel();

        let err = handle_restore(&config, RestoreOptions::default(), &cancel, false, false)
            .unwrap_err();
        assert!(matches!(err, LhrError::Interrupted));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }
}
