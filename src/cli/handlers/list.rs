use std::io::{self, Write};

use crate::cli::ui::{format_mapping, print_report, print_unmatched};
use crate::config::ResolveConfig;
use crate::core::{resolve, CancelFlag, Executor, Report, Resolution, RestoreOptions, StdFs};
use crate::error::{ErrorContext, Result};

/// Print `source -> destination` for every resolved file
pub fn handle_list(config: &ResolveConfig, cancel: &CancelFlag, verbose: bool) -> Result<Report> {
    config.check_access()?;

    let Resolution { set, report } = resolve(config, cancel)?;

    let executor = Executor::new(&StdFs, RestoreOptions::default(), cancel.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (source, destination) in executor.list(&set) {
        writeln!(out, "{}", format_mapping(source, destination))
            .with_io_context(|| "writing file list".to_string())?;
    }
    out.flush()
        .with_io_context(|| "writing file list".to_string())?;

    if verbose {
        print_unmatched(&report);
    }
    print_report(&report, false);
    Ok(report)
}
