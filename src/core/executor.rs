use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::core::hash::{compute_file_hash, short_hash};
use crate::core::parallel::{run_indexed, CancelFlag};
use crate::core::report::Report;
use crate::core::validate::{ResolvedFile, ResolvedSet};
use crate::error::LhrError;

/// Filesystem operations a restore performs
pub trait RestoreFs: Sync {
    /// Create a directory and its parents; succeeds if it already exists
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy `source` over `destination` without ever exposing a partial file
    fn copy_atomic(&self, source: &Path, destination: &Path) -> io::Result<()>;

    /// SHA-256 of a file, `None` if it does not exist
    fn file_hash(&self, path: &Path) -> io::Result<Option<String>>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl RestoreFs for StdFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_atomic(&self, source: &Path, destination: &Path) -> io::Result<()> {
        let file_name = destination.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name")
        })?;
        let mut temp_name = OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(format!(".{}.lhr-tmp", std::process::id()));
        let temp_path = destination.with_file_name(temp_name);

        let result = fs::copy(source, &temp_path).and_then(|_| fs::rename(&temp_path, destination));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn file_hash(&self, path: &Path) -> io::Result<Option<String>> {
        match compute_file_hash(path) {
            Ok(hash) => Ok(Some(hash)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// What happened to one resolved file during restore
#[derive(Debug)]
pub enum CopyOutcome {
    Copied,
    /// Destination already held identical content
    Unchanged,
    Failed(LhrError),
    /// Never started because the run was cancelled
    Skipped,
}

#[derive(Debug, Clone, Copy)]
pub struct RestoreOptions {
    pub jobs: usize,
    pub skip_unchanged: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            skip_unchanged: true,
        }
    }
}

/// Lazy `(source, destination)` pairs of a resolved set
pub struct Listing<'s> {
    files: std::slice::Iter<'s, ResolvedFile>,
}

impl<'s> Iterator for Listing<'s> {
    type Item = (&'s Path, &'s Path);

    fn next(&mut self) -> Option<Self::Item> {
        self.files
            .next()
            .map(|file| (file.source_path.as_path(), file.destination_path.as_path()))
    }
}

/// Lists or materializes a validated [`ResolvedSet`]
pub struct Executor<'a, F: RestoreFs> {
    fs: &'a F,
    options: RestoreOptions,
    cancel: CancelFlag,
}

impl<'a, F: RestoreFs> Executor<'a, F> {
    pub fn new(fs: &'a F, options: RestoreOptions, cancel: CancelFlag) -> Self {
        Self { fs, options, cancel }
    }

    /// `(source, destination)` pairs in resolution order; touches nothing
    pub fn list<'s>(&self, set: &'s ResolvedSet) -> Listing<'s> {
        Listing {
            files: set.files().iter(),
        }
    }

    /// Copy every file into place, in parallel.
    ///
    /// A failed copy never stops its siblings. `on_done` runs on the worker
    /// thread once per finished file. Outcomes come back in set order.
    pub fn restore<P>(&self, set: &ResolvedSet, on_done: P) -> Vec<CopyOutcome>
    where
        P: Fn(&ResolvedFile, &CopyOutcome) + Sync,
    {
        let outcomes = run_indexed(set.files(), self.options.jobs, &self.cancel, |file| {
            let outcome = self.restore_one(file);
            on_done(file, &outcome);
            outcome
        });

        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or(CopyOutcome::Skipped))
            .collect()
    }

    fn restore_one(&self, file: &ResolvedFile) -> CopyOutcome {
        let copy_error = |cause: io::Error| {
            let e = LhrError::Copy {
                source: file.source_path.clone(),
                destination: file.destination_path.clone(),
                cause,
            };
            warn!("{}", e);
            CopyOutcome::Failed(e)
        };

        if self.options.skip_unchanged {
            let source_hash = match self.fs.file_hash(&file.source_path) {
                Ok(Some(hash)) => hash,
                Ok(None) => {
                    return copy_error(io::Error::new(
                        io::ErrorKind::NotFound,
                        "snapshot content is missing",
                    ))
                }
                Err(e) => return copy_error(e),
            };
            if let Ok(Some(existing)) = self.fs.file_hash(&file.destination_path) {
                if existing == source_hash {
                    debug!(
                        "{} unchanged ({})",
                        file.destination_path.display(),
                        short_hash(&existing)
                    );
                    return CopyOutcome::Unchanged;
                }
            }
        }

        let parent = file.destination_path.parent();
        let result = match parent {
            Some(parent) => self.fs.create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|_| {
            self.fs
                .copy_atomic(&file.source_path, &file.destination_path)
        });

        match result {
            Ok(()) => {
                debug!(
                    "{} -> {}",
                    file.source_path.display(),
                    file.destination_path.display()
                );
                CopyOutcome::Copied
            }
            Err(e) => copy_error(e),
        }
    }
}

impl Report {
    /// Fold restore outcomes into the run report
    pub fn record_restore(&mut self, outcomes: Vec<CopyOutcome>) {
        for outcome in outcomes {
            match outcome {
                CopyOutcome::Copied => self.copied += 1,
                CopyOutcome::Unchanged => self.unchanged += 1,
                CopyOutcome::Skipped => self.skipped += 1,
                CopyOutcome::Failed(e) => self.failures.push(e),
            }
        }
    }
}
