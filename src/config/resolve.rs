use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{LhrError, Result};

/// Everything one resolution run needs, threaded through every stage.
///
/// All paths are absolute and free of `.` and `..` components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Editor history store holding one subdirectory per tracked file
    pub history_root: PathBuf,
    /// Prefix stripped from every resource to get its relative path
    pub target_root: PathBuf,
    /// Subtree of `target_root` whose files are selected
    pub scope: PathBuf,
    /// Where relative paths are recreated
    pub destination_root: PathBuf,
    /// Worker threads for loading and copying
    pub jobs: usize,
}

impl ResolveConfig {
    /// Build a config, resolving relative paths against `cwd`.
    ///
    /// `scope` is either relative to `target_root` or an absolute path that
    /// must lie inside it.
    pub fn new(
        cwd: &Path,
        history_root: &Path,
        target_root: &Path,
        scope: &Path,
        destination_root: &Path,
        jobs: usize,
    ) -> Result<Self> {
        let target_root = absolutize(cwd, target_root);
        let scope = normalize(&target_root.join(scope));

        if !scope.starts_with(&target_root) {
            return Err(LhrError::Config {
                message: format!(
                    "path '{}' is not inside root '{}'",
                    scope.display(),
                    target_root.display()
                ),
                path: None,
            });
        }

        Ok(Self {
            history_root: absolutize(cwd, history_root),
            target_root,
            scope,
            destination_root: absolutize(cwd, destination_root),
            jobs: jobs.max(1),
        })
    }

    /// Verify the history store and destination exist as directories
    pub fn check_access(&self) -> Result<()> {
        check_dir(&self.history_root, "history root")?;
        check_dir(&self.destination_root, "destination root")
    }
}

fn check_dir(path: &Path, role: &str) -> Result<()> {
    let access_error = |reason: String| LhrError::Access {
        path: path.to_path_buf(),
        role: role.to_string(),
        reason,
    };

    let meta = fs::metadata(path).map_err(|e| access_error(e.to_string()))?;
    if !meta.is_dir() {
        return Err(access_error("not a directory".to_string()));
    }
    fs::read_dir(path).map_err(|e| access_error(e.to_string()))?;
    Ok(())
}

/// Join a relative path onto `cwd` and normalize the result
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Remove `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            _ => result.push(component),
        }
    }

    result
}
