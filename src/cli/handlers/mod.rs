pub mod list;
pub mod restore;

pub use list::*;
pub use restore::*;

use std::path::Path;

use crate::cli::commands::GlobalOptions;
use crate::config::{LhrConfig, ResolveConfig};
use crate::error::{LhrError, Result};

/// Combine command-line options and the config file into one run config.
///
/// Flags win over the config file, which wins over built-in defaults.
pub fn build_resolve_config(
    options: &GlobalOptions,
    settings: &LhrConfig,
    path: &Path,
    cwd: &Path,
) -> Result<ResolveConfig> {
    let root = options.root.as_deref().ok_or_else(|| LhrError::Config {
        message: "--root is required".to_string(),
        path: None,
    })?;

    let history = match &options.history {
        Some(history) => history.clone(),
        None => settings.history_path()?,
    };

    let destination = options
        .destination
        .clone()
        .or_else(|| settings.restore.destination.clone())
        .unwrap_or_else(|| cwd.to_path_buf());

    let jobs = options.jobs.filter(|&n| n > 0).unwrap_or_else(|| settings.jobs());

    ResolveConfig::new(cwd, &history, root, path, &destination, jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options() -> GlobalOptions {
        GlobalOptions {
            history: None,
            root: Some(PathBuf::from("/src/proj")),
            destination: None,
            jobs: None,
            config: None,
            verbose: false,
            no_color: false,
        }
    }

    #[test]
    fn flags_override_config_file() {
        let mut settings = LhrConfig::default();
        settings.history.path = Some(PathBuf::from("/from/config"));
        settings.restore.destination = Some(PathBuf::from("/config/out"));
        settings.restore.jobs = 7;

        let mut opts = options();
        opts.history = Some(PathBuf::from("hist"));
        opts.jobs = Some(2);

        let config = build_resolve_config(&opts, &settings, Path::new("."), Path::new("/cwd")).unwrap();
        assert_eq!(config.history_root, PathBuf::from("/cwd/hist"));
        assert_eq!(config.destination_root, PathBuf::from("/config/out"));
        assert_eq!(config.jobs, 2);
    }

    #[test]
    fn destination_defaults_to_cwd() {
        let mut settings = LhrConfig::default();
        settings.history.path = Some(PathBuf::from("/h"));

        let config = build_resolve_config(&options(), &settings, Path::new("lib"), Path::new("/cwd")).unwrap();
        assert_eq!(config.destination_root, PathBuf::from("/cwd"));
        assert_eq!(config.scope, PathBuf::from("/src/proj/lib"));
    }

    #[test]
    fn root_is_required() {
        let mut opts = options();
        opts.root = None;
        let err = build_resolve_config(&opts, &LhrConfig::default(), Path::new("."), Path::new("/"))
            .unwrap_err();
        assert!(matches!(err, LhrError::Config { .. }));
    }
}
