use std::process;
use std::thread;

use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, warn};
use lhr::cli::handlers::{build_resolve_config, handle_list, handle_restore};
use lhr::cli::ui::print_error;
use lhr::cli::{Cli, Commands};
use lhr::config::LhrConfig;
use lhr::core::{CancelFlag, RestoreOptions};
use lhr::error::{ErrorContext, Result};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if cli.options.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let settings = match load_config(&cli) {
        Ok(settings) => settings,
        Err(error) => {
            init_logging(&cli, &LhrConfig::default());
            print_error(&error);
            process::exit(error.exit_code());
        }
    };
    if !settings.ui.colored {
        std::env::set_var("NO_COLOR", "1");
    }
    init_logging(&cli, &settings);

    let cancel = CancelFlag::default();
    watch_interrupt(cancel.clone());

    // Run the application
    match run_app(cli, &settings, &cancel) {
        Ok(_) if cancel.is_cancelled() => process::exit(lhr::LhrError::Interrupted.exit_code()),
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            print_error(&error);
            process::exit(error.exit_code());
        }
    }
}

/// Returns whether the run finished without any failures
fn run_app(cli: Cli, settings: &LhrConfig, cancel: &CancelFlag) -> Result<bool> {
    let cwd = std::env::current_dir()
        .with_io_context(|| "reading the current directory".to_string())?;
    let config = build_resolve_config(&cli.options, settings, cli.command.path(), &cwd)?;
    debug!("{:?}", config);

    let report = match cli.command {
        Commands::List { .. } => handle_list(&config, cancel, cli.options.verbose)?,
        Commands::Restore { force, .. } => {
            let options = RestoreOptions {
                jobs: config.jobs,
                skip_unchanged: settings.restore.skip_unchanged && !force,
            };
            handle_restore(
                &config,
                options,
                cancel,
                settings.ui.progress_bars,
                cli.options.verbose,
            )?
        }
    };

    Ok(!report.has_failures())
}

fn load_config(cli: &Cli) -> Result<LhrConfig> {
    match &cli.options.config {
        Some(path) if !path.exists() => Err(lhr::LhrError::Config {
            message: "file not found".to_string(),
            path: Some(path.clone()),
        }),
        Some(path) => LhrConfig::load(path),
        None => LhrConfig::load_global(),
    }
}

/// First Ctrl+C lets in-flight copies finish and skips the rest; a second
/// one exits immediately.
fn watch_interrupt(cancel: CancelFlag) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("cannot install Ctrl+C handler: {}", e);
                return;
            }
        };

        runtime.block_on(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("cannot install Ctrl+C handler: {}", e);
                return;
            }
            warn!("interrupted; finishing copies in progress");
            cancel.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                process::exit(lhr::LhrError::Interrupted.exit_code());
            }
        });
    });
}

fn init_logging(cli: &Cli, settings: &LhrConfig) {
    let level = if cli.options.verbose {
        "debug"
    } else {
        settings.ui.log_level.as_str()
    };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["lhr", "list", "src", "--root", "/proj", "-o", "/out"]).unwrap();
        assert!(matches!(cli.command, Commands::List { .. }));
        assert_eq!(cli.command.path().to_str(), Some("src"));
        assert_eq!(cli.options.destination.as_deref(), Some(std::path::Path::new("/out")));
    }

    #[test]
    fn test_restore_flags() {
        let cli = Cli::try_parse_from(["lhr", "-i", "/proj", "restore", ".", "--force", "-j", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Restore { force: true, .. }));
        assert_eq!(cli.options.jobs, Some(3));
    }

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["lhr", "restore", "--root", "/proj"]).is_err());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let cli = Cli::try_parse_from(["lhr", "list", ".", "--config", "/definitely/not/here.toml"]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
