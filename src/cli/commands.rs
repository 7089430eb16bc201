use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lhr", version, about = "Restore files from the editor's local history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: GlobalOptions,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// History store directory (defaults to the editor's User/History)
    #[arg(short = 'H', long, global = true)]
    pub history: Option<PathBuf>,

    /// Root path removed from every restored file's path
    #[arg(short = 'i', long, global = true)]
    pub root: Option<PathBuf>,

    /// Directory to restore into (defaults to the current directory)
    #[arg(short = 'o', long, global = true)]
    pub destination: Option<PathBuf>,

    /// Worker threads for loading and copying
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// Configuration file (defaults to <config dir>/lhr/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore a directory to its latest recorded version
    Restore {
        /// Path to restore, relative to the root or inside it
        path: PathBuf,

        /// Rewrite destination files even when they already match
        #[arg(short, long)]
        force: bool,
    },

    /// List the files a restore would write
    List {
        /// Path to list, relative to the root or inside it
        path: PathBuf,
    },
}

impl Commands {
    pub fn path(&self) -> &PathBuf {
        match self {
            Commands::Restore { path, .. } | Commands::List { path } => path,
        }
    }
}
