// Core modules
pub mod error;
pub mod config;
pub mod core;

// Command-line surface
pub mod cli;

// Re-exports for convenience
pub use error::{LhrError, Result};
pub use config::{LhrConfig, ResolveConfig};
pub use crate::core::{resolve, Executor, Report, ResolvedSet};
