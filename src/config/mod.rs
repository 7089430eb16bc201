pub mod resolve;
pub mod settings;

pub use resolve::{absolutize, normalize, ResolveConfig};
pub use settings::{default_history_dir, HistoryConfig, LhrConfig, RestoreConfig, UiConfig};
