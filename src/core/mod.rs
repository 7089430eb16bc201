pub mod executor;
pub mod hash;
pub mod mapper;
pub mod matcher;
pub mod parallel;
pub mod record;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod validate;

pub use executor::{CopyOutcome, Executor, Listing, RestoreFs, RestoreOptions, StdFs};
pub use parallel::CancelFlag;
pub use record::{SnapshotRecord, VersionEntry};
pub use report::{Batch, Report};
pub use resolver::{resolve, Resolution};
pub use validate::{ResolvedFile, ResolvedSet};
