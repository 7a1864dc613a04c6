pub mod debounce;
pub mod pipeline;
pub mod scanner;
pub mod watcher;

pub use debounce::DebouncedWatcher;
pub use pipeline::{Pipeline, PipelineConfig, RunOutcome};
pub use scanner::{ScanResult, Scanner};
pub use watcher::{ChangeKind, FileChange, FileWatcher, WatchError};
