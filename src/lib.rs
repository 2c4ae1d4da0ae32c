use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub mod cloze;
pub mod convert;
pub mod document;
pub mod editor;
pub mod host;
pub mod render;
pub mod theme;

pub use cloze::{ClozeSpan, locate, scan, scan_sorted};
pub use document::{Node, Position, Range, Selection, flatten};
pub use editor::ClozeEditor;
pub use host::{DocumentHost, HostError, MemoryHost, UndoManager};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "UNCLOZE_LOG";

/// Installs the stderr log subscriber once per process. Later calls do
/// nothing.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another subscriber may already be installed by the embedding program.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
