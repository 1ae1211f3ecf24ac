//! Process-wide toggle for lifecycle logging.
//!
//! Session creation and teardown emit `log` lines only while the toggle is
//! on. Encode and flush hot paths never consult it. The toggle is a single
//! relaxed atomic: the embedding model is a single managed call stack, so
//! "set before read" is the only ordering contract.

use std::sync::atomic::{AtomicBool, Ordering};

static LIFECYCLE_LOGGING: AtomicBool = AtomicBool::new(false);

/// Enable or disable lifecycle logging for all subsequent init/close
/// operations in the process. Off by default; in-flight calls are
/// unaffected.
pub fn set_logging(enabled: bool) {
    LIFECYCLE_LOGGING.store(enabled, Ordering::Relaxed);
}

/// Whether lifecycle operations should emit log lines.
pub fn logging_enabled() -> bool {
    LIFECYCLE_LOGGING.load(Ordering::Relaxed)
}
