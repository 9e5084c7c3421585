//! Phase timing for construction and relaxation logging

use std::time::Instant;

/// RAII timer that logs elapsed time on drop.
///
/// ```ignore
/// let _t = Timed::debug("convex hull");
/// // ... do work ...
/// // logs "convex hull: 1.234ms" at DEBUG when _t is dropped
/// ```
pub(crate) struct Timed {
    name: &'static str,
    start: Instant,
    level: log::Level,
}

impl Timed {
    /// Create a new timer that logs at DEBUG level.
    pub(crate) fn debug(name: &'static str) -> Self {
        log::trace!("{}...", name);
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Debug,
        }
    }

    /// Create a new timer that logs at TRACE level.
    pub(crate) fn trace(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Trace,
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::log!(self.level, "{}: {:.3?}", self.name, elapsed);
    }
}
