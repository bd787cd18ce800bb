//! Re-entrancy token
//!
//! Each lookup enters the token and holds the returned guard until it
//! returns. The guard's `Drop` releases the level, so the depth is restored
//! on normal return, on `?` propagation and on unwinding alike.

use std::cell::Cell;

/// Per-finder nesting counter.
///
/// `Cell` keeps the owning finder `!Sync`: the token only guards one call
/// stack re-entering itself, never parallel threads.
#[derive(Debug, Default)]
pub struct ReentryToken {
    depth: Cell<usize>,
}

impl ReentryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters one nesting level. The returned guard leaves it on drop.
    pub fn enter(&self) -> ReentryGuard<'_> {
        let level = self.depth.get() + 1;
        self.depth.set(level);
        ReentryGuard { token: self, level }
    }

    /// Number of lookups currently on the stack for this token.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn in_progress(&self) -> bool {
        self.depth.get() > 0
    }
}

#[must_use = "the nesting level is released as soon as the guard is dropped"]
pub struct ReentryGuard<'a> {
    token: &'a ReentryToken,
    level: usize,
}

impl ReentryGuard<'_> {
    /// True for the lookup that entered an idle token.
    pub fn is_outermost(&self) -> bool {
        self.level == 1
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.token.depth.set(self.token.depth.get() - 1);
    }
}
