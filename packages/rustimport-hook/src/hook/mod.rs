//! The interception layer: Finder, Loader and Registrar.

pub mod finder;
pub mod guard;
pub mod loader;
pub mod registrar;

pub use finder::{Finder, FinderStats};
pub use guard::{ReentryGuard, ReentryToken};
pub use loader::PrebuiltLoader;
pub use registrar::HookRegistrar;
