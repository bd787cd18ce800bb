use std::cell::Cell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::HookConfig;
use crate::domain::{MetaPathFinder, ModuleResolver};
use crate::hook::finder::Finder;
use crate::infrastructure::MetaPath;

/// Owns the single Finder of a host and splices it into that host's meta
/// path.
///
/// Create one registrar per host and keep it for the life of the host.
/// `install` performs no deduplication: calling it twice puts the same
/// Finder on the meta path twice. Use [`HookRegistrar::is_installed`] when
/// that matters.
pub struct HookRegistrar<R: ModuleResolver> {
    finder: Rc<Finder<R>>,
    installs: Cell<usize>,
}

impl<R> HookRegistrar<R>
where
    R: ModuleResolver + 'static,
    R::Module: 'static,
{
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, HookConfig::default())
    }

    pub fn with_config(resolver: R, config: HookConfig) -> Self {
        Self {
            finder: Rc::new(Finder::with_config(resolver, config)),
            installs: Cell::new(0),
        }
    }

    pub fn finder(&self) -> Rc<Finder<R>> {
        Rc::clone(&self.finder)
    }

    /// Inserts the Finder at the front of `meta_path`.
    ///
    /// Returns `false` when the configuration disables the hook.
    pub fn install(&self, meta_path: &mut MetaPath<R::Module>) -> bool {
        if !self.finder.config().enabled {
            info!("import hook disabled by configuration, meta path untouched");
            return false;
        }

        let already = meta_path.count_of(&self.finder);
        if already > 0 {
            warn!(
                entries = already + 1,
                "import hook installed again; the Finder now appears more than once"
            );
        }

        let entry: Rc<dyn MetaPathFinder<R::Module>> = self.finder.clone();
        meta_path.insert(0, entry);
        self.installs.set(self.installs.get() + 1);
        true
    }

    pub fn is_installed(&self, meta_path: &MetaPath<R::Module>) -> bool {
        meta_path.position_of(&self.finder).is_some()
    }

    /// How many times `install` actually inserted the Finder.
    pub fn install_count(&self) -> usize {
        self.installs.get()
    }
}
