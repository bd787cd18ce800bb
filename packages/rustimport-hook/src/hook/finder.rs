//! Meta path Finder
//!
//! Per lookup: `idle → delegating → {claimed | not-found-suppressed |
//! error-propagated} → idle`. Both host protocols funnel into
//! [`Finder::attempt_claim`], which owns the guard-and-delegate logic.
//!
//! # Thread safety
//!
//! The re-entrancy token guards a single call stack re-entering the same
//! Finder (the resolver importing its own dependencies through the host).
//! It is not a cross-thread lock, and `Finder` is `!Sync` accordingly.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::HookConfig;
use crate::domain::{
    Loader, MetaPathFinder, ModuleName, ModuleResolver, ModuleSpec, OptIn, SearchPath,
};
use crate::error::Result;
use crate::hook::guard::ReentryToken;
use crate::hook::loader::PrebuiltLoader;

/// Snapshot of a Finder's lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinderStats {
    pub claimed: usize,
    pub not_found: usize,
    pub failed: usize,
    pub reentry_skips: usize,
    pub skipped_by_config: usize,
}

#[derive(Debug, Default)]
struct Counters {
    claimed: Cell<usize>,
    not_found: Cell<usize>,
    failed: Cell<usize>,
    reentry_skips: Cell<usize>,
    skipped_by_config: Cell<usize>,
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

pub struct Finder<R: ModuleResolver> {
    resolver: R,
    config: HookConfig,
    token: ReentryToken,
    counters: Counters,
}

impl<R: ModuleResolver> Finder<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, HookConfig::default())
    }

    pub fn with_config(resolver: R, config: HookConfig) -> Self {
        Self {
            resolver,
            config,
            token: ReentryToken::new(),
            counters: Counters::default(),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// True only while a lookup on this Finder is on the stack.
    pub fn in_progress(&self) -> bool {
        self.token.in_progress()
    }

    pub fn depth(&self) -> usize {
        self.token.depth()
    }

    pub fn stats(&self) -> FinderStats {
        FinderStats {
            claimed: self.counters.claimed.get(),
            not_found: self.counters.not_found.get(),
            failed: self.counters.failed.get(),
            reentry_skips: self.counters.reentry_skips.get(),
            skipped_by_config: self.counters.skipped_by_config.get(),
        }
    }

    /// Shared routine behind both lookup protocols.
    ///
    /// `Ok(None)` is "no opinion". Only the resolver's NotFound is turned
    /// into `Ok(None)`; every other error is returned as is.
    pub(crate) fn attempt_claim(
        &self,
        name: &ModuleName,
        path: SearchPath<'_>,
    ) -> Result<Option<R::Module>> {
        if self.config.skips(name.head()) {
            bump(&self.counters.skipped_by_config);
            trace!(module = %name, "package on skip list, not delegating");
            return Ok(None);
        }

        let guard = self.token.enter();
        if !guard.is_outermost() {
            bump(&self.counters.reentry_skips);
            trace!(module = %name, depth = guard.level(), "re-entrant lookup, no opinion");
            return Ok(None);
        }

        trace!(module = %name, search_path = ?path, "delegating to resolver");

        match self.resolver.resolve(name, OptIn::Required) {
            Ok(module) => {
                bump(&self.counters.claimed);
                debug!(module = %name, "claimed by resolver");
                Ok(Some(module))
            }
            Err(err) if err.is_not_found() => {
                bump(&self.counters.not_found);
                if self.config.log_error_chain {
                    debug!(module = %name, error = %err.chain(), "resolver has nothing to build");
                } else {
                    debug!(module = %name, "resolver has nothing to build");
                }
                Ok(None)
            }
            Err(err) => {
                bump(&self.counters.failed);
                debug!(module = %name, kind = %err.kind, "resolver failed, propagating");
                Err(err)
            }
        }
    }
}

impl<R> MetaPathFinder<R::Module> for Finder<R>
where
    R: ModuleResolver,
    R::Module: 'static,
{
    fn find_module(
        &self,
        name: &ModuleName,
        path: SearchPath<'_>,
    ) -> Result<Option<Rc<dyn Loader<R::Module>>>> {
        Ok(self
            .attempt_claim(name, path)?
            .map(|module| Rc::new(PrebuiltLoader::new(module)) as Rc<dyn Loader<R::Module>>))
    }

    fn find_spec(
        &self,
        name: &ModuleName,
        path: SearchPath<'_>,
        target: Option<&R::Module>,
    ) -> Result<Option<ModuleSpec<R::Module>>> {
        if target.is_some() {
            trace!(module = %name, "reload requested, resolving afresh");
        }

        Ok(self.attempt_claim(name, path)?.map(|module| {
            let loader: Rc<dyn Loader<R::Module>> = Rc::new(PrebuiltLoader::new(module));
            ModuleSpec::new(name.clone(), loader)
        }))
    }
}
