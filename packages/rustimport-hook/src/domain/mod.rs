//! Domain layer: the contracts between the host import machinery, the hook
//! and the external resolver.
//!
//! # Port Traits
//!
//! - `ModuleResolver`: hook → external resolver (`resolve(name, opt_in)`)
//! - `MetaPathFinder`: host → hook (legacy `find_module`, modern `find_spec`)
//! - `Loader`: host → hook (legacy `load_module`, modern `create_module` + `exec_module`)
//!
//! The module object type `M` is whatever the host uses as a module handle
//! (an `Rc<Module>` in native hosts, a `PyObject` in CPython). It is cloned,
//! never rebuilt, so handle identity survives every hop.

pub mod module_name;

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;

pub use module_name::ModuleName;

/// Host-supplied search-path context for a lookup (the parent package's
/// `__path__`, or `None` for top-level imports).
pub type SearchPath<'a> = Option<&'a [PathBuf]>;

/// Eligibility marker passed on every delegation to the resolver.
///
/// Single variant: the hook never asks a resolver to claim arbitrary names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptIn {
    /// Only claim modules that carry an explicit marker of eligibility.
    Required,
}

impl OptIn {
    pub fn is_required(self) -> bool {
        matches!(self, OptIn::Required)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port: external resolver
// ═══════════════════════════════════════════════════════════════════════════

/// Turns a dotted module name into a fully constructed module object.
///
/// Must fail with an error of kind [`ErrorKind::NotFound`](crate::ErrorKind)
/// when it has nothing to build for `name`. Any other error is treated as a
/// real failure and reaches the importing code unchanged.
pub trait ModuleResolver {
    type Module: Clone;

    fn resolve(&self, name: &ModuleName, opt_in: OptIn) -> Result<Self::Module>;
}

impl<M, F> ModuleResolver for F
where
    M: Clone,
    F: Fn(&ModuleName, OptIn) -> Result<M>,
{
    type Module = M;

    fn resolve(&self, name: &ModuleName, opt_in: OptIn) -> Result<M> {
        self(name, opt_in)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port: loader
// ═══════════════════════════════════════════════════════════════════════════

/// Host two-step load contract plus the legacy single-step one.
pub trait Loader<M> {
    /// Legacy protocol: produce the finished module in one step.
    fn load_module(&self, name: &ModuleName) -> M;

    /// Modern protocol, step one: produce the module object.
    fn create_module(&self, spec: &ModuleSpec<M>) -> M;

    /// Modern protocol, step two: populate the module object.
    fn exec_module(&self, module: &M);
}

/// Module-specification record returned by the modern lookup protocol.
pub struct ModuleSpec<M> {
    pub name: ModuleName,
    pub loader: Rc<dyn Loader<M>>,
    pub origin: Option<String>,
}

impl<M> ModuleSpec<M> {
    pub fn new(name: ModuleName, loader: Rc<dyn Loader<M>>) -> Self {
        Self {
            name,
            loader,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl<M> Clone for ModuleSpec<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            loader: Rc::clone(&self.loader),
            origin: self.origin.clone(),
        }
    }
}

impl<M> fmt::Debug for ModuleSpec<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Port: meta path participant
// ═══════════════════════════════════════════════════════════════════════════

/// A participant in the host's meta path.
///
/// `Ok(None)` is "no opinion": the host moves on to the next participant.
/// `Err(_)` aborts the import with that error.
pub trait MetaPathFinder<M> {
    /// Legacy lookup protocol.
    fn find_module(&self, name: &ModuleName, path: SearchPath<'_>)
        -> Result<Option<Rc<dyn Loader<M>>>>;

    /// Modern lookup protocol. `target` is the module being reloaded, if any.
    fn find_spec(
        &self,
        name: &ModuleName,
        path: SearchPath<'_>,
        target: Option<&M>,
    ) -> Result<Option<ModuleSpec<M>>>;
}
