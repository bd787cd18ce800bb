//! Reference host import machinery
//!
//! A small, native rendition of the host side of the protocol: a meta path,
//! a module cache, and the two lookup walks (modern spec-based and legacy
//! loader-based). Native embedders use it directly; tests use it to drive
//! the hook through real re-entrant imports.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

use tracing::trace;

use crate::domain::{ModuleName, ModuleResolver};
use crate::error::{HookError, Result};
use crate::hook::HookRegistrar;
use crate::infrastructure::MetaPath;

pub struct ImportSystem<M> {
    meta_path: RefCell<MetaPath<M>>,
    modules: RefCell<HashMap<ModuleName, M>>,
    search_path: Vec<PathBuf>,
}

impl<M: Clone + 'static> ImportSystem<M> {
    pub fn new() -> Self {
        Self {
            meta_path: RefCell::new(MetaPath::new()),
            modules: RefCell::new(HashMap::new()),
            search_path: Vec::new(),
        }
    }

    /// Search-path context handed to every participant.
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn meta_path(&self) -> Ref<'_, MetaPath<M>> {
        self.meta_path.borrow()
    }

    /// Runs `f` with mutable access to the meta path.
    pub fn with_meta_path<T>(&self, f: impl FnOnce(&mut MetaPath<M>) -> T) -> T {
        f(&mut self.meta_path.borrow_mut())
    }

    pub fn install_hook<R>(&self, registrar: &HookRegistrar<R>) -> bool
    where
        R: ModuleResolver<Module = M> + 'static,
    {
        self.with_meta_path(|meta_path| registrar.install(meta_path))
    }

    pub fn get(&self, name: &ModuleName) -> Option<M> {
        self.modules.borrow().get(name).cloned()
    }

    pub fn is_loaded(&self, name: &ModuleName) -> bool {
        self.modules.borrow().contains_key(name)
    }

    /// Forgets every loaded module and participant.
    pub fn reset(&self) {
        self.modules.borrow_mut().clear();
        self.meta_path.borrow_mut().clear();
    }

    fn search_path(&self) -> Option<&[PathBuf]> {
        if self.search_path.is_empty() {
            None
        } else {
            Some(&self.search_path)
        }
    }

    /// `import name` through the modern protocol.
    pub fn import_module(&self, dotted: &str) -> Result<M> {
        let name = ModuleName::parse(dotted)?;
        self.import(&name)
    }

    pub fn import(&self, name: &ModuleName) -> Result<M> {
        if let Some(module) = self.get(name) {
            return Ok(module);
        }
        let module = self.find_and_load(name, None)?;
        self.modules
            .borrow_mut()
            .insert(name.clone(), module.clone());
        Ok(module)
    }

    /// Re-runs the lookup for an already loaded module, passing the current
    /// object as the target hint.
    pub fn reload(&self, name: &ModuleName) -> Result<M> {
        let current = self
            .get(name)
            .ok_or_else(|| HookError::no_module(name.as_str()))?;
        let module = self.find_and_load(name, Some(&current))?;
        self.modules
            .borrow_mut()
            .insert(name.clone(), module.clone());
        Ok(module)
    }

    fn find_and_load(&self, name: &ModuleName, target: Option<&M>) -> Result<M> {
        // No borrow is held while participants run: resolvers may import.
        let finders = self.meta_path.borrow().snapshot();

        for (index, finder) in finders.iter().enumerate() {
            if let Some(spec) = finder.find_spec(name, self.search_path(), target)? {
                trace!(module = %name, participant = index, "claimed via find_spec");
                let module = spec.loader.create_module(&spec);
                spec.loader.exec_module(&module);
                return Ok(module);
            }
        }

        Err(HookError::no_module(name.as_str()))
    }

    /// `import name` through the legacy `find_module` / `load_module` walk.
    pub fn import_module_legacy(&self, dotted: &str) -> Result<M> {
        let name = ModuleName::parse(dotted)?;
        if let Some(module) = self.get(&name) {
            return Ok(module);
        }

        let finders = self.meta_path.borrow().snapshot();
        for (index, finder) in finders.iter().enumerate() {
            if let Some(loader) = finder.find_module(&name, self.search_path())? {
                trace!(module = %name, participant = index, "claimed via find_module");
                let module = loader.load_module(&name);
                self.modules
                    .borrow_mut()
                    .insert(name.clone(), module.clone());
                return Ok(module);
            }
        }

        Err(HookError::no_module(name.as_str()))
    }
}

impl<M: Clone + 'static> Default for ImportSystem<M> {
    fn default() -> Self {
        Self::new()
    }
}
