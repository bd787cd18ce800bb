//! Shared resolvers and module fixtures for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use rustimport_hook::{HookError, ImportSystem, ModuleName, ModuleResolver, OptIn, Result};

/// Stand-in for a host module object; identity is the `Rc` pointer.
#[derive(Debug)]
pub struct Module {
    pub name: String,
    pub deps: Vec<Rc<Module>>,
}

pub type ModuleRef = Rc<Module>;

pub fn name(s: &str) -> ModuleName {
    ModuleName::parse(s).unwrap()
}

#[derive(Clone)]
pub enum Outcome {
    Build,
    Fail(&'static str),
}

/// Table-driven resolver that records every call and its opt-in marker.
///
/// Names missing from the table are NotFound. Built modules are cached so
/// repeated lookups return the same object.
#[derive(Default)]
pub struct RecordingResolver {
    table: HashMap<String, Outcome>,
    built: RefCell<HashMap<String, ModuleRef>>,
    pub calls: RefCell<Vec<(String, OptIn)>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buildable(mut self, module: &str) -> Self {
        self.table.insert(module.to_string(), Outcome::Build);
        self
    }

    pub fn failing(mut self, module: &str, message: &'static str) -> Self {
        self.table.insert(module.to_string(), Outcome::Fail(message));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ModuleResolver for RecordingResolver {
    type Module = ModuleRef;

    fn resolve(&self, name: &ModuleName, opt_in: OptIn) -> Result<ModuleRef> {
        assert!(opt_in.is_required(), "resolver called without opt-in for {}", name);
        let key = name.to_string();
        self.calls.borrow_mut().push((key.clone(), opt_in));

        match self.table.get(&key) {
            Some(Outcome::Build) => Ok(Rc::clone(
                self.built
                    .borrow_mut()
                    .entry(key.clone())
                    .or_insert_with(|| {
                        Rc::new(Module {
                            name: key.clone(),
                            deps: Vec::new(),
                        })
                    }),
            )),
            Some(Outcome::Fail(message)) => Err(HookError::build_failure(key.clone(), *message)),
            None => Err(HookError::not_found(key)),
        }
    }
}

/// Resolver that imports its declared dependencies through the host while
/// building, the way a real build step imports helper modules.
pub struct ImportingResolver {
    pub host: Weak<ImportSystem<ModuleRef>>,
    pub graph: HashMap<String, Vec<String>>,
    pub calls: RefCell<Vec<String>>,
}

impl ImportingResolver {
    pub fn new(host: &Rc<ImportSystem<ModuleRef>>) -> Self {
        Self {
            host: Rc::downgrade(host),
            graph: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn module(mut self, module: &str, deps: &[&str]) -> Self {
        self.graph.insert(
            module.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
        );
        self
    }
}

impl ModuleResolver for ImportingResolver {
    type Module = ModuleRef;

    fn resolve(&self, name: &ModuleName, opt_in: OptIn) -> Result<ModuleRef> {
        assert!(opt_in.is_required());
        let key = name.to_string();
        self.calls.borrow_mut().push(key.clone());

        let deps = self
            .graph
            .get(&key)
            .ok_or_else(|| HookError::not_found(key.clone()))?;
        let host = self
            .host
            .upgrade()
            .ok_or_else(|| HookError::resolver("host dropped"))?;

        let mut loaded = Vec::new();
        for dep in deps {
            loaded.push(host.import_module(dep)?);
        }

        Ok(Rc::new(Module {
            name: key,
            deps: loaded,
        }))
    }
}

/// Host participant standing in for the regular file-based lookup: claims a
/// fixed set of names with prebuilt modules.
///
/// Every lookup records the name and the search path it was handed.
pub struct StaticFinder {
    modules: HashMap<String, ModuleRef>,
    pub lookups: RefCell<Vec<String>>,
    pub paths: RefCell<Vec<Option<Vec<PathBuf>>>>,
}

impl StaticFinder {
    pub fn new(names: &[&str]) -> Self {
        Self {
            modules: names
                .iter()
                .map(|n| {
                    (
                        n.to_string(),
                        Rc::new(Module {
                            name: n.to_string(),
                            deps: Vec::new(),
                        }),
                    )
                })
                .collect(),
            lookups: RefCell::new(Vec::new()),
            paths: RefCell::new(Vec::new()),
        }
    }

    pub fn get(&self, module: &str) -> ModuleRef {
        Rc::clone(&self.modules[module])
    }

    fn lookup(&self, name: &ModuleName, path: Option<&[PathBuf]>) -> Option<ModuleRef> {
        self.lookups.borrow_mut().push(name.to_string());
        self.paths.borrow_mut().push(path.map(<[PathBuf]>::to_vec));
        self.modules.get(name.as_str()).cloned()
    }
}

impl rustimport_hook::MetaPathFinder<ModuleRef> for StaticFinder {
    fn find_module(
        &self,
        name: &ModuleName,
        path: Option<&[PathBuf]>,
    ) -> Result<Option<Rc<dyn rustimport_hook::Loader<ModuleRef>>>> {
        Ok(self.lookup(name, path).map(|m| {
            Rc::new(rustimport_hook::PrebuiltLoader::new(m))
                as Rc<dyn rustimport_hook::Loader<ModuleRef>>
        }))
    }

    fn find_spec(
        &self,
        name: &ModuleName,
        path: Option<&[PathBuf]>,
        _target: Option<&ModuleRef>,
    ) -> Result<Option<rustimport_hook::ModuleSpec<ModuleRef>>> {
        Ok(self.lookup(name, path).map(|m| {
            let loader: Rc<dyn rustimport_hook::Loader<ModuleRef>> =
                Rc::new(rustimport_hook::PrebuiltLoader::new(m));
            rustimport_hook::ModuleSpec::new(name.clone(), loader)
        }))
    }
}
