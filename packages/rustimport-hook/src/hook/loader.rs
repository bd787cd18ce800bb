use crate::domain::{Loader, ModuleName, ModuleSpec};

/// Loader for a module that the resolver already built during lookup.
///
/// Every protocol step hands back a clone of the same stored handle; nothing
/// is recreated or mutated here.
#[derive(Debug, Clone)]
pub struct PrebuiltLoader<M> {
    module: M,
}

impl<M: Clone> PrebuiltLoader<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &M {
        &self.module
    }
}

impl<M: Clone> Loader<M> for PrebuiltLoader<M> {
    fn load_module(&self, _name: &ModuleName) -> M {
        self.module.clone()
    }

    fn create_module(&self, _spec: &ModuleSpec<M>) -> M {
        self.module.clone()
    }

    // Already populated by the resolver.
    fn exec_module(&self, _module: &M) {}
}
