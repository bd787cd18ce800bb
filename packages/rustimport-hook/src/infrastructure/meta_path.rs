use std::fmt;
use std::rc::Rc;

use crate::domain::MetaPathFinder;

/// The host's ordered list of lookup participants.
///
/// Consulted front to back for every import; the first participant that
/// returns a result wins.
pub struct MetaPath<M> {
    finders: Vec<Rc<dyn MetaPathFinder<M>>>,
}

impl<M> MetaPath<M> {
    pub fn new() -> Self {
        Self {
            finders: Vec::new(),
        }
    }

    /// Inserts at `index`, clamped to the current length.
    pub fn insert(&mut self, index: usize, finder: Rc<dyn MetaPathFinder<M>>) {
        let index = index.min(self.finders.len());
        self.finders.insert(index, finder);
    }

    pub fn push(&mut self, finder: Rc<dyn MetaPathFinder<M>>) {
        self.finders.push(finder);
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn MetaPathFinder<M>>> {
        self.finders.iter()
    }

    /// Owned copy of the participant list, so a walk can run without holding
    /// a borrow of the list while participants execute.
    pub fn snapshot(&self) -> Vec<Rc<dyn MetaPathFinder<M>>> {
        self.finders.clone()
    }

    /// Index of the first entry that is the same object as `finder`.
    pub fn position_of<T: ?Sized>(&self, finder: &Rc<T>) -> Option<usize> {
        let target = Rc::as_ptr(finder) as *const ();
        self.finders
            .iter()
            .position(|entry| Rc::as_ptr(entry) as *const () == target)
    }

    /// Number of entries that are the same object as `finder`.
    pub fn count_of<T: ?Sized>(&self, finder: &Rc<T>) -> usize {
        let target = Rc::as_ptr(finder) as *const ();
        self.finders
            .iter()
            .filter(|entry| Rc::as_ptr(entry) as *const () == target)
            .count()
    }

    /// Drops every participant. Used to reset the chain between test cases.
    pub fn clear(&mut self) {
        self.finders.clear();
    }
}

impl<M> Default for MetaPath<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MetaPath<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaPath")
            .field("len", &self.finders.len())
            .finish()
    }
}
