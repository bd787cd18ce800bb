//! `Finder` / `Loader` classes for CPython's `sys.meta_path`

use std::path::PathBuf;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyType};
use tracing::trace;

use crate::adapters::pyo3::resolver::{into_py_err, PyResolver};
use crate::adapters::pyo3::NotBuildableError;
use crate::config::HookConfig;
use crate::domain::ModuleName;
use crate::hook::{Finder, PrebuiltLoader};

/// Meta path finder delegating to a Python resolver callable.
///
/// Example:
/// ```python
/// import sys
/// import rustimport
/// from rustimport_hook import Finder
///
/// sys.meta_path.insert(0, Finder(rustimport.imp, not_found=ImportError))
/// ```
#[pyclass(module = "rustimport_hook", name = "Finder")]
pub struct PyFinder {
    inner: Finder<PyResolver>,
}

impl PyFinder {
    pub fn build(
        py: Python<'_>,
        resolver: PyObject,
        not_found: Option<&PyType>,
        config: HookConfig,
    ) -> Self {
        let not_found: Py<PyType> = not_found
            .unwrap_or_else(|| py.get_type::<NotBuildableError>())
            .into();

        Self {
            inner: Finder::with_config(PyResolver::new(resolver, not_found), config),
        }
    }

    pub fn enabled(&self) -> bool {
        self.inner.config().enabled
    }

    /// Parses the host's name and search path, then runs the shared claim
    /// routine. Names that are not dotted identifiers get "no opinion".
    fn claim(&self, fullname: &str, path: Option<&PyAny>) -> PyResult<Option<PyObject>> {
        let name = match ModuleName::parse(fullname) {
            Ok(name) => name,
            Err(_) => {
                trace!(module = fullname, "not a dotted identifier, no opinion");
                return Ok(None);
            }
        };

        let search_path = path.map(extract_search_path);
        self.inner
            .attempt_claim(&name, search_path.as_deref())
            .map_err(into_py_err)
    }
}

/// `path` is a list of str for regular packages, an iterable
/// `_NamespacePath` for namespace packages.
fn extract_search_path(path: &PyAny) -> Vec<PathBuf> {
    match path.iter() {
        Ok(items) => items
            .filter_map(|item| item.ok()?.extract::<PathBuf>().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[pymethods]
impl PyFinder {
    #[new]
    #[pyo3(signature = (resolver, not_found = None, skip_packages = None))]
    fn new(
        py: Python<'_>,
        resolver: PyObject,
        not_found: Option<&PyType>,
        skip_packages: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let mut config = HookConfig::from_env().map_err(|e| PyValueError::new_err(e.to_string()))?;
        if let Some(skip) = skip_packages {
            config.skip_packages = skip;
            config
                .validate()
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
        }
        Ok(Self::build(py, resolver, not_found, config))
    }

    /// Legacy protocol: a `Loader` or `None`.
    #[pyo3(signature = (fullname, path = None))]
    fn find_module(
        &self,
        py: Python<'_>,
        fullname: &str,
        path: Option<&PyAny>,
    ) -> PyResult<Option<Py<PyLoader>>> {
        match self.claim(fullname, path)? {
            Some(module) => Ok(Some(Py::new(py, PyLoader::new(module))?)),
            None => Ok(None),
        }
    }

    /// Modern protocol: an `importlib.machinery.ModuleSpec` or `None`.
    #[pyo3(signature = (fullname, path = None, target = None))]
    fn find_spec(
        &self,
        py: Python<'_>,
        fullname: &str,
        path: Option<&PyAny>,
        target: Option<&PyAny>,
    ) -> PyResult<Option<PyObject>> {
        if target.is_some() {
            trace!(module = fullname, "reload requested, resolving afresh");
        }

        let module = match self.claim(fullname, path)? {
            Some(module) => module,
            None => return Ok(None),
        };

        let loader = Py::new(py, PyLoader::new(module))?;
        let spec = py
            .import("importlib.machinery")?
            .getattr("ModuleSpec")?
            .call1((fullname, loader))?;
        Ok(Some(spec.into()))
    }

    /// True only while a lookup is on the stack.
    #[getter]
    fn in_progress(&self) -> bool {
        self.inner.in_progress()
    }

    #[getter]
    fn depth(&self) -> usize {
        self.inner.depth()
    }

    #[getter]
    fn not_found(&self, py: Python<'_>) -> Py<PyType> {
        self.inner.resolver().not_found_type(py)
    }

    fn stats(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self.inner.stats();
        let dict = PyDict::new(py);
        dict.set_item("claimed", stats.claimed)?;
        dict.set_item("not_found", stats.not_found)?;
        dict.set_item("failed", stats.failed)?;
        dict.set_item("reentry_skips", stats.reentry_skips)?;
        dict.set_item("skipped_by_config", stats.skipped_by_config)?;
        Ok(dict.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "<rustimport_hook.Finder in_progress={} skip_packages={:?}>",
            self.inner.in_progress(),
            self.inner.config().skip_packages
        )
    }
}

/// Hands back the module object the resolver built during lookup.
#[pyclass(module = "rustimport_hook", name = "Loader")]
pub struct PyLoader {
    inner: PrebuiltLoader<PyObject>,
}

impl PyLoader {
    pub fn new(module: PyObject) -> Self {
        Self {
            inner: PrebuiltLoader::new(module),
        }
    }
}

#[pymethods]
impl PyLoader {
    /// Legacy protocol. PEP 302 loaders must leave the module in
    /// `sys.modules`; an entry placed there by the resolver is kept.
    fn load_module(&self, py: Python<'_>, fullname: &str) -> PyResult<PyObject> {
        let modules = py.import("sys")?.getattr("modules")?;
        let entry = modules.call_method1("setdefault", (fullname, self.inner.module().clone_ref(py)))?;
        Ok(entry.into())
    }

    fn create_module(&self, py: Python<'_>, _spec: &PyAny) -> PyObject {
        self.inner.module().clone_ref(py)
    }

    // Already populated by the resolver.
    fn exec_module(&self, _module: &PyAny) {}

    fn __repr__(&self, py: Python<'_>) -> String {
        let module = self.inner.module().as_ref(py);
        match module.repr() {
            Ok(r) => format!("<rustimport_hook.Loader module={}>", r),
            Err(_) => "<rustimport_hook.Loader>".to_string(),
        }
    }
}
