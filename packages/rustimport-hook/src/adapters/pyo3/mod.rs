//! PyO3 adapter - CPython import hook
//!
//! Modules:
//! - `resolver`: Python callable as a `ModuleResolver`, PyErr round-tripping
//! - `finder`: `Finder` / `Loader` classes placed on `sys.meta_path`
//!
//! ## Usage from Python
//!
//! ```python
//! import rustimport
//! import rustimport_hook
//!
//! # rustimport.imp raises plain ImportError for "nothing to build"
//! rustimport_hook.install(rustimport.imp, not_found=ImportError)
//!
//! import my_rust_module  # built on first import
//! ```

pub mod finder;
pub mod resolver;

use pyo3::exceptions::{PyImportError, PyValueError};
use pyo3::prelude::*;
use pyo3::sync::GILOnceCell;
use pyo3::types::{PyList, PyType};
use tracing::{info, warn};

use crate::config::HookConfig;

pub use finder::{PyFinder, PyLoader};
pub use resolver::{into_py_err, PyResolver};

pyo3::create_exception!(
    rustimport_hook,
    NotBuildableError,
    PyImportError,
    "Raised by a resolver that has nothing to build for a module name."
);

/// The process-wide Finder, built by the first `install` call.
static FINDER: GILOnceCell<Py<PyFinder>> = GILOnceCell::new();

/// Builds the process-wide Finder on first use and inserts it at
/// `sys.meta_path[0]`.
///
/// Every call inserts again; nothing is deduplicated. Arguments of later
/// calls are ignored because the Finder already exists. Returns `None` when
/// `RUSTIMPORT_HOOK_DISABLE` is set.
#[pyfunction]
#[pyo3(signature = (resolver, not_found = None))]
pub fn install(
    py: Python<'_>,
    resolver: PyObject,
    not_found: Option<&PyType>,
) -> PyResult<Option<Py<PyFinder>>> {
    let finder = FINDER.get_or_try_init(py, || -> PyResult<Py<PyFinder>> {
        let config = HookConfig::from_env().map_err(|e| PyValueError::new_err(e.to_string()))?;
        Py::new(py, PyFinder::build(py, resolver, not_found, config))
    })?;

    if !finder.borrow(py).enabled() {
        info!("import hook disabled by environment, sys.meta_path untouched");
        return Ok(None);
    }

    let meta_path: &PyList = py.import("sys")?.getattr("meta_path")?.downcast()?;
    if meta_path.contains(finder)? {
        warn!("import hook installed again; the Finder now appears more than once");
    }
    meta_path.insert(0, finder)?;

    Ok(Some(finder.clone_ref(py)))
}

/// The Finder created by `install`, if any.
#[pyfunction]
pub fn installed_finder(py: Python<'_>) -> Option<Py<PyFinder>> {
    FINDER.get(py).map(|finder| finder.clone_ref(py))
}

pub fn register(py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyFinder>()?;
    m.add_class::<PyLoader>()?;
    m.add("NotBuildableError", py.get_type::<NotBuildableError>())?;
    m.add_function(wrap_pyfunction!(install, m)?)?;
    m.add_function(wrap_pyfunction!(installed_finder, m)?)?;
    Ok(())
}
