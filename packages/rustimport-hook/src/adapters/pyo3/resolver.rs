//! Python callable as a `ModuleResolver`

use pyo3::exceptions::{PyImportError, PyModuleNotFoundError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyType};

use crate::domain::{ModuleName, ModuleResolver, OptIn};
use crate::error::{ErrorKind, HookError, Result};

/// Calls `callable(fullname, opt_in=True)`.
///
/// An exception that is an instance of `not_found` becomes
/// `ErrorKind::NotFound`; anything else becomes `ErrorKind::Resolver`. In
/// both cases the original `PyErr` is kept as the error source so
/// [`into_py_err`] can re-raise it untouched.
pub struct PyResolver {
    callable: PyObject,
    not_found: Py<PyType>,
}

impl PyResolver {
    pub fn new(callable: PyObject, not_found: Py<PyType>) -> Self {
        Self {
            callable,
            not_found,
        }
    }

    pub fn not_found_type(&self, py: Python<'_>) -> Py<PyType> {
        self.not_found.clone_ref(py)
    }
}

impl ModuleResolver for PyResolver {
    type Module = PyObject;

    fn resolve(&self, name: &ModuleName, opt_in: OptIn) -> Result<PyObject> {
        Python::with_gil(|py| {
            let fullname = name.as_str();
            let kwargs = PyDict::new(py);
            kwargs
                .set_item("opt_in", opt_in.is_required())
                .map_err(|e| HookError::resolver("Failed to build resolver kwargs").with_source(e))?;

            self.callable
                .call(py, (fullname,), Some(kwargs))
                .map_err(|err| {
                    let classified = if err.is_instance(py, self.not_found.as_ref(py)) {
                        HookError::not_found(fullname)
                    } else {
                        HookError::resolver(format!("Resolver raised: {}", err))
                            .with_module(fullname)
                    };
                    classified.with_source(err)
                })
        })
    }
}

/// Turns a propagated hook error back into a Python exception.
///
/// Errors that came from Python re-raise the very same exception object.
pub fn into_py_err(err: HookError) -> PyErr {
    let HookError {
        source,
        kind,
        message,
        ..
    } = err;

    match (source.map(|s| s.downcast::<PyErr>()), kind) {
        (Some(Ok(py_err)), _) => *py_err,
        (None, ErrorKind::ModuleNotFound) => PyModuleNotFoundError::new_err(message),
        (Some(Err(other)), _) => PyImportError::new_err(format!("{}: {}", message, other)),
        (None, _) => PyImportError::new_err(message),
    }
}
