/*
 * rustimport-hook - Import Interception Layer
 *
 * Hexagonal layout:
 * - domain/         : Ports (ModuleResolver, MetaPathFinder, Loader) + ModuleName
 * - hook/           : Finder (dual protocol + re-entrancy guard), Loader, Registrar
 * - infrastructure/ : MetaPath + reference ImportSystem (native hosts, tests)
 * - adapters/       : External bindings (PyO3, sys.meta_path)
 * - config/         : YAML/Env configuration
 *
 * The hook never builds anything itself: it decides whether an external
 * resolver claims an import, guards against the resolver re-entering the
 * import machinery, and lets every failure except "not found" through.
 */

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Ports and core value types
pub mod domain;

/// Finder, Loader, Registrar
pub mod hook;

/// Host-side meta path and import machinery
pub mod infrastructure;

/// External adapters (PyO3)
pub mod adapters;

/// Configuration system
pub mod config;

/// Error types
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::HookConfig;
pub use domain::{Loader, MetaPathFinder, ModuleName, ModuleResolver, ModuleSpec, OptIn};
pub use error::{ErrorKind, HookError, Result};
pub use hook::{Finder, FinderStats, HookRegistrar, PrebuiltLoader};
pub use infrastructure::{ImportSystem, MetaPath};

// ═══════════════════════════════════════════════════════════════════════════
// Python Module Registration
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(feature = "python")]
#[pymodule]
fn rustimport_hook(py: Python, m: &PyModule) -> PyResult<()> {
    // Usage:
    //   rustimport_hook.install(rustimport.imp, not_found=ImportError)
    //
    // Classes:
    //   - Finder: sys.meta_path participant (find_module / find_spec)
    //   - Loader: hands back the module built during lookup
    //
    // Exceptions:
    //   - NotBuildableError(ImportError): default "nothing to build" signal
    adapters::pyo3::register(py, m)
}
