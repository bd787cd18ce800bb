//! Inbound adapters - hosts connecting to the hook
//!
//! Currently: PyO3 (CPython `sys.meta_path`)

#[cfg(feature = "python")]
pub mod pyo3;
