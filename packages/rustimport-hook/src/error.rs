//! Error types for rustimport-hook
//!
//! The Finder only ever absorbs [`ErrorKind::NotFound`]. Every other kind
//! crosses the hook boundary unchanged and reaches the import statement that
//! triggered the lookup.
//!
//! [`ErrorKind::ModuleNotFound`] is the host's own "no participant claimed
//! this name". It is kept apart from `NotFound` so a resolver whose
//! dependency import fails surfaces that failure instead of being read as
//! "nothing to build".

use std::fmt;
use thiserror::Error;

/// Hook error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resolver has nothing buildable for this name ("not my module")
    NotFound,
    /// The host walked its whole meta path and nobody claimed the name
    ModuleNotFound,
    /// Resolution was attempted and the build step failed
    BuildFailure,
    /// Any other resolver-specific failure
    Resolver,
    /// Configuration errors
    Config,
    /// I/O errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ModuleNotFound => "module_not_found",
            ErrorKind::BuildFailure => "build_failure",
            ErrorKind::Resolver => "resolver",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hook error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct HookError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    /// Dotted name of the module the error concerns, when known
    pub module: Option<String>,
    pub message: String,
}

impl HookError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            module: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    // Convenience constructors
    pub fn not_found(module: impl Into<String>) -> Self {
        let module = module.into();
        Self::new(ErrorKind::NotFound, format!("No module named '{}'", module)).with_module(module)
    }

    pub fn no_module(module: impl Into<String>) -> Self {
        let module = module.into();
        Self::new(
            ErrorKind::ModuleNotFound,
            format!("No module named '{}'", module),
        )
        .with_module(module)
    }

    pub fn build_failure(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BuildFailure, message).with_module(module)
    }

    pub fn resolver(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resolver, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// True only for the narrowly typed "nothing to build here" signal.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Renders the error and its source chain on one line, outermost first.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut next = std::error::Error::source(self);
        while let Some(err) = next {
            out.push_str(": ");
            out.push_str(&err.to_string());
            next = err.source();
        }
        out
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        HookError::new(ErrorKind::IO, format!("IO error: {}", err)).with_source(err)
    }
}

impl From<crate::config::ConfigError> for HookError {
    fn from(err: crate::config::ConfigError) -> Self {
        HookError::config(err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HookError>;
