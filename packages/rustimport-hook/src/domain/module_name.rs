use std::fmt;
use std::str::FromStr;

use crate::error::{HookError, Result};

/// A fully-qualified, absolute dotted module name as handed over by the host
/// import machinery (`pkg.sub.leaf`).
///
/// Construction validates the shape only: non-empty segments, each an
/// identifier. Relative names never reach a meta path participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName {
    dotted: String,
    segments: Vec<String>,
}

impl ModuleName {
    pub fn parse(dotted: &str) -> Result<Self> {
        if dotted.is_empty() {
            return Err(HookError::resolver("Empty module name"));
        }

        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
            return Err(HookError::resolver(format!(
                "Invalid module name '{}': bad segment '{}'",
                dotted, bad
            ))
            .with_module(dotted));
        }

        Ok(Self::from_segments(segments))
    }

    fn from_segments(segments: Vec<String>) -> Self {
        Self {
            dotted: segments.join("."),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Top-level package (`pkg` for `pkg.sub.leaf`).
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    pub fn parent(&self) -> Option<ModuleName> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self::from_segments(
            self.segments[..self.segments.len() - 1].to_vec(),
        ))
    }
}

/// Python-style identifier check, ASCII plus any non-ASCII letter.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl FromStr for ModuleName {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}
