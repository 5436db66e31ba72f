//! Capacity-checked path buffer.
//!
//! Composes Windows-style paths (`\` separated) regardless of the host OS,
//! counting length in UTF-16 code units the way the native APIs do. The
//! buffer always keeps room for one terminator unit.

use crate::error::LookupError;

const SEPARATOR: char = '\\';

fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

fn units(s: &str) -> usize {
    s.encode_utf16().count()
}

/// An owned path with a fixed maximum length in UTF-16 units, terminator
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuffer {
    path: String,
    capacity: usize,
}

impl PathBuffer {
    /// Seed the buffer with `root`.
    pub fn new(root: &str, capacity: usize) -> Result<Self, LookupError> {
        let buffer = Self {
            path: root.to_string(),
            capacity,
        };
        buffer.check(units(root))?;
        Ok(buffer)
    }

    /// Append `segment` as a path component.
    ///
    /// Trailing separators on the current path and leading separators on the
    /// segment collapse to a single `\`. An empty buffer takes the segment as
    /// is. On failure the buffer is left unchanged.
    pub fn append(&mut self, segment: &str) -> Result<(), LookupError> {
        let segment = segment.trim_start_matches(is_separator);
        if segment.is_empty() {
            return Ok(());
        }

        let base = self.path.trim_end_matches(is_separator);
        let joined = if self.path.is_empty() {
            segment.to_string()
        } else if base.is_empty() || (base.ends_with(':') && base.len() < self.path.len()) {
            // Keep a lone root separator (`\`, `C:\`) instead of stripping it.
            format!("{}{segment}", self.path)
        } else {
            format!("{base}{SEPARATOR}{segment}")
        };

        self.check(units(&joined))?;
        self.path = joined;
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn into_string(self) -> String {
        self.path
    }

    fn check(&self, len: usize) -> Result<(), LookupError> {
        let required = len + 1;
        if required > self.capacity {
            return Err(LookupError::CapacityExceeded {
                required,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
