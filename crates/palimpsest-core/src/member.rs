//! Member identification.
//!
//! A source member is addressed as `LIBRARY/FILE(MEMBER)`. The engine only
//! ever uses this for error messages and log context; it never changes
//! behavior based on where a member lives.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Qualified name of a source member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberName {
    /// Library holding the source file.
    pub library: String,
    /// Source physical file.
    pub file: String,
    /// Member within the file.
    pub member: String,
}

impl MemberName {
    /// Build a qualified member name. Components are uppercased to match
    /// how the host system reports them.
    #[must_use]
    pub fn new(library: &str, file: &str, member: &str) -> Self {
        Self {
            library: library.to_uppercase(),
            file: file.to_uppercase(),
            member: member.to_uppercase(),
        }
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}({})", self.library, self.file, self.member)
    }
}

/// Error returned when a member path string is not `LIB/FILE(MBR)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid member path '{0}': expected LIBRARY/FILE(MEMBER)")]
pub struct InvalidMemberPath(pub String);

impl FromStr for MemberName {
    type Err = InvalidMemberPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InvalidMemberPath(s.to_string());
        let (library, rest) = s.split_once('/').ok_or_else(bad)?;
        let (file, rest) = rest.split_once('(').ok_or_else(bad)?;
        let member = rest.strip_suffix(')').ok_or_else(bad)?;
        if library.is_empty() || file.is_empty() || member.is_empty() {
            return Err(bad());
        }
        Ok(Self::new(library, file, member))
    }
}
