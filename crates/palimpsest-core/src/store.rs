//! Source load/store collaborators.
//!
//! The engine itself is a pure in-memory transformation; getting raw lines
//! in and rewritten lines out is someone else's job. That someone implements
//! [`SourceStore`]. The in-memory implementation here backs tests and
//! embedding; file- or host-backed adapters live with their callers.

use crate::member::MemberName;
use anyhow::{Result, bail};
use std::collections::HashMap;

/// Loads and persists the raw lines of a source member.
///
/// Implementations are synchronous and blocking; callers serialize access
/// themselves.
pub trait SourceStore {
    /// Fetch the member's lines, in order.
    fn load(&mut self, member: &MemberName) -> Result<Vec<String>>;

    /// Replace the member's lines.
    fn store(&mut self, member: &MemberName, lines: &[String]) -> Result<()>;
}

/// A [`SourceStore`] holding members in memory, keyed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a member with lines.
    pub fn insert(&mut self, member: &MemberName, lines: Vec<String>) {
        self.members.insert(member.to_string(), lines);
    }

    /// Current lines of a member, if present.
    #[must_use]
    pub fn get(&self, member: &MemberName) -> Option<&[String]> {
        self.members.get(&member.to_string()).map(Vec::as_slice)
    }
}

impl SourceStore for MemoryStore {
    fn load(&mut self, member: &MemberName) -> Result<Vec<String>> {
        match self.members.get(&member.to_string()) {
            Some(lines) => Ok(lines.clone()),
            None => bail!("member {member} not found"),
        }
    }

    fn store(&mut self, member: &MemberName, lines: &[String]) -> Result<()> {
        self.members
            .insert(member.to_string(), lines.to_vec());
        Ok(())
    }
}

/// Convenience for adapters: split raw text into the line vector the engine
/// expects, without the trailing empty line a final newline would produce.
#[must_use]
pub fn lines_from_text(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Inverse of [`lines_from_text`]: join lines with a trailing newline.
#[must_use]
pub fn text_from_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
