//! The member change log: owns the source buffer and the work-item registry,
//! and keeps the two consistent through every mutation.
//!
//! A member instance moves through a simple lifecycle:
//!
//! ```text
//! Unloaded --load_source--> Scanned --put/add/remove--> Dirty --persist--> Clean
//! ```
//!
//! `load_source` while dirty discards unsaved edits; there is no merge.
//! One instance must not be mutated concurrently — callers serialize.

use crate::classify::{LineClass, classify};
use crate::clock::{Clock, SystemClock};
use crate::dialect::{INDEX_WIDTH, STARTING_INDEX, SourceDialect, col_rest};
use crate::error::{ChangeLogError, InvalidWorkItem};
use crate::item::WorkItem;
use crate::member::MemberName;
use crate::reconstruct::{Reconstruction, reconstruct_line};
use crate::registry::WorkItemList;
use crate::store::SourceStore;
use anyhow::Context;
use serde::Serialize;
use tracing::{debug, warn};

/// Result of scanning a member's header block.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Work items registered by the scan.
    pub work_items: usize,
    /// Header-shaped lines that did not parse. Non-fatal; the scan walked
    /// past them.
    pub issues: Vec<ScanIssue>,
}

/// One malformed header line encountered during a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanIssue {
    /// Buffer line index of the offending line.
    pub line: usize,
    /// Why it did not parse.
    pub error: InvalidWorkItem,
}

/// Result of removing a work item.
#[derive(Debug, Clone, Serialize)]
pub struct RemovedWorkItem {
    /// The entry that was removed from the header block.
    pub item: WorkItem,
    /// Header lines deleted (header plus continuation text).
    pub lines_removed: usize,
    /// Body lines rewritten to their pre-modification state.
    pub lines_rewritten: usize,
    /// Body lines deleted because they had no pre-modification state.
    pub lines_deleted: usize,
    /// Body lines tagged with the removed index that could not be reverted
    /// safely. Left untouched; positions are as of before cleanup deletions.
    pub not_revertible: Vec<usize>,
}

/// The embedded change log of one source member.
#[derive(Debug)]
pub struct MemberChangeLog {
    member: MemberName,
    dialect: SourceDialect,
    clock: Box<dyn Clock>,
    lines: Vec<String>,
    items: WorkItemList,
    work_items_end: usize,
    dirty: bool,
}

impl MemberChangeLog {
    /// A change log for `member`, using the local system clock for date
    /// fallbacks.
    #[must_use]
    pub fn new(member: MemberName, dialect: SourceDialect) -> Self {
        Self::with_clock(member, dialect, Box::new(SystemClock))
    }

    /// A change log with an explicit clock capability.
    #[must_use]
    pub fn with_clock(member: MemberName, dialect: SourceDialect, clock: Box<dyn Clock>) -> Self {
        Self {
            member,
            dialect,
            clock,
            lines: Vec::new(),
            items: WorkItemList::new(),
            work_items_end: 0,
            dirty: false,
        }
    }

    /// The member this change log belongs to.
    #[must_use]
    pub const fn member(&self) -> &MemberName {
        &self.member
    }

    /// The member's source dialect.
    #[must_use]
    pub const fn dialect(&self) -> SourceDialect {
        self.dialect
    }

    /// Replace the buffer with freshly loaded source and rescan.
    ///
    /// Unsaved edits are discarded; there is no merge.
    pub fn load_source(&mut self, lines: Vec<String>) -> ScanReport {
        self.lines = lines;
        self.items.clear();
        self.work_items_end = 0;
        self.dirty = false;
        self.scan()
    }

    /// Load the member through a [`SourceStore`] and rescan.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot produce the member's lines.
    pub fn load_with(&mut self, store: &mut dyn SourceStore) -> anyhow::Result<ScanReport> {
        let lines = store
            .load(&self.member)
            .with_context(|| format!("loading {}", self.member))?;
        Ok(self.load_source(lines))
    }

    /// Hand the rewritten buffer to a [`SourceStore`], gated by the dirty
    /// flag. Returns `false` (and stores nothing) when there is nothing to
    /// persist.
    ///
    /// # Errors
    ///
    /// Fails when the store rejects the write; the dirty flag is kept so the
    /// caller can retry.
    pub fn persist_with(&mut self, store: &mut dyn SourceStore) -> anyhow::Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        store
            .store(&self.member, &self.lines)
            .with_context(|| format!("persisting {}", self.member))?;
        self.dirty = false;
        Ok(true)
    }

    /// Scan the buffer into the work-item registry.
    ///
    /// Walks lines from the top. Header-shaped lines are parsed and
    /// registered; the first end-of-header line after at least one entry
    /// fixes the header/body boundary. Malformed header lines are logged,
    /// collected into the report, and walked past — legacy behavior is to
    /// keep going, not to fail the member.
    pub fn scan(&mut self) -> ScanReport {
        self.items.clear();
        let mut issues = Vec::new();
        let mut seen_entry = false;
        let mut end = None;

        for (pos, line) in self.lines.iter().enumerate() {
            match classify(line, self.dialect, seen_entry) {
                LineClass::HeaderEntry => {
                    seen_entry = true;
                    match WorkItem::parse(line, self.dialect, &self.member) {
                        Ok(item) => self.items.add(item, pos),
                        Err(error) => {
                            warn!(
                                member = %self.member,
                                line = pos,
                                %error,
                                "skipping malformed work item header"
                            );
                            issues.push(ScanIssue { line: pos, error });
                        }
                    }
                }
                LineClass::EndOfHeader => {
                    end = Some(pos);
                    break;
                }
                LineClass::Other => {}
            }
        }

        if seen_entry {
            self.work_items_end = end.unwrap_or(self.lines.len());
        }
        self.attach_text();

        debug!(
            member = %self.member,
            work_items = self.items.len(),
            work_items_end = self.work_items_end,
            "scanned member"
        );
        ScanReport {
            work_items: self.items.len(),
            issues,
        }
    }

    /// Register a new work item under the next free modification index.
    ///
    /// The index is the last item's plus one, or [`STARTING_INDEX`] for an
    /// empty header block.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`add_work_item`](Self::add_work_item).
    pub fn put_work_item(
        &mut self,
        number: i64,
        user: &str,
        date: u32,
        text: &str,
        in_work: bool,
    ) -> Result<(), ChangeLogError> {
        let index = self
            .items
            .last()
            .map_or(STARTING_INDEX, |item| item.index() + 1);
        self.add_work_item(index, number, user, date, text, in_work)
    }

    /// Register a new work item under an explicit modification index.
    ///
    /// Renders the entry and splices it into the buffer at the end of the
    /// header block. `text` may span several lines; each becomes one
    /// continuation line.
    ///
    /// # Errors
    ///
    /// - [`ChangeLogError::IndexBelowMinimum`] when `index` is below
    ///   [`STARTING_INDEX`].
    /// - [`ChangeLogError::DuplicateNumber`] when `number` is already bound.
    ///
    /// Neither failure mutates the member.
    pub fn add_work_item(
        &mut self,
        index: u32,
        number: i64,
        user: &str,
        date: u32,
        text: &str,
        in_work: bool,
    ) -> Result<(), ChangeLogError> {
        if index < STARTING_INDEX {
            return Err(ChangeLogError::IndexBelowMinimum { index });
        }
        if self.items.contains(number).is_some() {
            return Err(ChangeLogError::DuplicateNumber {
                member: self.member.to_string(),
                number,
            });
        }

        let mut item = WorkItem::new(index, number, user, date, in_work, self.clock.as_ref());
        for line in text.lines() {
            item.append_text(line);
        }

        let rendered = item.render_source(self.dialect);
        let at = self.work_items_end;
        let count = rendered.len();
        self.lines.splice(at..at, rendered);
        self.items.add(item, at);
        self.work_items_end += count;
        self.dirty = true;

        debug!(member = %self.member, index, number, "added work item");
        Ok(())
    }

    /// Remove the work item with this ticket number.
    ///
    /// Deletes the item's header and continuation lines; later items move up
    /// accordingly. With `clean_all`, the body is additionally swept for
    /// lines tagged with the removed item's index and each is reverted to
    /// its pre-modification state — rewritten, deleted when it had no prior
    /// state, or left untouched and reported when reverting would mean
    /// guessing.
    ///
    /// # Errors
    ///
    /// [`ChangeLogError::NotFound`] when no item carries `number`; the
    /// member is not mutated.
    pub fn remove_work_item(
        &mut self,
        number: i64,
        clean_all: bool,
    ) -> Result<RemovedWorkItem, ChangeLogError> {
        let slot = self
            .items
            .contains(number)
            .ok_or_else(|| ChangeLogError::NotFound {
                member: self.member.to_string(),
                number,
            })?;

        let (item, position) = self.items.remove(slot);
        let owned_end = if slot < self.items.len() {
            self.items.position(slot)
        } else {
            self.work_items_end
        };
        let count = owned_end - position;

        self.lines.drain(position..owned_end);
        self.items.shift_positions(slot, -(count as isize));
        self.work_items_end -= count;
        self.dirty = true;

        let mut removed = RemovedWorkItem {
            item,
            lines_removed: count,
            lines_rewritten: 0,
            lines_deleted: 0,
            not_revertible: Vec::new(),
        };
        if clean_all {
            self.clean_tagged_lines(&mut removed);
        }

        debug!(
            member = %self.member,
            number,
            lines_removed = removed.lines_removed,
            lines_rewritten = removed.lines_rewritten,
            lines_deleted = removed.lines_deleted,
            "removed work item"
        );
        Ok(removed)
    }

    /// Drop the buffer and registry. The instance can be reloaded later.
    pub fn dispose(&mut self) {
        self.lines.clear();
        self.items.clear();
        self.work_items_end = 0;
        self.dirty = false;
    }

    /// The buffer as it stands, header included.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// First body line index; everything before it is header block.
    #[must_use]
    pub const fn work_items_end(&self) -> usize {
        self.work_items_end
    }

    /// True when the buffer has unpersisted edits.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of registered work items.
    #[must_use]
    pub fn work_item_count(&self) -> usize {
        self.items.len()
    }

    /// Iterate registered work items with their header line positions.
    pub fn work_items(&self) -> impl Iterator<Item = (&WorkItem, usize)> {
        self.items.iter()
    }

    /// The work item with this ticket number, if registered.
    #[must_use]
    pub fn find(&self, number: i64) -> Option<&WorkItem> {
        self.items.contains(number).map(|slot| self.items.get(slot))
    }

    /// Attach the buffer lines between each header and the next to the
    /// owning item as free text, stripped of the dialect's text-column
    /// prefix.
    fn attach_text(&mut self) {
        let text_col = self.dialect.text_col();
        for i in 0..self.items.len() {
            let from = self.items.position(i) + 1;
            let to = if i + 1 < self.items.len() {
                self.items.position(i + 1)
            } else {
                self.work_items_end
            };
            for line in &self.lines[from..to] {
                self.items.get_mut(i).append_text(col_rest(line, text_col));
            }
        }
    }

    /// Sweep the body for lines tagged with the removed item's index and
    /// revert each to its pre-modification state.
    fn clean_tagged_lines(&mut self, removed: &mut RemovedWorkItem) {
        let index = removed.item.index();
        let tag = format!("{index:0width$}", width = INDEX_WIDTH);

        let decisions: Vec<(usize, Reconstruction)> = (self.work_items_end..self.lines.len())
            .filter(|&pos| leading_token(&self.lines[pos], self.dialect) == Some(tag.as_str()))
            .map(|pos| (pos, reconstruct_line(&self.lines[pos], index, self.dialect)))
            .collect();

        // Apply bottom-up so deletions do not shift pending positions.
        for (pos, decision) in decisions.into_iter().rev() {
            match decision {
                Reconstruction::Rewritten(text) => {
                    self.lines[pos] = text;
                    removed.lines_rewritten += 1;
                }
                Reconstruction::DeleteLine => {
                    self.lines.remove(pos);
                    removed.lines_deleted += 1;
                }
                Reconstruction::NotRevertible => {
                    warn!(
                        member = %self.member,
                        line = pos,
                        "tagged line is not revertible; leaving it unchanged"
                    );
                    removed.not_revertible.push(pos);
                }
                Reconstruction::Unchanged => {}
            }
        }
        removed.not_revertible.reverse();
    }
}

/// First whitespace-delimited token of a body line, behind the dialect's
/// line prefix if present.
fn leading_token<'a>(line: &'a str, dialect: SourceDialect) -> Option<&'a str> {
    let body = line.strip_prefix(dialect.line_prefix()).unwrap_or(line);
    body.split_whitespace().next()
}
