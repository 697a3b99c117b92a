//! palimpsest-core: the embedded source change-log engine.
//!
//! Legacy source members carry their modification history inline, as a
//! header block of tagged lines. Each entry — a *work item* — binds a
//! sequential modification index, an external ticket number, author, date
//! and free text to a run of source lines, and modified body lines encode
//! their pre-modification text after an `EX ` marker so a removal can
//! travel back in time.
//!
//! The engine is a pure in-memory transformation over a line buffer:
//! [`MemberChangeLog`] scans a member's lines into a [`WorkItemList`],
//! mutates buffer and registry together on add/remove, and reconstructs
//! tagged body lines on removal. Loading and persisting lines is left to
//! [`SourceStore`] implementations; the only other capability consumed is
//! the current system date ([`Clock`]), used as a fallback for out-of-range
//! dates.
//!
//! # Conventions
//!
//! - **Errors**: recoverable domain failures are error values
//!   ([`ChangeLogError`], [`InvalidWorkItem`]); out-of-range registry access
//!   is a programmer error and panics.
//! - **Logging**: `tracing` macros; malformed header lines `warn!` and the
//!   scan keeps going.
//! - **Threading**: single-threaded, synchronous, blocking. One
//!   [`MemberChangeLog`] instance per member; callers serialize access.

pub mod changelog;
pub mod classify;
pub mod clock;
pub mod dialect;
pub mod error;
pub mod item;
pub mod member;
pub mod reconstruct;
pub mod registry;
pub mod store;

pub use changelog::{MemberChangeLog, RemovedWorkItem, ScanIssue, ScanReport};
pub use classify::{LineClass, classify};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dialect::{IN_WORK_GLYPH, STARTING_INDEX, SourceDialect};
pub use error::{ChangeLogError, ErrorCode, HeaderField, InvalidWorkItem};
pub use item::{SANE_DATE_MAX, SANE_DATE_MIN, WorkItem};
pub use member::{InvalidMemberPath, MemberName};
pub use reconstruct::{Reconstruction, reconstruct_line};
pub use registry::WorkItemList;
pub use store::{MemoryStore, SourceStore, lines_from_text, text_from_lines};
