//! Source dialects and their column tables.
//!
//! A member's language family determines where the change-log header fields
//! live on a line and how continuation lines are prefixed. The two families
//! share one layout, shifted by the leading `--` that embedded-SQL members
//! need to keep their header lines inert:
//!
//! ```text
//! fixed:   IIII M *  UUUUUU   YYYYMMDD WORKITEM NNNN
//! sql:   --IIII M *  UUUUUU   YYYYMMDD WORKITEM NNNN
//! ```
//!
//! All offsets are 0-based **character** columns, not byte offsets: the
//! in-work glyph `§` is multi-byte in UTF-8 and legacy members carry it in
//! the marker column, so every column access here goes through the
//! char-indexed helpers at the bottom of this module.

use serde::Serialize;

/// The lowest modification index a work item may carry.
pub const STARTING_INDEX: u32 = 9000;

/// Marker glyph flagging a work item (or a line) as still in work.
pub const IN_WORK_GLYPH: char = '§';

/// Width of the modification-index field.
pub const INDEX_WIDTH: usize = 4;

/// Width of the user field.
pub const USER_WIDTH: usize = 6;

/// Width of the date field (`yyyymmdd`).
pub const DATE_WIDTH: usize = 8;

/// Token separating the header fields from the ticket number.
pub const NUMBER_TOKEN: &str = "WORKITEM";

/// The language family of a source member.
///
/// Selected once per member and passed into every operation that touches
/// line layout. Carries the column offsets and tokens as data; there is no
/// per-dialect behavior beyond what these tables describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDialect {
    /// Fixed-column program source (RPG, CL).
    Fixed,
    /// Comment-style embedded SQL source.
    Sql,
}

impl SourceDialect {
    /// Prefix every header and continuation line starts with.
    #[must_use]
    pub const fn line_prefix(self) -> &'static str {
        match self {
            Self::Fixed => "",
            Self::Sql => "--",
        }
    }

    /// Column of the first digit of the modification index.
    #[must_use]
    pub const fn index_col(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Sql => 2,
        }
    }

    /// Column of the in-work marker.
    #[must_use]
    pub const fn marker_col(self) -> usize {
        self.index_col() + INDEX_WIDTH
    }

    /// Column of the first character of the user field.
    #[must_use]
    pub const fn user_col(self) -> usize {
        // marker, then "* "
        self.marker_col() + 3
    }

    /// Column of the first digit of the date field.
    #[must_use]
    pub const fn date_col(self) -> usize {
        self.user_col() + USER_WIDTH + 2
    }

    /// Column the ticket number starts at. The field is variable-width and
    /// runs to the end of the line.
    #[must_use]
    pub const fn number_col(self) -> usize {
        // date, blank, token, blank
        self.date_col() + DATE_WIDTH + NUMBER_TOKEN.len() + 2
    }

    /// Column free text starts at on continuation lines.
    #[must_use]
    pub const fn text_col(self) -> usize {
        match self {
            Self::Fixed => 8,
            Self::Sql => 9,
        }
    }

    /// Prefix rendered in front of every continuation line.
    #[must_use]
    pub const fn continuation_prefix(self) -> &'static str {
        match self {
            Self::Fixed => "        ",
            Self::Sql => "--       ",
        }
    }
}

// ---------------------------------------------------------------------------
// Char-indexed column access
// ---------------------------------------------------------------------------

/// The character at column `col`, if the line is long enough.
#[must_use]
pub(crate) fn char_at(line: &str, col: usize) -> Option<char> {
    line.chars().nth(col)
}

/// The characters in columns `[start, end)`, possibly shorter when the line
/// ends early.
#[must_use]
pub(crate) fn col_slice(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Everything from column `start` to the end of the line.
#[must_use]
pub(crate) fn col_rest(line: &str, start: usize) -> String {
    line.chars().skip(start).collect()
}

/// True when every character in columns `[0, end)` is blank (a line shorter
/// than `end` counts if its existing columns are blank).
#[must_use]
pub(crate) fn blank_through(line: &str, end: usize) -> bool {
    line.chars().take(end).all(|c| c == ' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_tables_line_up_across_dialects() {
        // The SQL layout is the fixed layout shifted by the `--` prefix.
        let shift = SourceDialect::Sql.line_prefix().chars().count();
        assert_eq!(
            SourceDialect::Sql.index_col(),
            SourceDialect::Fixed.index_col() + shift
        );
        assert_eq!(
            SourceDialect::Sql.number_col(),
            SourceDialect::Fixed.number_col() + shift
        );
    }

    #[test]
    fn continuation_prefix_width_matches_text_col() {
        for dialect in [SourceDialect::Fixed, SourceDialect::Sql] {
            assert_eq!(
                dialect.continuation_prefix().chars().count(),
                dialect.text_col()
            );
        }
    }

    #[test]
    fn col_slice_is_char_indexed() {
        // Marker glyph is multi-byte; byte slicing would split it.
        let line = "9000§* QSECOFR";
        assert_eq!(char_at(line, 4), Some('§'));
        assert_eq!(col_slice(line, 0, 4), "9000");
        assert_eq!(col_slice(line, 7, 14), "QSECOFR");
    }

    #[test]
    fn blank_through_tolerates_short_lines() {
        assert!(blank_through("", 8));
        assert!(blank_through("    ", 8));
        assert!(!blank_through("    x", 8));
    }
}
