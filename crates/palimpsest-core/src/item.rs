//! One change-log entry: parse, construct, render.

use crate::clock::Clock;
use crate::dialect::{
    DATE_WIDTH, IN_WORK_GLYPH, INDEX_WIDTH, NUMBER_TOKEN, SourceDialect, USER_WIDTH, char_at,
    col_rest, col_slice,
};
use crate::error::{HeaderField, InvalidWorkItem};
use crate::member::MemberName;
use serde::Serialize;

/// Lowest supplied date the engine accepts as-is (`yyyymmdd`).
pub const SANE_DATE_MIN: u32 = 20_000_101;

/// Highest supplied date the engine accepts as-is. Inherited verbatim from
/// the host tooling this engine replaces; dates past it fall back to the
/// clock like any other out-of-range value.
pub const SANE_DATE_MAX: u32 = 20_203_112;

/// An inline, line-tagged record of one historical source modification.
///
/// The `number` is the external ticket the change was done under and is the
/// key callers use; the `index` is the structural tag burned into modified
/// source lines to associate them with this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    index: u32,
    number: i64,
    user: String,
    date: u32,
    in_work: bool,
    text: Vec<String>,
}

impl WorkItem {
    /// Construct a work item.
    ///
    /// The user is uppercased and cut to the header field width. A `date`
    /// outside `[SANE_DATE_MIN, SANE_DATE_MAX]` is replaced by the clock's
    /// current date, widened to `yyyymmdd`.
    #[must_use]
    pub fn new(
        index: u32,
        number: i64,
        user: &str,
        date: u32,
        in_work: bool,
        clock: &dyn Clock,
    ) -> Self {
        let date = if (SANE_DATE_MIN..=SANE_DATE_MAX).contains(&date) {
            date
        } else {
            20_000_000 + clock.current_date()
        };
        let user: String = user.trim().chars().take(USER_WIDTH).collect();
        Self {
            index,
            number,
            user: user.to_uppercase(),
            date,
            in_work,
            text: Vec::new(),
        }
    }

    /// Parse a header line into a work item with no text yet.
    ///
    /// Extracts the five fixed-width fields at the dialect's offsets. Fails
    /// when the index, date, or number field is not numeric; `member` is
    /// carried into the error for reporting only.
    pub fn parse(
        line: &str,
        dialect: SourceDialect,
        member: &MemberName,
    ) -> Result<Self, InvalidWorkItem> {
        let numeric = |field: HeaderField, raw: String| InvalidWorkItem {
            member: member.to_string(),
            field,
            raw,
        };

        let raw = col_slice(line, dialect.index_col(), dialect.index_col() + INDEX_WIDTH);
        let index: u32 = raw
            .trim()
            .parse()
            .map_err(|_| numeric(HeaderField::Index, raw))?;

        let in_work = char_at(line, dialect.marker_col()) == Some(IN_WORK_GLYPH);

        let user = col_slice(line, dialect.user_col(), dialect.user_col() + USER_WIDTH)
            .trim_end()
            .to_string();

        let raw = col_slice(line, dialect.date_col(), dialect.date_col() + DATE_WIDTH);
        let date: u32 = raw
            .trim()
            .parse()
            .map_err(|_| numeric(HeaderField::Date, raw))?;

        let raw = col_rest(line, dialect.number_col());
        let number: i64 = raw
            .trim()
            .parse()
            .map_err(|_| numeric(HeaderField::Number, raw))?;

        Ok(Self {
            index,
            number,
            user,
            date,
            in_work,
            text: Vec::new(),
        })
    }

    /// Append one free-text line. No wrapping is applied.
    pub fn append_text(&mut self, line: impl Into<String>) {
        self.text.push(line.into());
    }

    /// Render the entry as source lines: the header line followed by one
    /// continuation line per text entry.
    #[must_use]
    pub fn render_source(&self, dialect: SourceDialect) -> Vec<String> {
        let marker = if self.in_work { IN_WORK_GLYPH } else { ' ' };
        let mut lines = Vec::with_capacity(1 + self.text.len());
        lines.push(format!(
            "{prefix}{index:0iw$}{marker}* {user:<uw$}  {date:0dw$} {NUMBER_TOKEN} {number}",
            prefix = dialect.line_prefix(),
            index = self.index,
            user = self.user,
            date = self.date,
            number = self.number,
            iw = INDEX_WIDTH,
            uw = USER_WIDTH,
            dw = DATE_WIDTH,
        ));
        for text in &self.text {
            lines.push(format!("{}{}", dialect.continuation_prefix(), text));
        }
        lines
    }

    /// Structural modification index (≥ 9000).
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// External ticket number, unique within a member.
    #[must_use]
    pub const fn number(&self) -> i64 {
        self.number
    }

    /// User profile that made the change.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Change date as `yyyymmdd`.
    #[must_use]
    pub const fn date(&self) -> u32 {
        self.date
    }

    /// Whether the entry is still flagged in-work.
    #[must_use]
    pub const fn in_work(&self) -> bool {
        self.in_work
    }

    /// Free-text lines, in order.
    #[must_use]
    pub fn text(&self) -> &[String] {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::HeaderField;

    const CLOCK: FixedClock = FixedClock(260_806);

    fn member() -> MemberName {
        MemberName::new("DEVLIB", "QRPGLESRC", "INVOICE")
    }

    #[test]
    fn renders_fixed_header_at_documented_columns() {
        let mut item = WorkItem::new(9000, 1001, "JDOE", 20_230_615, false, &CLOCK);
        item.append_text("Fixed rounding bug");
        assert_eq!(
            item.render_source(SourceDialect::Fixed),
            vec![
                "9000 * JDOE    20230615 WORKITEM 1001".to_string(),
                "        Fixed rounding bug".to_string(),
            ]
        );
    }

    #[test]
    fn renders_sql_header_behind_comment_prefix() {
        let mut item = WorkItem::new(9001, 77, "ASMITH", 20_230_701, true, &CLOCK);
        item.append_text("Added validation");
        let lines = item.render_source(SourceDialect::Sql);
        assert_eq!(lines[0], "--9001§* ASMITH  20230701 WORKITEM 77");
        assert_eq!(lines[1], "--       Added validation");
    }

    #[test]
    fn parse_reads_back_what_render_wrote() {
        for dialect in [SourceDialect::Fixed, SourceDialect::Sql] {
            let item = WorkItem::new(9042, 4711, "QSECOFR", 20_191_224, true, &CLOCK);
            let header = &item.render_source(dialect)[0];
            let parsed = WorkItem::parse(header, dialect, &member()).expect("header parses");
            assert_eq!(parsed, item);
        }
    }

    #[test]
    fn out_of_range_date_falls_back_to_clock() {
        // yymmdd shorthand is below the sane range and gets replaced.
        let item = WorkItem::new(9000, 1, "JDOE", 230_615, false, &CLOCK);
        assert_eq!(item.date(), 20_260_806);

        let item = WorkItem::new(9000, 1, "JDOE", 99_999_999, false, &CLOCK);
        assert_eq!(item.date(), 20_260_806);
    }

    #[test]
    fn user_is_uppercased_and_cut_to_field_width() {
        let item = WorkItem::new(9000, 1, "jdoelongname", 20_230_615, false, &CLOCK);
        assert_eq!(item.user(), "JDOELO");
    }

    #[test]
    fn parse_rejects_non_numeric_fields() {
        let bad_number = "9000 * JDOE    20230615 WORKITEM TKT-1";
        let err = WorkItem::parse(bad_number, SourceDialect::Fixed, &member())
            .expect_err("number is not numeric");
        assert_eq!(err.field, HeaderField::Number);
        assert!(err.member.contains("DEVLIB/QRPGLESRC(INVOICE)"));

        let bad_date = "9000 * JDOE    2023JUN5 WORKITEM 1001";
        let err = WorkItem::parse(bad_date, SourceDialect::Fixed, &member())
            .expect_err("date is not numeric");
        assert_eq!(err.field, HeaderField::Date);
    }
}
