//! Line reconstruction ("time travel").
//!
//! A modified source line carries its pre-modification text inline: after
//! the current code, an `EX ` token is followed by the prior modification
//! index and the historical content. Removing a work item with cleanup
//! rewrites every line it tagged back to that prior state.
//!
//! The state machine here is shared by both dialects; the only dialect
//! difference is the optional `--` line prefix, which is stripped before
//! matching and restored on the rewritten output.

use crate::dialect::{INDEX_WIDTH, SourceDialect};

/// Token introducing the recorded prior state. Matched case-insensitively.
const PRIOR_STATE_TOKEN: &str = "EX ";

/// Column of the specification letter on a tagged fixed-form line (the
/// 4-digit tag occupies the sequence area, the letter follows one blank).
const SPEC_LETTER_COL: usize = 5;

/// Fixed-form specification letters.
const SPEC_LETTERS: [char; 8] = ['H', 'F', 'E', 'D', 'I', 'C', 'O', 'P'];

/// Shortest line that can carry a tag and a prior-state marker.
const MIN_TAGGED_LEN: usize = 7;

/// Outcome of reverting one line to its pre-modification state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconstruction {
    /// The line was not modified under this index; leave it alone.
    Unchanged,
    /// The line's prior state, reassembled.
    Rewritten(String),
    /// The line was introduced by this modification and has no prior state.
    DeleteLine,
    /// The prior state cannot be recovered safely (free-format or truncated
    /// encoding). The line must be left untouched and reported, never
    /// guessed at.
    NotRevertible,
}

/// Revert `line` to its state before modification `index`.
#[must_use]
pub fn reconstruct_line(line: &str, index: u32, dialect: SourceDialect) -> Reconstruction {
    let (prefix, body) = match line.strip_prefix(dialect.line_prefix()) {
        Some(rest) => (dialect.line_prefix(), rest),
        None => ("", line),
    };

    let tag = format!("{index:0width$}", width = INDEX_WIDTH);
    let chars: Vec<char> = body.chars().collect();
    if !body.starts_with(&tag) || chars.len() < MIN_TAGGED_LEN {
        return Reconstruction::Unchanged;
    }

    // Case-insensitive token search; char-by-char uppercase keeps the
    // column arithmetic aligned with `chars`.
    let upper: String = body.chars().map(|c| c.to_ascii_uppercase()).collect();
    let content_start = upper
        .find(PRIOR_STATE_TOKEN)
        .map_or(2, |byte| upper[..byte].chars().count() + PRIOR_STATE_TOKEN.len());
    if content_start < MIN_TAGGED_LEN {
        // No prior state recorded: the line came into existence with this
        // modification.
        return Reconstruction::DeleteLine;
    }

    let mut pos = content_start;
    while chars.get(pos) == Some(&' ') {
        pos += 1;
    }
    if pos + INDEX_WIDTH > chars.len() {
        return Reconstruction::NotRevertible;
    }
    let prior: String = chars[pos..pos + INDEX_WIDTH].iter().collect();
    let history: String = chars[pos + INDEX_WIDTH..]
        .iter()
        .collect::<String>()
        .trim()
        .to_string();

    // SQL has no specification letters; the historical content is complete
    // as recorded.
    if dialect == SourceDialect::Sql || starts_with_spec_letter(&history) {
        return Reconstruction::Rewritten(format!("{prefix}{prior} {history}"));
    }

    // The historical content lost its specification letter; copy it from
    // the line as it stands now.
    match chars.get(SPEC_LETTER_COL) {
        Some(&letter) if is_spec_letter(letter) => {
            Reconstruction::Rewritten(format!("{prefix}{prior} {letter} {history}"))
        }
        _ => Reconstruction::NotRevertible,
    }
}

/// True when the content already leads with a specification letter and a
/// blank, i.e. it is a complete fixed-form line body.
fn starts_with_spec_letter(content: &str) -> bool {
    let mut chars = content.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(' ')) if is_spec_letter(letter)
    )
}

fn is_spec_letter(c: char) -> bool {
    SPEC_LETTERS.contains(&c.to_ascii_uppercase())
}
