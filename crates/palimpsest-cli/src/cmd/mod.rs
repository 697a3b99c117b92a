//! Subcommand implementations and the bits they share.

pub mod add;
pub mod completions;
pub mod list;
pub mod remove;
pub mod render;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use palimpsest_core::{
    MemberChangeLog, MemberName, ScanIssue, ScanReport, SourceDialect, SourceStore, WorkItem,
    lines_from_text, text_from_lines,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Dialect selector exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// Fixed-column program source (RPG, CL).
    Fixed,
    /// Comment-style embedded SQL source.
    Sql,
}

impl From<DialectArg> for SourceDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Fixed => Self::Fixed,
            DialectArg::Sql => Self::Sql,
        }
    }
}

/// Arguments shared by every member-touching subcommand.
#[derive(Args, Debug)]
pub struct MemberArgs {
    /// Path to the member's source file.
    pub path: PathBuf,

    /// Source dialect of the member.
    #[arg(long, value_enum, default_value_t = DialectArg::Fixed)]
    pub dialect: DialectArg,

    /// Qualified member name (LIB/FILE(MBR)) used in messages. Derived from
    /// the file name when omitted.
    #[arg(long)]
    pub member: Option<MemberName>,
}

impl MemberArgs {
    fn member_name(&self) -> MemberName {
        self.member.clone().unwrap_or_else(|| {
            let stem = self
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("MEMBER");
            MemberName::new("LOCAL", "SRCFILE", stem)
        })
    }

    /// Load the member from disk and scan it.
    pub fn open(&self) -> Result<(MemberChangeLog, FileStore, ScanReport)> {
        let mut store = FileStore::new(self.path.clone());
        let mut log = MemberChangeLog::new(self.member_name(), self.dialect.into());
        let report = log.load_with(&mut store)?;
        Ok((log, store, report))
    }
}

/// Surface scan issues on stderr without failing the command — the engine
/// already walked past them.
pub fn report_issues(report: &ScanReport) {
    for issue in &report.issues {
        eprintln!("warning: line {}: {}", issue.line + 1, issue.error);
    }
}

/// JSON view of a scanned member: its work items plus any scan issues.
#[derive(Debug, Serialize)]
pub struct ListableMember {
    /// Qualified member name.
    pub member: String,
    /// Registered work items in position order.
    pub work_items: Vec<WorkItemRow>,
    /// Malformed header lines the scan walked past.
    pub issues: Vec<ScanIssue>,
}

/// One work item with its header position.
#[derive(Debug, Serialize)]
pub struct WorkItemRow {
    /// Buffer line index of the header.
    pub position: usize,
    #[serde(flatten)]
    item: WorkItem,
}

impl ListableMember {
    /// Snapshot a scanned change log for JSON output.
    #[must_use]
    pub fn from_log(log: &MemberChangeLog, report: &ScanReport) -> Self {
        Self {
            member: log.member().to_string(),
            work_items: log
                .work_items()
                .map(|(item, position)| WorkItemRow {
                    position,
                    item: item.clone(),
                })
                .collect(),
            issues: report.issues.clone(),
        }
    }
}

/// [`SourceStore`] over a plain text file, one source line per text line.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// A store reading and writing `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SourceStore for FileStore {
    fn load(&mut self, member: &MemberName) -> Result<Vec<String>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {member} from {}", self.path.display()))?;
        Ok(lines_from_text(&text))
    }

    fn store(&mut self, member: &MemberName, lines: &[String]) -> Result<()> {
        fs::write(&self.path, text_from_lines(lines))
            .with_context(|| format!("writing {member} to {}", self.path.display()))
    }
}
