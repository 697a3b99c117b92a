//! `pal remove` — drop a work item, optionally reverting its tagged lines.

use super::{MemberArgs, report_issues};
use crate::output::{OutputMode, emit_json};
use anyhow::Result;
use clap::Args;

/// Arguments for `pal remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub member: MemberArgs,

    /// Ticket number of the work item to remove.
    pub number: i64,

    /// Also revert body lines tagged with the removed index to their
    /// pre-modification state.
    #[arg(long)]
    pub clean: bool,
}

/// Remove a work item and persist the rewritten member.
pub fn run(args: &RemoveArgs, mode: OutputMode, quiet: bool) -> Result<()> {
    let (mut log, mut store, report) = args.member.open()?;
    report_issues(&report);

    let removed = log.remove_work_item(args.number, args.clean)?;
    log.persist_with(&mut store)?;

    for line in &removed.not_revertible {
        eprintln!(
            "warning: line {} is tagged with index {} but not revertible; left unchanged",
            line + 1,
            removed.item.index()
        );
    }

    if mode.is_json() {
        emit_json(&removed)?;
    } else if !quiet {
        println!(
            "removed work item {} from {}: {} header lines, {} reverted, {} deleted",
            removed.item.number(),
            log.member(),
            removed.lines_removed,
            removed.lines_rewritten,
            removed.lines_deleted
        );
    }
    Ok(())
}
