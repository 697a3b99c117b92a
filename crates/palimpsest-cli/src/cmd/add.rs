//! `pal add` — register a new work item and persist the rewritten member.

use super::{MemberArgs, report_issues};
use crate::output::{OutputMode, emit_json};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for `pal add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub member: MemberArgs,

    /// External ticket number; must be unused in this member.
    #[arg(long)]
    pub number: i64,

    /// User profile recorded on the entry.
    #[arg(long)]
    pub user: String,

    /// Change date as yyyymmdd. Out-of-range values (including the default)
    /// fall back to today.
    #[arg(long, default_value_t = 0)]
    pub date: u32,

    /// Explicit modification index; defaults to the next free one.
    #[arg(long)]
    pub index: Option<u32>,

    /// Flag the entry as still in work.
    #[arg(long)]
    pub in_work: bool,

    /// Free text; each line becomes one continuation line.
    pub text: String,
}

/// Add a work item to the member's header block.
pub fn run(args: &AddArgs, mode: OutputMode, quiet: bool) -> Result<()> {
    let (mut log, mut store, report) = args.member.open()?;
    report_issues(&report);

    match args.index {
        Some(index) => log.add_work_item(
            index,
            args.number,
            &args.user,
            args.date,
            &args.text,
            args.in_work,
        )?,
        None => log.put_work_item(args.number, &args.user, args.date, &args.text, args.in_work)?,
    }
    log.persist_with(&mut store)?;

    let item = log
        .find(args.number)
        .context("freshly added work item is registered")?;
    if mode.is_json() {
        emit_json(item)?;
    } else if !quiet {
        println!(
            "added work item {} to {} at index {}",
            item.number(),
            log.member(),
            item.index()
        );
    }
    Ok(())
}
