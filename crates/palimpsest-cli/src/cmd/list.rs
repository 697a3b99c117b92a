//! `pal list` — show the work items registered in a member.

use super::{ListableMember, MemberArgs, report_issues};
use crate::output::{OutputMode, emit_json};
use anyhow::Result;
use clap::Args;

/// Arguments for `pal list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub member: MemberArgs,
}

/// List a member's work items.
pub fn run(args: &ListArgs, mode: OutputMode) -> Result<()> {
    let (log, _store, report) = args.member.open()?;
    report_issues(&report);

    if mode.is_json() {
        return emit_json(&ListableMember::from_log(&log, &report));
    }

    if log.work_item_count() == 0 {
        println!("no work items in {}", log.member());
        return Ok(());
    }

    println!(
        "{:<8} {:<6} {:<7} {:<9} {:<5} TEXT",
        "NUMBER", "INDEX", "USER", "DATE", "FLAG"
    );
    for (item, _) in log.work_items() {
        let flag = if item.in_work() { "work" } else { "" };
        let text = item.text().first().map_or("", String::as_str);
        println!(
            "{:<8} {:<6} {:<7} {:<9} {:<5} {}",
            item.number(),
            item.index(),
            item.user(),
            item.date(),
            flag,
            text
        );
    }
    Ok(())
}
