//! `pal render` — print a member's source as the engine sees it.

use super::{MemberArgs, report_issues};
use anyhow::Result;
use clap::Args;

/// Arguments for `pal render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub member: MemberArgs,
}

/// Print the member's lines to stdout.
pub fn run(args: &RenderArgs) -> Result<()> {
    let (log, _store, report) = args.member.open()?;
    report_issues(&report);
    for line in log.lines() {
        println!("{line}");
    }
    Ok(())
}
