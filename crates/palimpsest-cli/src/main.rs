#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pal: embedded change-log engine for legacy source members",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List the work items in a member")]
    List(cmd::list::ListArgs),

    #[command(about = "Add a work item to a member's header block")]
    Add(cmd::add::AddArgs),

    #[command(about = "Remove a work item, optionally reverting the lines it tagged")]
    Remove(cmd::remove::RemoveArgs),

    #[command(about = "Print a member's source with its rewritten header")]
    Render(cmd::render::RenderArgs),

    #[command(about = "Generate shell completion scripts")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("palimpsest_core=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mode = cli.output_mode();

    match cli.command {
        Commands::List(args) => cmd::list::run(&args, mode),
        Commands::Add(args) => cmd::add::run(&args, mode, cli.quiet),
        Commands::Remove(args) => cmd::remove::run(&args, mode, cli.quiet),
        Commands::Render(args) => cmd::render::run(&args),
        Commands::Completions(args) => cmd::completions::run(args.shell, &mut Cli::command()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["pal", "list", "member.rpgle"],
            vec![
                "pal", "add", "member.rpgle", "--number", "1001", "--user", "JDOE", "note",
            ],
            vec!["pal", "remove", "member.rpgle", "1001", "--clean"],
            vec!["pal", "render", "member.rpgle"],
            vec!["pal", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::parse_from(["pal", "list", "member.rpgle", "--json"]);
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }
}
