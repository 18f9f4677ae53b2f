//! mush - bundle cache and materializer
//!
//! Command line front end over the `mush` library. Works offline against the
//! local cache.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "mush=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.project, args),
        Commands::Uninstall(args) => commands::uninstall::run(cli.project, args),
        Commands::List(args) => commands::list::run(cli.project, args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Cache(args) => commands::cache::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
