//! CLI definitions using clap derive API
//!
//! One submodule per command's arguments:
//! - cache: Cache inspection and cleanup
//! - install: Install from the cache
//! - uninstall: Remove an installed bundle
//! - list: List installed bundles
//! - check: Frontmatter validation and repair

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod check;
pub mod install;
pub mod list;
pub mod uninstall;

pub use cache::{CacheArgs, CacheSubcommand, RemoveCacheArgs, VerifyCacheArgs};
pub use check::CheckArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use uninstall::UninstallArgs;

/// mush - bundle cache and materializer
///
/// Install cached bundles of skills, agent definitions and tool configuration
/// into a project for a given harness.
#[derive(Parser, Debug)]
#[command(
    name = "mush",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Bundle cache and materializer for agent harnesses",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  mush cache list                                   \x1b[90m# List cached bundles\x1b[0m\n   \
                  mush install acme-bot -w acme --harness codex     \x1b[90m# Install latest cached version\x1b[0m\n   \
                  mush uninstall acme-bot --harness codex           \x1b[90m# Remove what the install wrote\x1b[0m\n   \
                  mush check .claude/skills/*/SKILL.md --fix        \x1b[90m# Repair skill frontmatter\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "MUSH_PROJECT")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a cached bundle into the project
    Install(InstallArgs),

    /// Remove an installed bundle from the project
    Uninstall(UninstallArgs),

    /// List installed bundles
    List(ListArgs),

    /// Validate (and optionally repair) document frontmatter
    Check(CheckArgs),

    /// Inspect and manage the bundle cache
    #[command(name = "cache")]
    Cache(CacheArgs),
}
