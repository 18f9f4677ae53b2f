use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install the latest cached version for Claude:\n    mush install acme-bot -w acme --harness claude\n\n\
                  Install a pinned version into another project:\n    mush install acme-bot:1.0.0 -w acme --harness codex --project ../app\n\n\
                  Overwrite files that already exist:\n    mush install acme-bot -w acme --harness cursor --force")]
pub struct InstallArgs {
    /// Bundle reference: <slug> or <slug>:<version>
    pub bundle: String,

    /// Registry workspace the bundle was pulled from
    #[arg(long, short = 'w')]
    pub workspace: String,

    /// Harness to install for (claude, codex, cursor, gemini, opencode, or a project-defined id)
    #[arg(long)]
    pub harness: String,

    /// Overwrite existing files
    #[arg(long, short = 'f')]
    pub force: bool,
}
