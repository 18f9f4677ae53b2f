use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall a bundle:\n    mush uninstall acme-bot --harness claude")]
pub struct UninstallArgs {
    /// Bundle slug
    pub slug: String,

    /// Harness the bundle was installed for
    #[arg(long)]
    pub harness: String,
}
