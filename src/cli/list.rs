use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show the files each bundle installed
    #[arg(long)]
    pub detailed: bool,
}
