use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    mush cache stats\n\n\
                  List cached bundles:\n    mush cache list\n\n\
                  Re-hash the latest cached version:\n    mush cache verify acme acme-bot\n\n\
                  Remove one version:\n    mush cache remove acme acme-bot:1.0.0\n\n\
                  Remove every version of a bundle:\n    mush cache remove acme acme-bot\n\n\
                  Clear all cached bundles:\n    mush cache clear")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// Print the cache directory
    Dir,

    /// List cached bundles
    List,

    /// Show cache statistics
    Stats,

    /// Re-hash a cached bundle's assets against its manifest
    Verify(VerifyCacheArgs),

    /// Remove a cached bundle or one of its versions
    Remove(RemoveCacheArgs),

    /// Remove every cached bundle
    Clear,
}

/// Arguments for cache remove command
#[derive(Parser, Debug)]
pub struct RemoveCacheArgs {
    /// Registry workspace the bundle was pulled from
    pub workspace: String,

    /// Bundle reference: <slug> or <slug>:<version>
    pub bundle: String,
}

/// Arguments for cache verify command
#[derive(Parser, Debug)]
pub struct VerifyCacheArgs {
    /// Registry workspace the bundle was pulled from
    pub workspace: String,

    /// Bundle reference: <slug> or <slug>:<version> (latest cached if omitted)
    pub bundle: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cli_parsing_cache_remove() {
        let cli = Cli::try_parse_from(["mush", "cache", "remove", "acme", "bot:1.0.0"]).unwrap();
        match cli.command {
            Commands::Cache(CacheArgs {
                command: CacheSubcommand::Remove(args),
            }) => {
                assert_eq!(args.workspace, "acme");
                assert_eq!(args.bundle, "bot:1.0.0");
            }
            _ => panic!("Expected cache remove command"),
        }
    }

    #[test]
    fn test_cli_parsing_cache_verify() {
        let cli = Cli::try_parse_from(["mush", "cache", "verify", "acme", "bot"]).unwrap();
        match cli.command {
            Commands::Cache(CacheArgs {
                command: CacheSubcommand::Verify(args),
            }) => {
                assert_eq!(args.workspace, "acme");
                assert_eq!(args.bundle, "bot");
            }
            _ => panic!("Expected cache verify command"),
        }
    }

    #[test]
    fn test_cli_parsing_cache_dir() {
        let cli = Cli::try_parse_from(["mush", "cache", "dir"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                command: CacheSubcommand::Dir
            })
        ));
    }
}
