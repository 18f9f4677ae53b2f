use clap::Parser;
use std::path::PathBuf;

/// Arguments for the check command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Validate skill documents:\n    mush check .claude/skills/review/SKILL.md\n\n\
                  Repair them in place:\n    mush check .claude/skills/review/SKILL.md --fix")]
pub struct CheckArgs {
    /// Markdown documents to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Rewrite documents whose frontmatter can be repaired
    #[arg(long)]
    pub fix: bool,
}
