//! Check command implementation
//!
//! Validates the frontmatter of each document and, with `--fix`, writes the
//! repaired text back. Any document left invalid fails the command.

use console::Style;

use mush::common::fs::{read_file, write_atomic};
use mush::error::{Result, frontmatter as frontmatter_error};
use mush::frontmatter::{repair, validate};

use crate::cli::CheckArgs;

pub fn run(args: CheckArgs) -> Result<()> {
    let ok = Style::new().green();
    let bad = Style::new().red();
    let mut invalid = 0usize;

    for path in &args.files {
        let bytes = read_file(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let Err(problem) = validate(&content) else {
            println!("{} {}", ok.apply_to("ok"), path.display());
            continue;
        };

        if !args.fix {
            println!("{} {}: {problem}", bad.apply_to("invalid"), path.display());
            invalid += 1;
            continue;
        }

        match repair(&content) {
            Ok(Some(fixed)) => {
                write_atomic(path, fixed.as_bytes())?;
                println!("{} {}", ok.apply_to("fixed"), path.display());
            }
            Ok(None) => println!("{} {}", ok.apply_to("ok"), path.display()),
            Err(e) => {
                println!("{} {}: {e}", bad.apply_to("invalid"), path.display());
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Err(frontmatter_error::invalid(format!(
            "{invalid} document{} with invalid frontmatter",
            if invalid == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}
