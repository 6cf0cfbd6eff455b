//! CLI tool for building PowerPoint decks from markdown documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prez_core::Deck;
use prez_markdown::{FailurePolicy, MarkdownParser};
use prez_pptx::PptxWriter;
use std::fs;
use std::path::{Path, PathBuf};

/// Build PowerPoint presentations from markdown documents.
#[derive(Parser, Debug)]
#[command(name = "prez")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a .pptx file from a markdown document
    Build {
        /// Input markdown file
        input: PathBuf,

        /// Output file (default: input path with a .pptx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop unclassifiable slide blocks instead of aborting
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Parse a markdown document and print the deck as JSON
    Dump {
        /// Input markdown file
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a markdown document and report what it contains
    Check {
        /// Input markdown file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match args.command {
        Command::Build {
            input,
            output,
            skip_invalid,
        } => build(&input, output.as_deref(), skip_invalid),
        Command::Dump { input, pretty } => dump(&input, pretty),
        Command::Check { input } => check(&input),
    }
}

/// Read and parse a markdown document.
fn parse_deck(input: &Path, policy: FailurePolicy) -> Result<Deck> {
    let content =
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;

    MarkdownParser::new()
        .with_failure_policy(policy)
        .parse(&content)
        .with_context(|| format!("Failed to parse {}", input.display()))
}

fn build(input: &Path, output: Option<&Path>, skip_invalid: bool) -> Result<()> {
    let policy = if skip_invalid {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let deck = parse_deck(input, policy)?;
    log::debug!("parsed {} slides from {}", deck.slide_count(), input.display());

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    PptxWriter::new()
        .write_file(&deck, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "Wrote {} slides to {}",
        deck.slide_count(),
        output_path.display()
    );
    Ok(())
}

fn dump(input: &Path, pretty: bool) -> Result<()> {
    let deck = parse_deck(input, FailurePolicy::Abort)?;

    let json = if pretty {
        serde_json::to_string_pretty(&deck)?
    } else {
        serde_json::to_string(&deck)?
    };
    println!("{json}");
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let deck = parse_deck(input, FailurePolicy::Abort)?;

    if let Some(title) = deck.title() {
        println!("Title: {title}");
    }
    println!("Slides: {}", deck.slide_count());
    for (index, slide) in deck.slides.iter().enumerate() {
        println!("  {:>3}. [{}] {}", index + 1, slide.kind().as_str(), slide.title());
    }
    Ok(())
}

/// Output path next to the input, with the extension swapped to .pptx.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pptx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_swaps_extension() {
        assert_eq!(
            default_output_path(Path::new("talks/intro.md")),
            PathBuf::from("talks/intro.pptx")
        );
        assert_eq!(
            default_output_path(Path::new("bare")),
            PathBuf::from("bare.pptx")
        );
    }

    #[test]
    fn test_build_writes_pptx_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deck.md");
        fs::write(
            &input,
            "---\ntitle: Smoke\n---\n<!-- type: title -->\n# Hi\n---\n# Points\n- one\n",
        )
        .unwrap();

        build(&input, None, false).unwrap();

        assert!(dir.path().join("deck.pptx").exists());
    }

    #[test]
    fn test_build_fails_on_invalid_block_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.md");
        fs::write(&input, "# Ok\n---\nno heading\n").unwrap();

        assert!(build(&input, None, false).is_err());
        assert!(!dir.path().join("bad.pptx").exists());
    }

    #[test]
    fn test_build_skip_invalid_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mixed.md");
        fs::write(&input, "# Ok\n---\nno heading\n---\n# Also Ok\n").unwrap();

        build(&input, None, true).unwrap();

        assert!(dir.path().join("mixed.pptx").exists());
    }
}
