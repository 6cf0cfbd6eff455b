//! Slide segmentation and classification.
//!
//! The document body splits into blocks on `---` separator lines. Each
//! block is classified by its optional `<!-- type: ... -->` directive
//! and parsed into a [`SlideRecord`] according to fixed structural
//! rules: a `#` heading supplies the title, the lines after it supply
//! the type-specific content.

use prez_core::{Deck, Error, Result, SlideKind, SlideRecord};
use regex::Regex;
use std::sync::LazyLock;

use crate::frontmatter::extract_frontmatter;

/// Matches a type directive on a line of its own.
static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!--\s*type:\s*(\w+)\s*-->\s*$").unwrap());

/// Matches an inline image reference `![alt](path)`.
static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// What to do with a block that fails classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole parse on the first failing block. No partial
    /// deck is returned.
    #[default]
    Abort,

    /// Log and drop failing blocks, keeping the rest of the deck.
    Skip,
}

/// Parser for the markdown presentation dialect.
///
/// Holds no per-document state; one parser can serve any number of
/// independent parse calls.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    policy: FailurePolicy,
}

impl MarkdownParser {
    /// Create a parser with the default fail-fast policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse a complete document into a deck.
    pub fn parse(&self, content: &str) -> Result<Deck> {
        let (metadata, body) = extract_frontmatter(content)?;

        let blocks = split_blocks(body);
        if blocks.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut deck = Deck::new(metadata);
        for (index, block) in blocks.iter().enumerate() {
            match classify_block(block, index) {
                Ok(slide) => deck.add_slide(slide),
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => log::warn!("skipping block {index}: {e}"),
                },
            }
        }

        log::debug!("parsed {} slides", deck.slide_count());
        Ok(deck)
    }
}

/// Split body text into slide blocks on `---` separator lines.
///
/// Blank blocks produced by separators at the very start or end of the
/// body are discarded. Blank blocks between two interior separators are
/// kept; they fail classification later, so a stray double separator is
/// reported instead of silently shifting slide positions.
fn split_blocks(body: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        if is_separator(line) {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    blocks.push(current);

    while blocks.first().is_some_and(|b| is_blank(b)) {
        blocks.remove(0);
    }
    while blocks.last().is_some_and(|b| is_blank(b)) {
        blocks.pop();
    }
    blocks
}

fn is_separator(line: &str) -> bool {
    line.trim_end() == "---"
}

fn is_blank(block: &[&str]) -> bool {
    block.iter().all(|line| line.trim().is_empty())
}

/// Classify a single block into a slide record.
fn classify_block(lines: &[&str], index: usize) -> Result<SlideRecord> {
    // Pull the directive out first; directive lines never count as
    // slide content wherever they sit in the block. The first directive
    // wins. Unknown directive values fall back to the content type.
    let mut kind: Option<SlideKind> = None;
    let mut content: Vec<&str> = Vec::new();
    for &line in lines {
        if let Some(caps) = DIRECTIVE_REGEX.captures(line) {
            if kind.is_none() {
                kind = Some(SlideKind::from_directive(&caps[1]).unwrap_or(SlideKind::Content));
            }
            continue;
        }
        content.push(line);
    }
    let kind = kind.unwrap_or(SlideKind::Content);

    // The first level-1 heading supplies the title; anything before it
    // is ignored.
    let mut title: Option<&str> = None;
    let mut rest: &[&str] = &[];
    for (i, line) in content.iter().enumerate() {
        if let Some(text) = heading_text(line) {
            title = Some(text);
            rest = &content[i + 1..];
            break;
        }
    }
    let title = match title {
        Some(title) => title,
        None => return Err(Error::MissingTitle { block: index }),
    };

    let slide = match kind {
        SlideKind::Title => {
            let subtitle = first_non_blank(rest)
                .map(|line| subheading_text(line).unwrap_or(line).to_string());
            SlideRecord::title_slide(title, subtitle)
        }
        SlideKind::Content => {
            let items = rest
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .map(|line| strip_bullet(line).to_string())
                .collect();
            SlideRecord::content_slide(title, items)
        }
        SlideKind::Section => {
            let description = first_non_blank(rest).map(str::to_string);
            SlideRecord::section_slide(title, description)
        }
        SlideKind::Image => {
            let mut image: Option<(String, Option<String>)> = None;
            for (i, line) in rest.iter().enumerate() {
                if let Some(caps) = IMAGE_REGEX.captures(line) {
                    let caption = first_non_blank(&rest[i + 1..]).map(str::to_string);
                    image = Some((caps[2].to_string(), caption));
                    break;
                }
            }
            let (image_path, caption) = match image {
                Some(found) => found,
                None => return Err(Error::UnrecognizedImageDirective { block: index }),
            };
            SlideRecord::image_slide(title, image_path, caption)
        }
    };

    Ok(slide)
}

/// First non-blank line of a slice, trimmed.
fn first_non_blank<'a>(lines: &[&'a str]) -> Option<&'a str> {
    lines.iter().map(|line| line.trim()).find(|line| !line.is_empty())
}

/// Title text of a level-1 heading line, if this is one.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

/// Text of a level-2 heading line, if this is one. Expects the line to
/// be pre-trimmed.
fn subheading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

/// Strip one leading bullet marker from a trimmed line.
fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    line
}
