//! Frontmatter extraction.
//!
//! A document may begin with a `---` delimited block of `key: value`
//! lines. The block is parsed into [`Metadata`] and the text after the
//! closing delimiter is returned untouched as the body. Documents that
//! do not start with the delimiter pass through unchanged.

use prez_core::{Error, Metadata, Result};

/// Split a document into frontmatter metadata and body text.
///
/// The opening delimiter is only recognized on the document's very
/// first line; `---` lines further down are slide separators and are
/// left for the segmenter. An opening delimiter without a matching
/// close is an error rather than being silently treated as body text.
pub fn extract_frontmatter(content: &str) -> Result<(Metadata, &str)> {
    let first_line = match content.lines().next() {
        Some(line) => line,
        None => return Ok((Metadata::new(), content)),
    };
    if first_line.trim_end() != "---" {
        return Ok((Metadata::new(), content));
    }

    let mut metadata = Metadata::new();
    let mut pos = match content.find('\n') {
        Some(i) => i + 1,
        None => return Err(unclosed()),
    };

    while pos < content.len() {
        let line_end = content[pos..].find('\n').map(|i| pos + i);
        let raw_line = match line_end {
            Some(end) => &content[pos..end],
            None => &content[pos..],
        };
        let line = raw_line.trim_end_matches('\r');

        if line.trim_end() == "---" {
            let body_start = match line_end {
                Some(end) => end + 1,
                None => content.len(),
            };
            return Ok((metadata, &content[body_start..]));
        }

        parse_metadata_line(line, &mut metadata)?;

        pos = match line_end {
            Some(end) => end + 1,
            None => return Err(unclosed()),
        };
    }

    Err(unclosed())
}

fn unclosed() -> Error {
    Error::MalformedFrontmatter("opening --- delimiter is never closed".to_string())
}

/// Parse one `key: value` line into the metadata mapping.
///
/// Blank lines are skipped. Duplicate keys keep the first value seen.
fn parse_metadata_line(line: &str, metadata: &mut Metadata) -> Result<()> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let (key, value) = match trimmed.split_once(':') {
        Some(pair) => pair,
        None => {
            return Err(Error::MalformedFrontmatter(format!(
                "expected `key: value`, found `{trimmed}`"
            )));
        }
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::MalformedFrontmatter(format!(
            "missing key in `{trimmed}`"
        )));
    }

    if !metadata.insert(key, unquote(value.trim())) {
        log::debug!("duplicate frontmatter key `{key}` ignored");
    }
    Ok(())
}

/// Strip one pair of balanced surrounding quotes from a value.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter_returns_input_unchanged() {
        let content = "# Welcome\n- This is the introduction\n";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parses_key_value_lines() {
        let content = "---\ntitle: My Presentation\nauthor: Test Author\n---\n# Welcome\n";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("My Presentation"));
        assert_eq!(metadata.get("author"), Some("Test Author"));
        assert_eq!(body, "# Welcome\n");
    }

    #[test]
    fn test_strips_balanced_quotes() {
        let content = "---\ntitle: \"Quoted\"\nauthor: 'Single'\n---\nbody";
        let (metadata, _) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("Quoted"));
        assert_eq!(metadata.get("author"), Some("Single"));
    }

    #[test]
    fn test_keeps_unbalanced_quotes() {
        let content = "---\ntitle: \"Half open\n---\nbody";
        let (metadata, _) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("\"Half open"));
    }

    #[test]
    fn test_first_duplicate_key_wins() {
        // Permissive on purpose: later duplicates are ignored, not an
        // error. Easy to invert by mistake, so pinned here.
        let content = "---\ntitle: First\ntitle: Second\n---\nbody";
        let (metadata, _) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("First"));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_value_may_contain_colon() {
        let content = "---\ntitle: Rust: The Book\n---\nbody";
        let (metadata, _) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("Rust: The Book"));
    }

    #[test]
    fn test_unclosed_frontmatter_is_an_error() {
        let content = "---\ntitle: T\n# Heading that never closes";
        let err = extract_frontmatter(content).unwrap_err();
        assert!(matches!(err, Error::MalformedFrontmatter(_)));
    }

    #[test]
    fn test_lone_delimiter_is_an_error() {
        let err = extract_frontmatter("---").unwrap_err();
        assert!(matches!(err, Error::MalformedFrontmatter(_)));

        let err = extract_frontmatter("---\n").unwrap_err();
        assert!(matches!(err, Error::MalformedFrontmatter(_)));
    }

    #[test]
    fn test_non_key_value_line_is_an_error() {
        let content = "---\njust some text\n---\nbody";
        let err = extract_frontmatter(content).unwrap_err();
        assert!(matches!(err, Error::MalformedFrontmatter(_)));
    }

    #[test]
    fn test_blank_lines_inside_frontmatter_are_skipped() {
        let content = "---\ntitle: T\n\nauthor: A\n---\nbody";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let content = "---\n---\n# Slide\n";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, "# Slide\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: T\r\n---\r\n# Slide\r\n";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("T"));
        assert_eq!(body, "# Slide\r\n");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_input() {
        let content = "---\ntitle: T\n---";
        let (metadata, body) = extract_frontmatter(content).unwrap();

        assert_eq!(metadata.get("title"), Some("T"));
        assert_eq!(body, "");
    }
}
