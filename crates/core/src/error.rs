//! Error types for deck parsing and rendering.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a markdown deck or rendering it
/// to a presentation file.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Frontmatter opened with `---` but never closed, or contained a
    /// line that is not a `key: value` pair.
    #[error("Malformed frontmatter: {0}")]
    MalformedFrontmatter(String),

    /// A slide block contains no heading line to use as its title.
    #[error("Slide block {block}: no title heading found")]
    MissingTitle { block: usize },

    /// A block tagged `image` contains no image reference.
    #[error("Slide block {block}: image slide without an image reference")]
    UnrecognizedImageDirective { block: usize },

    /// The document body contains no slide blocks.
    #[error("Document contains no slides")]
    EmptyDocument,

    /// ZIP archive error while writing the output package.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation error while writing the output package.
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// 0-based index of the slide block this error refers to, for the
    /// error kinds that are tied to a specific block.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            Error::MissingTitle { block } | Error::UnrecognizedImageDirective { block } => {
                Some(*block)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_index_on_block_errors() {
        assert_eq!(Error::MissingTitle { block: 3 }.block_index(), Some(3));
        assert_eq!(
            Error::UnrecognizedImageDirective { block: 0 }.block_index(),
            Some(0)
        );
    }

    #[test]
    fn test_block_index_absent_on_document_errors() {
        assert_eq!(Error::EmptyDocument.block_index(), None);
        assert_eq!(
            Error::MalformedFrontmatter("unclosed".to_string()).block_index(),
            None
        );
    }

    #[test]
    fn test_display_includes_position() {
        let message = Error::MissingTitle { block: 2 }.to_string();
        assert!(message.contains('2'));
    }
}
