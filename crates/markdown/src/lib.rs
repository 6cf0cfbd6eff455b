//! Markdown dialect parser producing typed slide decks.
//!
//! A document is an optional `---` delimited frontmatter block followed
//! by slide blocks separated by `---` lines. Each block carries an
//! optional `<!-- type: ... -->` directive, a `#` heading for its
//! title, and type-specific body lines.

pub mod frontmatter;
pub mod parser;
pub mod writer;

pub use frontmatter::extract_frontmatter;
pub use parser::{FailurePolicy, MarkdownParser};
pub use writer::to_markdown;
