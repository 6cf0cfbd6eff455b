//! Core deck model and error types for markdown-driven presentation
//! building.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Deck, Metadata, SlideKind, SlideRecord};
