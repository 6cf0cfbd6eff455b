//! Domain types for parsed presentation decks.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered key/value metadata parsed from a document's frontmatter.
///
/// Keys are case-sensitive and iteration follows insertion order.
/// Duplicate keys keep the first value seen; later duplicates are
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Create an empty metadata mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair.
    ///
    /// Returns false and keeps the existing value when the key is
    /// already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Metadata serializes as a plain JSON object, in insertion order.
impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Metadata, A::Error> {
                let mut metadata = Metadata::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    metadata.insert(key, value);
                }
                Ok(metadata)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// The four slide templates a block can classify into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    Content,
    Section,
    Image,
}

impl SlideKind {
    /// Resolve a directive value like `title` or `image`.
    ///
    /// Matching is case-insensitive; unknown values return None so the
    /// caller can fall back to the default type.
    pub fn from_directive(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            "section" => Some(Self::Section),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Section => "section",
            Self::Image => "image",
        }
    }
}

/// A single classified slide.
///
/// Classification produces the variant tag; rendering matches
/// exhaustively over it, so adding a slide type is a compile-visible
/// change everywhere a deck is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlideRecord {
    /// Opening slide with an optional subtitle.
    Title {
        title: String,
        subtitle: Option<String>,
    },

    /// Bulleted content slide. Items keep source order with bullet
    /// markers stripped.
    Content { title: String, items: Vec<String> },

    /// Section divider with an optional description line.
    Section {
        title: String,
        description: Option<String>,
    },

    /// Image slide. `image_path` is the literal path string from the
    /// document; nothing checks it against the filesystem at parse
    /// time.
    Image {
        title: String,
        image_path: String,
        caption: Option<String>,
    },
}

impl SlideRecord {
    /// Create a title slide.
    pub fn title_slide(title: impl Into<String>, subtitle: Option<String>) -> Self {
        Self::Title {
            title: title.into(),
            subtitle,
        }
    }

    /// Create a content slide from bullet items.
    pub fn content_slide(title: impl Into<String>, items: Vec<String>) -> Self {
        Self::Content {
            title: title.into(),
            items,
        }
    }

    /// Create a section divider slide.
    pub fn section_slide(title: impl Into<String>, description: Option<String>) -> Self {
        Self::Section {
            title: title.into(),
            description,
        }
    }

    /// Create an image slide.
    pub fn image_slide(
        title: impl Into<String>,
        image_path: impl Into<String>,
        caption: Option<String>,
    ) -> Self {
        Self::Image {
            title: title.into(),
            image_path: image_path.into(),
            caption,
        }
    }

    /// The slide's template kind.
    pub fn kind(&self) -> SlideKind {
        match self {
            Self::Title { .. } => SlideKind::Title,
            Self::Content { .. } => SlideKind::Content,
            Self::Section { .. } => SlideKind::Section,
            Self::Image { .. } => SlideKind::Image,
        }
    }

    /// The slide's title. Every variant carries one.
    pub fn title(&self) -> &str {
        match self {
            Self::Title { title, .. }
            | Self::Content { title, .. }
            | Self::Section { title, .. }
            | Self::Image { title, .. } => title,
        }
    }
}

/// A fully parsed presentation: frontmatter metadata plus slides in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Frontmatter metadata, empty when the document had none.
    pub metadata: Metadata,

    /// Slide records in source block order.
    pub slides: Vec<SlideRecord>,
}

impl Deck {
    /// Create an empty deck with the given metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            slides: Vec::new(),
        }
    }

    /// Append a slide to the deck.
    pub fn add_slide(&mut self, slide: SlideRecord) {
        self.slides.push(slide);
    }

    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Presentation title from metadata, when present.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title")
    }

    /// Titles of all slides, in order.
    pub fn slide_titles(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.title()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_first_insert_wins() {
        let mut metadata = Metadata::new();
        assert!(metadata.insert("title", "First"));
        assert!(!metadata.insert("title", "Second"));

        assert_eq!(metadata.get("title"), Some("First"));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_metadata_keys_are_case_sensitive() {
        let mut metadata = Metadata::new();
        metadata.insert("Title", "A");
        metadata.insert("title", "B");

        assert_eq!(metadata.get("Title"), Some("A"));
        assert_eq!(metadata.get("title"), Some("B"));
    }

    #[test]
    fn test_metadata_preserves_insertion_order() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "T");
        metadata.insert("author", "A");
        metadata.insert("date", "D");

        let keys: Vec<&str> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "author", "date"]);
    }

    #[test]
    fn test_slide_kind_from_directive() {
        assert_eq!(SlideKind::from_directive("title"), Some(SlideKind::Title));
        assert_eq!(SlideKind::from_directive("IMAGE"), Some(SlideKind::Image));
        assert_eq!(
            SlideKind::from_directive("Section"),
            Some(SlideKind::Section)
        );
        assert_eq!(SlideKind::from_directive("comparison"), None);
    }

    #[test]
    fn test_slide_record_accessors() {
        let slide = SlideRecord::image_slide("Chart", "img/chart.png", None);
        assert_eq!(slide.kind(), SlideKind::Image);
        assert_eq!(slide.title(), "Chart");
    }

    #[test]
    fn test_slide_record_json_tag() {
        let slide = SlideRecord::title_slide("Hello", Some("World".to_string()));
        let json = serde_json::to_string(&slide).unwrap();

        assert!(json.contains(r#""kind":"title""#));
        assert!(json.contains(r#""subtitle":"World""#));

        let back: SlideRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn test_deck_helpers() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "Quarterly Review");

        let mut deck = Deck::new(metadata);
        deck.add_slide(SlideRecord::title_slide("Welcome", None));
        deck.add_slide(SlideRecord::content_slide(
            "Agenda",
            vec!["Numbers".to_string(), "Outlook".to_string()],
        ));

        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.title(), Some("Quarterly Review"));
        assert_eq!(deck.slide_titles(), vec!["Welcome", "Agenda"]);
    }

    #[test]
    fn test_metadata_serializes_as_json_object() {
        let mut metadata = Metadata::new();
        metadata.insert("title", "T");
        metadata.insert("author", "A");

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"title":"T","author":"A"}"#);

        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_deck_json_round_trip() {
        let mut deck = Deck::new(Metadata::new());
        deck.add_slide(SlideRecord::section_slide(
            "Part Two",
            Some("Advanced features".to_string()),
        ));

        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }
}
