//! Serialize a deck back into the markdown dialect.
//!
//! Parsing the output reproduces an equal deck, which keeps decks
//! diffable and version-controllable as plain text.

use prez_core::{Deck, SlideRecord};

/// Render a deck as a markdown document.
pub fn to_markdown(deck: &Deck) -> String {
    let mut out = String::new();

    if !deck.metadata.is_empty() {
        out.push_str("---\n");
        for (key, value) in deck.metadata.iter() {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str("---\n\n");
    }

    let slides: Vec<String> = deck.slides.iter().map(render_slide).collect();
    out.push_str(&slides.join("\n\n---\n\n"));
    out.push('\n');
    out
}

fn render_slide(slide: &SlideRecord) -> String {
    match slide {
        SlideRecord::Title { title, subtitle } => {
            let mut block = format!("<!-- type: title -->\n# {title}");
            if let Some(subtitle) = subtitle {
                block.push_str("\n\n");
                block.push_str(subtitle);
            }
            block
        }
        SlideRecord::Content { title, items } => {
            let mut block = format!("# {title}");
            if !items.is_empty() {
                block.push('\n');
            }
            for item in items {
                block.push_str("\n- ");
                block.push_str(item);
            }
            block
        }
        SlideRecord::Section { title, description } => {
            let mut block = format!("<!-- type: section -->\n# {title}");
            if let Some(description) = description {
                block.push_str("\n\n");
                block.push_str(description);
            }
            block
        }
        SlideRecord::Image {
            title,
            image_path,
            caption,
        } => {
            let mut block = format!("<!-- type: image -->\n# {title}\n\n![]({image_path})");
            if let Some(caption) = caption {
                block.push_str("\n\n");
                block.push_str(caption);
            }
            block
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MarkdownParser;
    use prez_core::Metadata;

    fn sample_deck() -> Deck {
        let mut metadata = Metadata::new();
        metadata.insert("title", "Roadmap");
        metadata.insert("author", "Dev Team");

        let mut deck = Deck::new(metadata);
        deck.add_slide(SlideRecord::title_slide(
            "Roadmap 2026",
            Some("Where we are going".to_string()),
        ));
        deck.add_slide(SlideRecord::content_slide(
            "Themes",
            vec!["Stability".to_string(), "Performance".to_string()],
        ));
        deck.add_slide(SlideRecord::section_slide(
            "Details",
            Some("One theme at a time".to_string()),
        ));
        deck.add_slide(SlideRecord::image_slide(
            "Adoption",
            "charts/adoption.png",
            Some("Quarter over quarter".to_string()),
        ));
        deck
    }

    #[test]
    fn test_round_trip_all_slide_kinds() {
        let deck = sample_deck();
        let markdown = to_markdown(&deck);
        let reparsed = MarkdownParser::new().parse(&markdown).unwrap();

        assert_eq!(reparsed, deck);
    }

    #[test]
    fn test_round_trip_optional_fields_absent() {
        let mut deck = Deck::new(Metadata::new());
        deck.add_slide(SlideRecord::title_slide("Bare", None));
        deck.add_slide(SlideRecord::content_slide("Empty", Vec::new()));
        deck.add_slide(SlideRecord::section_slide("Divider", None));
        deck.add_slide(SlideRecord::image_slide("Shot", "shot.png", None));

        let reparsed = MarkdownParser::new().parse(&to_markdown(&deck)).unwrap();
        assert_eq!(reparsed, deck);
    }

    #[test]
    fn test_no_metadata_emits_no_frontmatter() {
        let mut deck = Deck::new(Metadata::new());
        deck.add_slide(SlideRecord::content_slide("Solo", vec!["x".to_string()]));

        let markdown = to_markdown(&deck);
        assert!(markdown.starts_with("# Solo"));
    }

    #[test]
    fn test_metadata_order_survives_round_trip() {
        let deck = sample_deck();
        let reparsed = MarkdownParser::new().parse(&to_markdown(&deck)).unwrap();

        let keys: Vec<&str> = reparsed.metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "author"]);
    }
}
