//! Slide part XML generation.
//!
//! Slides are laid out with positioned text boxes rather than layout
//! placeholders, so the generated package works without any template
//! file. Geometry is expressed in EMUs on a 10 x 7.5 inch canvas.

use crate::parts::{NS_A, NS_P, NS_R};
use prez_core::{Error, Result, SlideRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// EMUs (English Metric Units) per inch.
const EMU_PER_INCH: i64 = 914_400;

/// Slide canvas width, 10 inches.
pub(crate) const SLIDE_CX: i64 = 10 * EMU_PER_INCH;

/// Slide canvas height, 7.5 inches.
pub(crate) const SLIDE_CY: i64 = 6_858_000;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_error<E: std::fmt::Display>(e: E) -> Error {
    Error::XmlError(e.to_string())
}

/// A shape's bounding box in EMUs.
#[derive(Debug, Clone, Copy)]
struct Rect {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

fn rect(x: f64, y: f64, cx: f64, cy: f64) -> Rect {
    let emu = |inches: f64| (inches * EMU_PER_INCH as f64) as i64;
    Rect {
        x: emu(x),
        y: emu(y),
        cx: emu(cx),
        cy: emu(cy),
    }
}

/// One paragraph of a text box. `size` is in hundredths of a point.
#[derive(Debug, Clone, Copy)]
struct Paragraph<'a> {
    text: &'a str,
    size: u32,
    bold: bool,
    centered: bool,
    bullet: bool,
}

impl<'a> Paragraph<'a> {
    fn new(text: &'a str, size: u32) -> Self {
        Self {
            text,
            size,
            bold: false,
            centered: false,
            bullet: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    fn bulleted(mut self) -> Self {
        self.bullet = true;
        self
    }
}

/// Render one slide part.
///
/// `image_rel` is the relationship id of the slide's embedded picture,
/// present only for image slides whose file could be read.
pub(crate) fn slide_xml(record: &SlideRecord, image_rel: Option<&str>) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_error)?;

    write_start(
        &mut writer,
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    write_start(&mut writer, "p:cSld", &[])?;
    write_start(&mut writer, "p:spTree", &[])?;

    write_start(&mut writer, "p:nvGrpSpPr", &[])?;
    write_empty(&mut writer, "p:cNvPr", &[("id", "1"), ("name", "")])?;
    write_empty(&mut writer, "p:cNvGrpSpPr", &[])?;
    write_empty(&mut writer, "p:nvPr", &[])?;
    write_end(&mut writer, "p:nvGrpSpPr")?;
    write_empty(&mut writer, "p:grpSpPr", &[])?;

    write_shapes(&mut writer, record, image_rel)?;

    write_end(&mut writer, "p:spTree")?;
    write_end(&mut writer, "p:cSld")?;
    write_start(&mut writer, "p:clrMapOvr", &[])?;
    write_empty(&mut writer, "a:masterClrMapping", &[])?;
    write_end(&mut writer, "p:clrMapOvr")?;
    write_end(&mut writer, "p:sld")?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::XmlError(e.to_string()))
}

fn write_shapes(writer: &mut XmlWriter, record: &SlideRecord, image_rel: Option<&str>) -> Result<()> {
    match record {
        SlideRecord::Title { title, subtitle } => {
            text_box(
                writer,
                2,
                "Title",
                rect(0.5, 2.2, 9.0, 1.5),
                &[Paragraph::new(title, 4400).bold().centered()],
            )?;
            if let Some(subtitle) = subtitle {
                text_box(
                    writer,
                    3,
                    "Subtitle",
                    rect(0.5, 3.8, 9.0, 1.0),
                    &[Paragraph::new(subtitle, 2400).centered()],
                )?;
            }
        }
        SlideRecord::Content { title, items } => {
            text_box(
                writer,
                2,
                "Title",
                rect(0.5, 0.4, 9.0, 1.0),
                &[Paragraph::new(title, 3200).bold()],
            )?;
            if !items.is_empty() {
                let paragraphs: Vec<Paragraph> = items
                    .iter()
                    .map(|item| Paragraph::new(item, 2000).bulleted())
                    .collect();
                text_box(writer, 3, "Content", rect(0.75, 1.6, 8.5, 5.2), &paragraphs)?;
            }
        }
        SlideRecord::Section { title, description } => {
            text_box(
                writer,
                2,
                "Title",
                rect(0.5, 2.6, 9.0, 1.2),
                &[Paragraph::new(title, 3600).bold().centered()],
            )?;
            if let Some(description) = description {
                text_box(
                    writer,
                    3,
                    "Description",
                    rect(0.5, 3.9, 9.0, 1.0),
                    &[Paragraph::new(description, 2000).centered()],
                )?;
            }
        }
        SlideRecord::Image { title, caption, .. } => {
            text_box(
                writer,
                2,
                "Title",
                rect(0.5, 0.5, 9.0, 1.0),
                &[Paragraph::new(title, 2800).bold()],
            )?;
            if let Some(rel) = image_rel {
                picture(writer, 3, rel, rect(1.0, 1.5, 8.0, 4.5))?;
            }
            if let Some(caption) = caption {
                text_box(
                    writer,
                    4,
                    "Caption",
                    rect(1.0, 6.3, 8.0, 0.8),
                    &[Paragraph::new(caption, 1600).centered()],
                )?;
            }
        }
    }
    Ok(())
}

/// Write a positioned text box shape.
fn text_box(
    writer: &mut XmlWriter,
    id: usize,
    name: &str,
    bounds: Rect,
    paragraphs: &[Paragraph],
) -> Result<()> {
    let id = id.to_string();

    write_start(writer, "p:sp", &[])?;

    write_start(writer, "p:nvSpPr", &[])?;
    write_empty(writer, "p:cNvPr", &[("id", &id), ("name", name)])?;
    write_empty(writer, "p:cNvSpPr", &[("txBox", "1")])?;
    write_empty(writer, "p:nvPr", &[])?;
    write_end(writer, "p:nvSpPr")?;

    write_start(writer, "p:spPr", &[])?;
    write_xfrm(writer, bounds)?;
    write_start(writer, "a:prstGeom", &[("prst", "rect")])?;
    write_empty(writer, "a:avLst", &[])?;
    write_end(writer, "a:prstGeom")?;
    write_end(writer, "p:spPr")?;

    write_start(writer, "p:txBody", &[])?;
    write_empty(writer, "a:bodyPr", &[("wrap", "square")])?;
    write_empty(writer, "a:lstStyle", &[])?;
    for paragraph in paragraphs {
        write_paragraph(writer, paragraph)?;
    }
    write_end(writer, "p:txBody")?;

    write_end(writer, "p:sp")
}

fn write_paragraph(writer: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    write_start(writer, "a:p", &[])?;

    if paragraph.centered || paragraph.bullet {
        let mut ppr = BytesStart::new("a:pPr");
        if paragraph.centered {
            ppr.push_attribute(("algn", "ctr"));
        }
        writer.write_event(Event::Start(ppr)).map_err(xml_error)?;
        if paragraph.bullet {
            write_empty(writer, "a:buChar", &[("char", "\u{2022}")])?;
        }
        write_end(writer, "a:pPr")?;
    }

    write_start(writer, "a:r", &[])?;
    let size = paragraph.size.to_string();
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US"), ("sz", &size)];
    if paragraph.bold {
        attrs.push(("b", "1"));
    }
    write_empty(writer, "a:rPr", &attrs)?;
    write_start(writer, "a:t", &[])?;
    writer
        .write_event(Event::Text(BytesText::new(paragraph.text)))
        .map_err(xml_error)?;
    write_end(writer, "a:t")?;
    write_end(writer, "a:r")?;

    write_end(writer, "a:p")
}

/// Write an embedded picture shape referencing a slide relationship.
fn picture(writer: &mut XmlWriter, id: usize, rel: &str, bounds: Rect) -> Result<()> {
    let id = id.to_string();

    write_start(writer, "p:pic", &[])?;

    write_start(writer, "p:nvPicPr", &[])?;
    write_empty(writer, "p:cNvPr", &[("id", &id), ("name", "Picture")])?;
    write_empty(writer, "p:cNvPicPr", &[])?;
    write_empty(writer, "p:nvPr", &[])?;
    write_end(writer, "p:nvPicPr")?;

    write_start(writer, "p:blipFill", &[])?;
    write_empty(writer, "a:blip", &[("r:embed", rel)])?;
    write_start(writer, "a:stretch", &[])?;
    write_empty(writer, "a:fillRect", &[])?;
    write_end(writer, "a:stretch")?;
    write_end(writer, "p:blipFill")?;

    write_start(writer, "p:spPr", &[])?;
    write_xfrm(writer, bounds)?;
    write_start(writer, "a:prstGeom", &[("prst", "rect")])?;
    write_empty(writer, "a:avLst", &[])?;
    write_end(writer, "a:prstGeom")?;
    write_end(writer, "p:spPr")?;

    write_end(writer, "p:pic")
}

fn write_xfrm(writer: &mut XmlWriter, bounds: Rect) -> Result<()> {
    let (x, y) = (bounds.x.to_string(), bounds.y.to_string());
    let (cx, cy) = (bounds.cx.to_string(), bounds.cy.to_string());

    write_start(writer, "a:xfrm", &[])?;
    write_empty(writer, "a:off", &[("x", &x), ("y", &y)])?;
    write_empty(writer, "a:ext", &[("cx", &cx), ("cy", &cy)])?;
    write_end(writer, "a:xfrm")
}

fn write_start(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    writer.write_event(Event::Start(elem)).map_err(xml_error)
}

fn write_empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    writer.write_event(Event::Empty(elem)).map_err(xml_error)
}

fn write_end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_slide_has_title_and_subtitle_runs() {
        let record = SlideRecord::title_slide("Hello", Some("World".to_string()));
        let xml = slide_xml(&record, None).unwrap();

        assert!(xml.contains("<a:t>Hello</a:t>"));
        assert!(xml.contains("<a:t>World</a:t>"));
        assert!(xml.contains("algn=\"ctr\""));
    }

    #[test]
    fn test_content_items_are_bulleted() {
        let record = SlideRecord::content_slide(
            "Agenda",
            vec!["First".to_string(), "Second".to_string()],
        );
        let xml = slide_xml(&record, None).unwrap();

        assert!(xml.contains("<a:t>First</a:t>"));
        assert!(xml.contains("<a:t>Second</a:t>"));
        assert_eq!(xml.matches("a:buChar").count(), 2);
    }

    #[test]
    fn test_text_is_escaped() {
        let record = SlideRecord::content_slide("A & B <C>", Vec::new());
        let xml = slide_xml(&record, None).unwrap();

        assert!(xml.contains("A &amp; B &lt;C&gt;"));
        assert!(!xml.contains("<a:t>A & B"));
    }

    #[test]
    fn test_image_slide_with_relationship_embeds_picture() {
        let record = SlideRecord::image_slide("Chart", "chart.png", None);
        let xml = slide_xml(&record, Some("rId2")).unwrap();

        assert!(xml.contains("<p:pic>"));
        assert!(xml.contains("r:embed=\"rId2\""));
    }

    #[test]
    fn test_image_slide_without_relationship_has_no_picture() {
        let record = SlideRecord::image_slide("Chart", "missing.png", None);
        let xml = slide_xml(&record, None).unwrap();

        assert!(!xml.contains("<p:pic>"));
        assert!(xml.contains("<a:t>Chart</a:t>"));
    }

    #[test]
    fn test_section_description_rendered() {
        let record =
            SlideRecord::section_slide("Part Two", Some("Advanced topics".to_string()));
        let xml = slide_xml(&record, None).unwrap();

        assert!(xml.contains("<a:t>Part Two</a:t>"));
        assert!(xml.contains("<a:t>Advanced topics</a:t>"));
    }
}
