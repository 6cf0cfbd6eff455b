//! Deck to .pptx package assembly.

use crate::{parts, slide};
use prez_core::{Deck, Error, Result, SlideRecord};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer that renders a deck into a PPTX package.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter;

/// An image file loaded for embedding into the package.
struct EmbeddedImage {
    part_name: String,
    extension: String,
    bytes: Vec<u8>,
}

impl EmbeddedImage {
    /// Relationship target as seen from a slide part.
    fn target(&self) -> String {
        let relative = self
            .part_name
            .strip_prefix("ppt/")
            .unwrap_or(&self.part_name);
        format!("../{relative}")
    }
}

impl PptxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the deck as a .pptx file at `path`, creating parent
    /// directories as needed.
    pub fn write_file(&self, deck: &Deck, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut sink = BufWriter::new(file);
        self.write(deck, &mut sink)?;
        sink.flush()?;
        Ok(())
    }

    /// Write the deck as a .pptx package to any seekable sink.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, sink: &mut W) -> Result<()> {
        let mut archive = ZipWriter::new(sink);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        // Load embeddable images up front so relationship targets and
        // content-type defaults are known before any part is written.
        let mut embedded: Vec<Option<EmbeddedImage>> = Vec::with_capacity(deck.slide_count());
        let mut extensions: Vec<String> = Vec::new();
        let mut media_count = 0;
        for record in &deck.slides {
            let image = match record {
                SlideRecord::Image { image_path, .. } => load_image(image_path, media_count + 1),
                _ => None,
            };
            if let Some(image) = &image {
                media_count += 1;
                if !extensions.contains(&image.extension) {
                    extensions.push(image.extension.clone());
                }
            }
            embedded.push(image);
        }

        add_part(
            &mut archive,
            options,
            "[Content_Types].xml",
            &parts::content_types(deck.slide_count(), &extensions),
        )?;
        add_part(&mut archive, options, "_rels/.rels", parts::ROOT_RELS)?;
        add_part(
            &mut archive,
            options,
            "ppt/presentation.xml",
            &parts::presentation_xml(deck.slide_count()),
        )?;
        add_part(
            &mut archive,
            options,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(deck.slide_count()),
        )?;
        add_part(
            &mut archive,
            options,
            "ppt/slideMasters/slideMaster1.xml",
            parts::SLIDE_MASTER,
        )?;
        add_part(
            &mut archive,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::SLIDE_MASTER_RELS,
        )?;
        add_part(
            &mut archive,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            parts::SLIDE_LAYOUT,
        )?;
        add_part(
            &mut archive,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::SLIDE_LAYOUT_RELS,
        )?;
        add_part(&mut archive, options, "ppt/theme/theme1.xml", parts::THEME)?;

        for (index, (record, image)) in deck.slides.iter().zip(&embedded).enumerate() {
            let number = index + 1;
            let image_rel = image.as_ref().map(|_| "rId2");
            let xml = slide::slide_xml(record, image_rel)?;
            add_part(
                &mut archive,
                options,
                &format!("ppt/slides/slide{number}.xml"),
                &xml,
            )?;

            let target = image.as_ref().map(|img| img.target());
            add_part(
                &mut archive,
                options,
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &parts::slide_rels(target.as_deref()),
            )?;
        }

        for image in embedded.into_iter().flatten() {
            archive
                .start_file(image.part_name.as_str(), options)
                .map_err(zip_error)?;
            archive.write_all(&image.bytes)?;
        }

        archive.finish().map_err(zip_error)?;
        log::debug!("wrote {} slides", deck.slide_count());
        Ok(())
    }
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::ZipError(e.to_string())
}

fn add_part<W: Write + Seek>(
    archive: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    archive.start_file(name, options).map_err(zip_error)?;
    archive.write_all(content.as_bytes())?;
    Ok(())
}

/// Try to load an image file for embedding.
///
/// Unsupported extensions and unreadable files render the slide
/// without a picture; the slide itself still carries its title and
/// caption.
fn load_image(path: &str, number: usize) -> Option<EmbeddedImage> {
    let extension = match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(extension) => extension.to_lowercase(),
        None => {
            log::warn!("image `{path}` has no file extension, skipping embed");
            return None;
        }
    };

    if parts::image_content_type(&extension).is_none() {
        log::warn!("image `{path}` has unsupported extension `{extension}`, skipping embed");
        return None;
    }

    match std::fs::read(path) {
        Ok(bytes) => Some(EmbeddedImage {
            part_name: format!("ppt/media/image{number}.{extension}"),
            extension,
            bytes,
        }),
        Err(e) => {
            log::warn!("could not read image `{path}`: {e}");
            None
        }
    }
}
