//! Page geometry and drawing primitives shared by both form layouts.
//!
//! Field positions are designed top-left-origin (as on the paper forms);
//! PDF user space is bottom-left-origin. [`from_top`] is the single place
//! that conversion happens — layout tables never pre-flip their y values.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, CustomPdfConformance, Image, ImageTransform, IndirectFontRef, Mm,
    PdfConformance, PdfDocument, PdfDocumentReference, PdfLayerReference, Pt,
};

use super::ComposeError;

/// A4-equivalent page in layout units (PostScript points).
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Resolution signature images are embedded at.
const IMAGE_DPI: f32 = 300.0;

/// Design y (measured from the top edge) → PDF y (from the bottom edge).
pub(crate) fn from_top(y_design: f32) -> Mm {
    Mm::from(Pt(PAGE_HEIGHT - y_design))
}

pub(crate) fn x_pos(x: f32) -> Mm {
    Mm::from(Pt(x))
}

/// One in-progress PDF document: fixed Helvetica, black text, and pinned
/// metadata dates so identical inputs yield identical bytes.
pub struct Compositor {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
}

/// Drawing surface for one page.
pub struct PageCanvas {
    layer: PdfLayerReference,
    font: IndirectFontRef,
}

impl Compositor {
    /// Creates a document with its first page.
    pub fn new(title: &str) -> Result<(Self, PageCanvas), ComposeError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm::from(Pt(PAGE_WIDTH)),
            Mm::from(Pt(PAGE_HEIGHT)),
            "Layer 1",
        );
        // Default conformance stamps XMP metadata with a fresh document id
        // and the current time; both would break byte-determinism.
        let doc = doc
            .with_conformance(PdfConformance::Custom(CustomPdfConformance {
                requires_icc_profile: false,
                requires_xmp_metadata: false,
                ..Default::default()
            }))
            .with_creation_date(time::OffsetDateTime::UNIX_EPOCH)
            .with_mod_date(time::OffsetDateTime::UNIX_EPOCH);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ComposeError::Font(e.to_string()))?;

        let canvas = PageCanvas {
            layer: doc.get_page(page).get_layer(layer),
            font: font.clone(),
        };
        Ok((Self { doc, font }, canvas))
    }

    /// Appends a page. Observed forms fit on one page, but the layout
    /// helpers do not assume it.
    pub fn add_page(&self) -> PageCanvas {
        let (page, layer) = self.doc.add_page(
            Mm::from(Pt(PAGE_WIDTH)),
            Mm::from(Pt(PAGE_HEIGHT)),
            "Layer 1",
        );
        PageCanvas {
            layer: self.doc.get_page(page).get_layer(layer),
            font: self.font.clone(),
        }
    }

    /// Serializes the document to bytes.
    pub fn finish(self) -> Result<Vec<u8>, ComposeError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ComposeError::Save(e.to_string()))?;
        let bytes = buf
            .into_inner()
            .map_err(|e| ComposeError::Save(e.to_string()))?;
        pin_trailer_id(&bytes)
    }
}

/// `printpdf` stamps a freshly randomized `/ID` pair into the file trailer
/// on every save, which would make two compositions of the same record
/// differ. Reload the saved bytes and pin the pair to a fixed value.
fn pin_trailer_id(bytes: &[u8]) -> Result<Vec<u8>, ComposeError> {
    use printpdf::lopdf::{Document, Object, StringFormat};

    let mut doc = Document::load_mem(bytes).map_err(|e| ComposeError::Save(e.to_string()))?;
    let id = Object::String(vec![0u8; 16], StringFormat::Hexadecimal);
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ComposeError::Save(e.to_string()))?;
    Ok(out)
}

impl PageCanvas {
    /// Draws one line of text at a design coordinate. No wrapping; long
    /// values overflow visually, which the layout accepts.
    pub fn text(&self, text: &str, x: f32, y: f32, size: f32) {
        self.layer.use_text(text, size, x_pos(x), from_top(y), &self.font);
    }

    /// Embeds a raster image scaled into the box whose bottom edge sits at
    /// design `y`. Returns false (and draws nothing) when the bytes do not
    /// decode, so the caller can skip the caption too.
    pub fn image(&self, bytes: &[u8], x: f32, y: f32, width: f32, height: f32) -> bool {
        let decoded = match printpdf::image_crate::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("Skipping image that failed to decode: {e}");
                return false;
            }
        };
        let (px_w, px_h) = (decoded.width(), decoded.height());
        if px_w == 0 || px_h == 0 {
            tracing::warn!("Skipping zero-sized image");
            return false;
        }

        let image = Image::from_dynamic_image(&decoded);
        let natural_w_pt = px_w as f32 * 72.0 / IMAGE_DPI;
        let natural_h_pt = px_h as f32 * 72.0 / IMAGE_DPI;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(x_pos(x)),
                translate_y: Some(from_top(y)),
                scale_x: Some(width / natural_w_pt),
                scale_y: Some(height / natural_h_pt),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::testutil;

    #[test]
    fn from_top_flips_against_page_height() {
        // Design y=60 from the top must land 782pt above the bottom edge.
        let flipped = from_top(60.0);
        let expected = Mm::from(Pt(782.0));
        assert!((flipped.0 - expected.0).abs() < 0.001);
    }

    #[test]
    fn from_top_of_zero_is_page_top() {
        let top = from_top(0.0);
        let expected = Mm::from(Pt(PAGE_HEIGHT));
        assert!((top.0 - expected.0).abs() < 0.001);
    }

    #[test]
    fn finish_produces_pdf_bytes() {
        let (doc, canvas) = Compositor::new("Smoke Test").unwrap();
        canvas.text("hello", 40.0, 100.0, 10.0);
        let bytes = doc.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn finish_pins_the_trailer_id() {
        // Each save normally gets a random trailer /ID pair; two otherwise
        // identical documents must still serialize to the same bytes.
        let render = || {
            let (doc, canvas) = Compositor::new("Trailer").unwrap();
            canvas.text("same content", 40.0, 100.0, 10.0);
            doc.finish().unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn text_draws_at_flipped_coordinate() {
        let (doc, canvas) = Compositor::new("Coordinates").unwrap();
        canvas.text("MARKER", 230.0, 60.0, 12.0);
        let bytes = doc.finish().unwrap();

        let positions = testutil::text_positions(&bytes, "MARKER");
        assert_eq!(positions.len(), 1);
        let (x, y) = positions[0];
        assert!((x - 230.0).abs() < 0.1, "x was {x}");
        assert!((y - 782.0).abs() < 0.1, "y was {y}");
    }

    #[test]
    fn image_rejects_undecodable_bytes() {
        let (_doc, canvas) = Compositor::new("Bad Image").unwrap();
        assert!(!canvas.image(b"not an image", 40.0, 480.0, 120.0, 40.0));
    }

    #[test]
    fn image_accepts_valid_png() {
        let (doc, canvas) = Compositor::new("Good Image").unwrap();
        assert!(canvas.image(&testutil::tiny_png(), 40.0, 480.0, 120.0, 40.0));
        let bytes = doc.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn add_page_allows_multi_page_documents() {
        let (doc, first) = Compositor::new("Two Pages").unwrap();
        first.text("page one", 40.0, 100.0, 10.0);
        let second = doc.add_page();
        second.text("page two", 40.0, 100.0, 10.0);
        let bytes = doc.finish().unwrap();
        assert!(testutil::contains_text(&bytes, "page one"));
        assert!(testutil::contains_text(&bytes, "page two"));
    }
}
