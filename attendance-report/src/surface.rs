// Drawing surface: the layout code draws through this trait, printpdf does the bytes

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::{BufWriter, Cursor};

use crate::error::ReportError;
use crate::geometry::{Rect, PAGE_HEIGHT_PT, PAGE_WIDTH_PT, PT_TO_MM};
use crate::image::DecodedImage;
use crate::text::Font;

/// Gray levels, 0.0 = black
pub mod ink {
    pub const TEXT: f32 = 0.0;
    pub const MUTED: f32 = 0.45;
    pub const RULE: f32 = 0.7;
    pub const SHADE: f32 = 0.92;
}

/// A page-oriented canvas in PDF points. `begin_page` must be called before
/// anything is drawn; drawing always targets the most recent page.
pub trait Surface {
    fn begin_page(&mut self);
    fn text(&mut self, text: &str, font: Font, size: f32, x: f32, baseline: f32, gray: f32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, gray: f32);
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, gray: f32);
    fn fill_rect(&mut self, rect: Rect, gray: f32);
    fn image(&mut self, image: &DecodedImage, at: Rect);
}

fn mm(pt: f32) -> Mm {
    Mm(pt * PT_TO_MM)
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn rect_points(rect: Rect) -> Vec<(Point, bool)> {
    vec![
        (Point::new(mm(rect.x), mm(rect.y)), false),
        (Point::new(mm(rect.right()), mm(rect.y)), false),
        (Point::new(mm(rect.right()), mm(rect.top())), false),
        (Point::new(mm(rect.x), mm(rect.top())), false),
    ]
}

// ============================================================================
// PDF surface
// ============================================================================

pub struct PdfSurface {
    doc: PdfDocumentReference,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
}

impl PdfSurface {
    pub fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");

        let font_regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::PdfError(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::PdfError(e.to_string()))?;

        Ok(Self {
            doc,
            first_page: Some((page1, layer1)),
            layer: None,
            font_regular,
            font_bold,
        })
    }

    fn font(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.font_regular,
            Font::Bold => &self.font_bold,
        }
    }

    /// Serialize the document. Encoder errors are passed through untouched.
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buf));
            self.doc
                .save(&mut writer)
                .map_err(|e| ReportError::PdfError(e.to_string()))?;
        }
        Ok(buf)
    }
}

impl Surface for PdfSurface {
    fn begin_page(&mut self) {
        // The document is created with its first page already allocated
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self
                .doc
                .add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1"),
        };
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
    }

    fn text(&mut self, text: &str, font: Font, size: f32, x: f32, baseline: f32, level: f32) {
        if let Some(layer) = &self.layer {
            layer.set_fill_color(gray(level));
            layer.use_text(text, size, mm(x), mm(baseline), self.font(font));
        }
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, level: f32) {
        if let Some(layer) = &self.layer {
            layer.set_outline_color(gray(level));
            layer.set_outline_thickness(thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            });
        }
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, level: f32) {
        if let Some(layer) = &self.layer {
            layer.set_outline_color(gray(level));
            layer.set_outline_thickness(thickness);
            layer.add_line(Line {
                points: rect_points(rect),
                is_closed: true,
            });
        }
    }

    fn fill_rect(&mut self, rect: Rect, level: f32) {
        if let Some(layer) = &self.layer {
            layer.set_fill_color(gray(level));
            layer.add_polygon(Polygon {
                rings: vec![rect_points(rect)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
    }

    fn image(&mut self, image: &DecodedImage, at: Rect) {
        let Some(layer) = &self.layer else {
            return;
        };

        let xobject = Image::from(ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.rgb.clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // One DPI for both axes keeps the aspect ratio: width_pt = px * 72 / dpi
        let dpi = image.width as f32 * 72.0 / at.width;

        xobject.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(mm(at.x)),
                translate_y: Some(mm(at.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }
}

// ============================================================================
// Recording surface (tests)
// ============================================================================
