// Document assembly: header, table, trainer signature, serialization

use chrono::{DateTime, Utc};

use crate::assets::{first_available, storage_path, try_load_image, AssetResolver, DocumentStore};
use crate::error::ReportError;
use crate::format::format_timestamp;
use crate::geometry::{Rect, CONTENT_WIDTH_PT, MARGIN_PT, SIGNATURE_BLOCK_HEIGHT_PT};
use crate::header::{draw_centered, draw_header_block, HeaderLogos};
use crate::model::{AssetRef, ReportModel};
use crate::page::{Cursor, PageManager};
use crate::surface::{ink, PdfSurface, Surface};
use crate::table::{draw_banner, draw_table, RowPlacement, SignatureCell, SIGNATURE_PLACEHOLDER};
use crate::text::{fit_cell, Font};

pub const DEFAULT_TITLE: &str = "Attendance Record";

const SIGNATURE_BOX_WIDTH_PT: f32 = 220.0;
const SIGNATURE_BOX_HEIGHT_PT: f32 = 52.0;
const SIGNATURE_INSET_PT: f32 = 4.0;
const CAPTION_FONT_SIZE: f32 = 8.5;
const NAME_FONT_SIZE: f32 = 9.0;
const NOTE_FONT_SIZE: f32 = 7.0;
const NAME_CHAR_BUDGET: usize = 60;

/// Per-deployment settings for rendering.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub title: String,
    /// Brand logo candidates, tried in order
    pub brand_logo: Vec<AssetRef>,
    /// Timestamp for the proposed storage path; now if unset
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            brand_logo: Vec::new(),
            generated_at: None,
        }
    }
}

/// How the document was laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    pub pages: usize,
    pub rows: Vec<RowPlacement>,
    /// Page carrying the trainer signature block
    pub signature_page: usize,
    pub trainer_signature: SignatureCell,
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    /// Proposed location for the document store
    pub storage_path: String,
    pub layout: LayoutSummary,
}

/// Renders reports against one asset resolver. Holds no per-render state,
/// so one renderer can serve concurrent renders.
pub struct ReportRenderer<'a> {
    resolver: &'a dyn AssetResolver,
    config: ReportConfig,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(resolver: &'a dyn AssetResolver, config: ReportConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Validate the model, lay it out and serialize it to PDF bytes.
    pub fn render(&self, model: &ReportModel) -> Result<RenderedReport, ReportError> {
        model.validate()?;

        let surface = PdfSurface::new(&self.config.title)?;
        let (surface, layout) = self.layout(surface, model);
        let bytes = surface.finish()?;

        let generated_at = self.config.generated_at.unwrap_or_else(Utc::now);
        let storage_path = storage_path(&model.session.code, &generated_at);

        log::info!(
            "Rendered session {}: {} attendee(s), {} page(s), {} bytes",
            model.session.code,
            layout.rows.len(),
            layout.pages,
            bytes.len()
        );

        Ok(RenderedReport {
            bytes,
            storage_path,
            layout,
        })
    }

    /// Render, then persist at the proposed storage path.
    pub fn render_and_store(
        &self,
        model: &ReportModel,
        store: &dyn DocumentStore,
    ) -> Result<RenderedReport, ReportError> {
        let report = self.render(model)?;
        store
            .store(&report.bytes, &report.storage_path)
            .map_err(|source| ReportError::StoreError {
                path: report.storage_path.clone(),
                source,
            })?;
        Ok(report)
    }

    /// Single top-to-bottom pass over an already validated model.
    pub(crate) fn layout<S: Surface + 'static>(
        &self,
        surface: S,
        model: &ReportModel,
    ) -> (S, LayoutSummary) {
        let session = &model.session;
        let mut pages = PageManager::new(surface, format!("Session {}", session.code));

        let brand = first_available(self.resolver, &self.config.brand_logo);
        let tenant = try_load_image(self.resolver, model.company.logo.as_ref());
        let logos = HeaderLogos {
            brand: brand.as_ref(),
            tenant: tenant.as_ref(),
        };
        draw_header_block(&mut pages, &self.config.title, &logos, model);

        let banner = format!("{} · session {} (continued)", self.config.title, session.code);
        let rows = draw_table(&mut pages, &banner, &model.attendees, self.resolver);

        // A page opened for the signature block gets the banner but no column header
        pages.set_repeat_header(Box::new(move |surface: &mut S, cursor: &Cursor| {
            draw_banner(surface, cursor.y(), &banner)
        }));
        let trainer_signature = draw_signature_block(&mut pages, model, self.resolver);
        let signature_page = pages.page();

        let (surface, page_count) = pages.finish();
        let summary = LayoutSummary {
            pages: page_count,
            rows,
            signature_page,
            trainer_signature,
        };
        (surface, summary)
    }
}

/// Render with the default configuration.
pub fn render_report(
    model: &ReportModel,
    resolver: &dyn AssetResolver,
) -> Result<RenderedReport, ReportError> {
    ReportRenderer::new(resolver, ReportConfig::default()).render(model)
}

/// Closing block: caption, trainer signature (or placeholder), name line.
fn draw_signature_block<S: Surface>(
    pages: &mut PageManager<S>,
    model: &ReportModel,
    resolver: &dyn AssetResolver,
) -> SignatureCell {
    let session = &model.session;
    let signature = try_load_image(resolver, session.trainer_signature.as_ref());

    pages.ensure_space(SIGNATURE_BLOCK_HEIGHT_PT);
    let top = pages.y();
    let surface = pages.surface();

    let column = Rect::new(
        MARGIN_PT + (CONTENT_WIDTH_PT - SIGNATURE_BOX_WIDTH_PT) / 2.0,
        top - SIGNATURE_BLOCK_HEIGHT_PT,
        SIGNATURE_BOX_WIDTH_PT,
        SIGNATURE_BLOCK_HEIGHT_PT,
    );
    draw_centered(
        surface,
        "Trainer signature",
        Font::Bold,
        CAPTION_FONT_SIZE,
        column,
        top - 12.0,
        ink::TEXT,
    );

    let sig_box = Rect::new(
        column.x,
        top - 18.0 - SIGNATURE_BOX_HEIGHT_PT,
        SIGNATURE_BOX_WIDTH_PT,
        SIGNATURE_BOX_HEIGHT_PT,
    );
    let placed = signature
        .as_ref()
        .and_then(|img| img.place_in(sig_box.inset(SIGNATURE_INSET_PT)).map(|at| (img, at)));
    let cell = match placed {
        Some((img, at)) => {
            surface.image(img, at);
            SignatureCell::Image
        }
        None => {
            draw_centered(
                surface,
                SIGNATURE_PLACEHOLDER,
                Font::Regular,
                NOTE_FONT_SIZE,
                sig_box,
                sig_box.center_y() - NOTE_FONT_SIZE * 0.35,
                ink::MUTED,
            );
            SignatureCell::Placeholder
        }
    };

    let rule_y = sig_box.y - 2.0;
    surface.line((column.x, rule_y), (column.right(), rule_y), 0.6, ink::TEXT);

    let name = fit_cell(
        &session.trainer_name,
        NAME_CHAR_BUDGET,
        Font::Bold,
        NAME_FONT_SIZE,
        SIGNATURE_BOX_WIDTH_PT,
    );
    draw_centered(
        surface,
        &name,
        Font::Bold,
        NAME_FONT_SIZE,
        column,
        rule_y - 10.0,
        ink::TEXT,
    );
    draw_centered(
        surface,
        &format!("Closed at {}", format_timestamp(&session.closed_at)),
        Font::Regular,
        NOTE_FONT_SIZE,
        column,
        rule_y - 17.0,
        ink::MUTED,
    );

    pages.advance(SIGNATURE_BLOCK_HEIGHT_PT);
    log::debug!("Signature block placed on page {}", pages.page());
    cell
}
