// Page-1 header: brand logo, title, tenant logo and the session info grid

use crate::format::{format_tax_id, format_timestamp};
use crate::geometry::{
    Rect, CONTENT_WIDTH_PT, HEADER_BLOCK_HEIGHT_PT, LOGO_BOX_HEIGHT_PT, LOGO_BOX_WIDTH_PT,
    MARGIN_PT,
};
use crate::image::DecodedImage;
use crate::model::ReportModel;
use crate::page::PageManager;
use crate::surface::{ink, Surface};
use crate::text::{fit_cell, fit_with_ellipsis, Font};

const TITLE_FONT_SIZE: f32 = 15.0;
const SUBTITLE_FONT_SIZE: f32 = 9.0;
const GRID_FONT_SIZE: f32 = 8.5;

/// Space between a logo box and the title
const TITLE_GAP_PT: f32 = 8.0;

const GRID_TOP_OFFSET_PT: f32 = 72.0;
const GRID_ROW_HEIGHT_PT: f32 = 13.0;
const GRID_LABEL_WIDTH_PT: f32 = 58.0;
const GRID_COLUMN_GAP_PT: f32 = 12.0;

/// Longest tenant-supplied value shown in the grid
const GRID_VALUE_CHAR_BUDGET: usize = 60;

pub struct HeaderLogos<'a> {
    pub brand: Option<&'a DecodedImage>,
    pub tenant: Option<&'a DecodedImage>,
}

/// Draw the full header at the top of the first page. Allocates that page
/// if needed.
pub fn draw_header_block<S: Surface>(
    pages: &mut PageManager<S>,
    title: &str,
    logos: &HeaderLogos<'_>,
    model: &ReportModel,
) {
    pages.ensure_space(HEADER_BLOCK_HEIGHT_PT);
    let top = pages.y();
    let surface = pages.surface();

    // Logo row
    let left_box = Rect::new(
        MARGIN_PT,
        top - LOGO_BOX_HEIGHT_PT,
        LOGO_BOX_WIDTH_PT,
        LOGO_BOX_HEIGHT_PT,
    );
    let right_box = Rect::new(
        MARGIN_PT + CONTENT_WIDTH_PT - LOGO_BOX_WIDTH_PT,
        top - LOGO_BOX_HEIGHT_PT,
        LOGO_BOX_WIDTH_PT,
        LOGO_BOX_HEIGHT_PT,
    );
    for (logo, bounds) in [(logos.brand, left_box), (logos.tenant, right_box)] {
        if let Some(img) = logo {
            if let Some(at) = img.place_in(bounds) {
                surface.image(img, at);
            }
        }
    }

    // Title between the logos
    let title_left = left_box.right() + TITLE_GAP_PT;
    let title_width = right_box.x - TITLE_GAP_PT - title_left;
    let title_area = Rect::new(title_left, left_box.y, title_width, LOGO_BOX_HEIGHT_PT);

    let title = fit_with_ellipsis(title, Font::Bold, TITLE_FONT_SIZE, title_width);
    draw_centered(
        surface,
        &title,
        Font::Bold,
        TITLE_FONT_SIZE,
        title_area,
        top - 24.0,
        ink::TEXT,
    );

    let subtitle = fit_cell(
        &model.company.legal_name,
        GRID_VALUE_CHAR_BUDGET,
        Font::Regular,
        SUBTITLE_FONT_SIZE,
        title_width,
    );
    draw_centered(
        surface,
        &subtitle,
        Font::Regular,
        SUBTITLE_FONT_SIZE,
        title_area,
        top - 40.0,
        ink::MUTED,
    );

    let rule_y = top - LOGO_BOX_HEIGHT_PT - 8.0;
    surface.line((MARGIN_PT, rule_y), (MARGIN_PT + CONTENT_WIDTH_PT, rule_y), 0.6, ink::TEXT);

    // Info grid
    let company = &model.company;
    let session = &model.session;
    let left_rows = [
        ("Company", company.name.clone()),
        ("Tax ID", format_tax_id(&company.tax_id)),
        ("Address", company.address.clone()),
        ("Topic", session.topic.clone()),
        ("Location", session.location.clone()),
    ];
    let right_rows = [
        ("Session", session.code.clone()),
        ("Date", format_timestamp(&session.scheduled_at)),
        ("Trainer", session.trainer_name.clone()),
        ("Closed at", format_timestamp(&session.closed_at)),
    ];

    let column_width = (CONTENT_WIDTH_PT - GRID_COLUMN_GAP_PT) / 2.0;
    let grid_top = top - GRID_TOP_OFFSET_PT;
    draw_grid_column(surface, &left_rows, MARGIN_PT, column_width, grid_top);
    draw_grid_column(
        surface,
        &right_rows,
        MARGIN_PT + column_width + GRID_COLUMN_GAP_PT,
        column_width,
        grid_top,
    );

    pages.advance(HEADER_BLOCK_HEIGHT_PT);
}

fn draw_grid_column<S: Surface>(
    surface: &mut S,
    rows: &[(&str, String)],
    x: f32,
    width: f32,
    top: f32,
) {
    let value_width = width - GRID_LABEL_WIDTH_PT;
    for (i, (label, value)) in rows.iter().enumerate() {
        let baseline = top - i as f32 * GRID_ROW_HEIGHT_PT - 9.0;
        surface.text(label, Font::Bold, GRID_FONT_SIZE, x, baseline, ink::TEXT);

        let value = fit_cell(
            value,
            GRID_VALUE_CHAR_BUDGET,
            Font::Regular,
            GRID_FONT_SIZE,
            value_width,
        );
        surface.text(
            &value,
            Font::Regular,
            GRID_FONT_SIZE,
            x + GRID_LABEL_WIDTH_PT,
            baseline,
            ink::TEXT,
        );
    }
}

/// Draw `text` horizontally centered in `area` at `baseline`.
pub(crate) fn draw_centered<S: Surface>(
    surface: &mut S,
    text: &str,
    font: Font,
    size: f32,
    area: Rect,
    baseline: f32,
    gray: f32,
) {
    let width = font.text_width(text, size);
    let x = area.x + ((area.width - width) / 2.0).max(0.0);
    surface.text(text, font, size, x, baseline, gray);
}
