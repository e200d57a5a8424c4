// Attendee table: column header row and fixed-height attendee rows

use crate::assets::{try_load_image, AssetResolver};
use crate::format::{format_date, format_tax_id, format_time};
use crate::geometry::{
    Column, Rect, BANNER_HEIGHT_PT, CELL_PADDING_PT, CONTENT_WIDTH_PT, MARGIN_PT, ROW_HEIGHT_PT,
    TABLE_HEADER_HEIGHT_PT,
};
use crate::header::draw_centered;
use crate::image::DecodedImage;
use crate::model::AttendeeRecord;
use crate::page::{Cursor, PageManager, RepeatHeader};
use crate::surface::{ink, Surface};
use crate::text::{fit_cell, fit_with_ellipsis, wrap_clamped, Font};

/// Drawn in the signature cell when there is no usable signature image
pub const SIGNATURE_PLACEHOLDER: &str = "no signature";

const HEADER_FONT_SIZE: f32 = 7.0;
const BANNER_FONT_SIZE: f32 = 9.0;
const CELL_FONT_SIZE: f32 = 8.5;
const SMALL_FONT_SIZE: f32 = 7.5;
const PLACEHOLDER_FONT_SIZE: f32 = 7.0;

const NAME_CHAR_BUDGET: usize = 48;
const TAX_ID_CHAR_BUDGET: usize = 20;
const ROLE_MAX_LINES: usize = 2;
const ROLE_LINE_HEIGHT_PT: f32 = 9.0;

/// Inset of the signature image inside its cell
const SIGNATURE_INSET_PT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCell {
    Image,
    Placeholder,
}

/// Where one attendee row ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlacement {
    /// 1-based, continuous across pages
    pub index: usize,
    pub page: usize,
    pub signature: SignatureCell,
}

/// Draw the table starting at the cursor, breaking pages as rows require.
/// Continuation pages get `banner` and the column header row.
pub fn draw_table<S: Surface + 'static>(
    pages: &mut PageManager<S>,
    banner: &str,
    attendees: &[AttendeeRecord],
    resolver: &dyn AssetResolver,
) -> Vec<RowPlacement> {
    pages.ensure_space(TABLE_HEADER_HEIGHT_PT);
    let top = pages.y();
    let used = draw_table_header(pages.surface(), top);
    pages.advance(used);

    pages.set_repeat_header(continuation_header(banner.to_string()));

    let mut placements = Vec::with_capacity(attendees.len());
    for (i, attendee) in attendees.iter().enumerate() {
        let index = i + 1;
        pages.ensure_space(ROW_HEIGHT_PT);

        let signature = try_load_image(resolver, attendee.signature.as_ref());
        let top = pages.y();
        let cell = draw_attendee_row(pages.surface(), top, index, attendee, signature.as_ref());
        placements.push(RowPlacement {
            index,
            page: pages.page(),
            signature: cell,
        });
        pages.advance(ROW_HEIGHT_PT);
    }

    log::debug!(
        "Table laid out: {} rows over {} page(s)",
        placements.len(),
        pages.page()
    );
    placements
}

/// Repeat hook for continuation pages: banner line, then the column header.
pub fn continuation_header<S: Surface + 'static>(banner: String) -> RepeatHeader<S> {
    Box::new(move |surface: &mut S, cursor: &Cursor| {
        let used = draw_banner(surface, cursor.y(), &banner);
        used + draw_table_header(surface, cursor.y() - used)
    })
}

/// One-line banner across the content width. Returns its height.
pub fn draw_banner<S: Surface>(surface: &mut S, top: f32, banner: &str) -> f32 {
    let text = fit_with_ellipsis(banner, Font::Bold, BANNER_FONT_SIZE, CONTENT_WIDTH_PT);
    surface.text(
        &text,
        Font::Bold,
        BANNER_FONT_SIZE,
        MARGIN_PT,
        top - BANNER_HEIGHT_PT + 5.0,
        ink::TEXT,
    );
    BANNER_HEIGHT_PT
}

/// Shaded column header row. Returns its height.
pub fn draw_table_header<S: Surface>(surface: &mut S, top: f32) -> f32 {
    let row = Rect::new(
        MARGIN_PT,
        top - TABLE_HEADER_HEIGHT_PT,
        CONTENT_WIDTH_PT,
        TABLE_HEADER_HEIGHT_PT,
    );
    surface.fill_rect(row, ink::SHADE);
    surface.stroke_rect(row, 0.6, ink::TEXT);
    draw_column_separators(surface, row);

    let baseline = row.center_y() - HEADER_FONT_SIZE * 0.35;
    for col in Column::ALL {
        let cell = col.cell(top, TABLE_HEADER_HEIGHT_PT);
        if col == Column::Index {
            draw_centered(
                surface,
                col.title(),
                Font::Bold,
                HEADER_FONT_SIZE,
                cell,
                baseline,
                ink::TEXT,
            );
        } else {
            surface.text(
                col.title(),
                Font::Bold,
                HEADER_FONT_SIZE,
                cell.x + CELL_PADDING_PT,
                baseline,
                ink::TEXT,
            );
        }
    }

    TABLE_HEADER_HEIGHT_PT
}

/// Draw one attendee row with its top edge at `top`.
pub fn draw_attendee_row<S: Surface>(
    surface: &mut S,
    top: f32,
    index: usize,
    attendee: &AttendeeRecord,
    signature: Option<&DecodedImage>,
) -> SignatureCell {
    let row = Rect::new(MARGIN_PT, top - ROW_HEIGHT_PT, CONTENT_WIDTH_PT, ROW_HEIGHT_PT);
    surface.stroke_rect(row, 0.4, ink::RULE);
    draw_column_separators(surface, row);

    let center = row.center_y();
    let single_line = center - CELL_FONT_SIZE * 0.35;
    let text_width = |col: Column| col.width() - 2.0 * CELL_PADDING_PT;
    let cell = |col: Column| col.cell(top, ROW_HEIGHT_PT);

    draw_centered(
        surface,
        &index.to_string(),
        Font::Regular,
        CELL_FONT_SIZE,
        cell(Column::Index),
        single_line,
        ink::TEXT,
    );

    let name = fit_cell(
        &attendee.full_name,
        NAME_CHAR_BUDGET,
        Font::Regular,
        CELL_FONT_SIZE,
        text_width(Column::Name),
    );
    surface.text(
        &name,
        Font::Regular,
        CELL_FONT_SIZE,
        cell(Column::Name).x + CELL_PADDING_PT,
        single_line,
        ink::TEXT,
    );

    let tax_id = fit_cell(
        &format_tax_id(&attendee.tax_id),
        TAX_ID_CHAR_BUDGET,
        Font::Regular,
        SMALL_FONT_SIZE,
        text_width(Column::TaxId),
    );
    surface.text(
        &tax_id,
        Font::Regular,
        SMALL_FONT_SIZE,
        cell(Column::TaxId).x + CELL_PADDING_PT,
        center - SMALL_FONT_SIZE * 0.35,
        ink::TEXT,
    );

    // Role: up to two lines, vertically centered as a block
    let role_lines = wrap_clamped(
        &attendee.role,
        Font::Regular,
        SMALL_FONT_SIZE,
        text_width(Column::Role),
        ROLE_MAX_LINES,
    );
    let first_baseline = center + (role_lines.len() as f32 - 1.0) * ROLE_LINE_HEIGHT_PT / 2.0
        - SMALL_FONT_SIZE * 0.35;
    for (i, line) in role_lines.iter().enumerate() {
        surface.text(
            line,
            Font::Regular,
            SMALL_FONT_SIZE,
            cell(Column::Role).x + CELL_PADDING_PT,
            first_baseline - i as f32 * ROLE_LINE_HEIGHT_PT,
            ink::TEXT,
        );
    }

    // Check-in date over time
    let time_cell = cell(Column::Time);
    let checked_in = &attendee.checked_in_at;
    draw_centered(
        surface,
        &format_date(checked_in),
        Font::Regular,
        SMALL_FONT_SIZE,
        time_cell,
        center + 1.5,
        ink::TEXT,
    );
    draw_centered(
        surface,
        &format_time(checked_in),
        Font::Regular,
        SMALL_FONT_SIZE,
        time_cell,
        center - 8.0,
        ink::MUTED,
    );

    draw_signature_cell(surface, cell(Column::Signature), signature)
}

fn draw_signature_cell<S: Surface>(
    surface: &mut S,
    cell: Rect,
    signature: Option<&DecodedImage>,
) -> SignatureCell {
    let placed = signature.and_then(|img| {
        img.place_in(cell.inset(SIGNATURE_INSET_PT))
            .map(|at| (img, at))
    });

    match placed {
        Some((img, at)) => {
            surface.image(img, at);
            SignatureCell::Image
        }
        None => {
            draw_centered(
                surface,
                SIGNATURE_PLACEHOLDER,
                Font::Regular,
                PLACEHOLDER_FONT_SIZE,
                cell,
                cell.center_y() - PLACEHOLDER_FONT_SIZE * 0.35,
                ink::MUTED,
            );
            SignatureCell::Placeholder
        }
    }
}

fn draw_column_separators<S: Surface>(surface: &mut S, row: Rect) {
    for col in &Column::ALL[1..] {
        let x = col.x();
        surface.line((x, row.y), (x, row.top()), 0.3, ink::RULE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetResolver;
    use crate::geometry::HEADER_BLOCK_HEIGHT_PT;
    use crate::image::png_bytes;
    use crate::model::fixtures::{attendee, model};
    use crate::model::AssetRef;
    use crate::page::{CONTENT_BOTTOM_PT, CONTENT_TOP_PT};
    use crate::surface::recording::{Op, RecordingSurface};
    use crate::text::ELLIPSIS;

    const BANNER: &str = "Attendance Record · session AB12CD (continued)";

    fn resolver_with_signatures(n: usize) -> MemoryAssetResolver {
        let mut resolver = MemoryAssetResolver::new();
        for i in 1..=n {
            resolver.insert(
                AssetRef::new("signatures", format!("{}.png", i)),
                png_bytes(300, 100),
            );
        }
        resolver
    }

    /// Table drawn below a header-sized block, as on a real first page.
    fn layout(
        n: usize,
        resolver: &MemoryAssetResolver,
    ) -> (PageManager<RecordingSurface>, Vec<RowPlacement>) {
        let mut pages = PageManager::new(RecordingSurface::default(), "Session AB12CD");
        pages.new_page();
        pages.advance(HEADER_BLOCK_HEIGHT_PT);
        let rows = draw_table(&mut pages, BANNER, &model(n).attendees, resolver);
        (pages, rows)
    }

    fn rows_per_page(first_top: f32) -> usize {
        ((first_top - CONTENT_BOTTOM_PT) / ROW_HEIGHT_PT).floor() as usize
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let (mut pages, rows) = layout(0, &MemoryAssetResolver::new());
        assert!(rows.is_empty());
        assert_eq!(pages.page(), 1);
        let texts = pages.surface().texts_on(1);
        assert!(texts.contains(&"NAME".to_string()));
        assert!(texts.contains(&"SIGNATURE".to_string()));
    }

    #[test]
    fn test_rows_per_page_match_geometry() {
        let first = rows_per_page(CONTENT_TOP_PT - HEADER_BLOCK_HEIGHT_PT - TABLE_HEADER_HEIGHT_PT);
        let later = rows_per_page(CONTENT_TOP_PT - BANNER_HEIGHT_PT - TABLE_HEADER_HEIGHT_PT);
        assert_eq!((first, later), (17, 21));

        let (_, rows) = layout(first, &MemoryAssetResolver::new());
        assert!(rows.iter().all(|r| r.page == 1));

        let (_, rows) = layout(first + 1, &MemoryAssetResolver::new());
        assert_eq!(rows.last().unwrap().page, 2);
    }

    #[test]
    fn test_sixty_rows_span_four_pages_with_repeated_header() {
        let (mut pages, rows) = layout(60, &MemoryAssetResolver::new());
        assert_eq!(pages.page(), 4);

        let per_page: Vec<usize> = (1..=4)
            .map(|p| rows.iter().filter(|r| r.page == p).count())
            .collect();
        assert_eq!(per_page, vec![17, 21, 21, 1]);

        for page in 1..=4 {
            let texts = pages.surface().texts_on(page);
            assert_eq!(texts.iter().filter(|t| *t == "NAME").count(), 1, "page {}", page);
            assert_eq!(texts.iter().any(|t| t == BANNER), page > 1, "page {}", page);
        }
    }

    #[test]
    fn test_indices_continue_across_pages_in_input_order() {
        let (mut pages, rows) = layout(40, &MemoryAssetResolver::new());
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, (1..=40).collect::<Vec<_>>());

        // Names appear in the drawn output in the same order as the input
        let names: Vec<String> = pages
            .surface()
            .texts()
            .into_iter()
            .map(|(_, t)| t)
            .filter(|t| t.starts_with("Attendee Number"))
            .collect();
        let expected: Vec<String> = (1..=40).map(|n| format!("Attendee Number {}", n)).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_page_assignment_is_deterministic_and_monotonic() {
        let mut last_pages = 0;
        for n in 0..80 {
            let (a, rows_a) = layout(n, &MemoryAssetResolver::new());
            let (b, rows_b) = layout(n, &MemoryAssetResolver::new());
            assert_eq!(rows_a, rows_b);
            assert_eq!(a.page(), b.page());
            assert!(a.page() >= last_pages);
            last_pages = a.page();
            assert!(rows_a.windows(2).all(|w| w[0].page <= w[1].page));
        }
    }

    #[test]
    fn test_rows_never_enter_footer_strip() {
        let (pages, _) = layout(50, &MemoryAssetResolver::new());
        let (surface, _) = pages.finish();
        for op in &surface.ops {
            if let Op::Rect { rect, .. } = op {
                assert!(rect.y >= CONTENT_BOTTOM_PT - 1e-3, "rect dips into footer: {:?}", rect);
            }
        }
    }

    #[test]
    fn test_signatures_placed_inside_their_cells() {
        let resolver = resolver_with_signatures(5);
        let (mut pages, rows) = layout(5, &resolver);
        assert!(rows.iter().all(|r| r.signature == SignatureCell::Image));

        let images = pages.surface().images();
        assert_eq!(images.len(), 5);
        let sig_x = Column::Signature.x();
        for (_, at) in images {
            assert!(at.x >= sig_x);
            assert!(at.right() <= MARGIN_PT + CONTENT_WIDTH_PT + 1e-3);
            assert!(at.height <= ROW_HEIGHT_PT - 2.0 * SIGNATURE_INSET_PT + 1e-3);
        }
    }

    #[test]
    fn test_unresolvable_signatures_become_placeholders() {
        let mut resolver = resolver_with_signatures(3);
        resolver.insert(AssetRef::new("signatures", "2.png"), b"corrupt".to_vec());
        let mut attendees = model(3).attendees;
        attendees[0].signature = None;

        let mut pages = PageManager::new(RecordingSurface::default(), "Session AB12CD");
        let rows = draw_table(&mut pages, BANNER, &attendees, &resolver);

        let cells: Vec<SignatureCell> = rows.iter().map(|r| r.signature).collect();
        assert_eq!(
            cells,
            vec![SignatureCell::Placeholder, SignatureCell::Placeholder, SignatureCell::Image]
        );
        let placeholders = pages
            .surface()
            .texts_on(1)
            .into_iter()
            .filter(|t| t == SIGNATURE_PLACEHOLDER)
            .count();
        assert_eq!(placeholders, 2);
    }

    #[test]
    fn test_long_role_drawn_as_two_lines() {
        let mut record = attendee(1);
        record.role = "Coordinator of occupational health and safety programs ".repeat(4);
        assert!(record.role.trim().chars().count() >= 200);

        let mut surface = RecordingSurface::default();
        surface.begin_page();
        draw_attendee_row(&mut surface, 500.0, 1, &record, None);

        let role_x = Column::Role.x() + CELL_PADDING_PT;
        let role_lines: Vec<String> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, x, .. } if (*x - role_x).abs() < 1e-3 => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(role_lines.len(), 2);
        assert!(role_lines[1].ends_with(ELLIPSIS));
        let max = Column::Role.width() - 2.0 * CELL_PADDING_PT;
        for line in &role_lines {
            assert!(Font::Regular.text_width(line, SMALL_FONT_SIZE) <= max);
        }
    }

    #[test]
    fn test_unbroken_role_stays_inside_its_cell() {
        let mut record = attendee(1);
        record.role = "Supervisor-de-manutencao-eletromecanica-industrial".into();
        assert_eq!(record.role.chars().count(), 50);

        let mut surface = RecordingSurface::default();
        surface.begin_page();
        draw_attendee_row(&mut surface, 500.0, 1, &record, None);

        let role_x = Column::Role.x() + CELL_PADDING_PT;
        let role_lines: Vec<String> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, x, .. } if (*x - role_x).abs() < 1e-3 => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(role_lines.len(), 1);
        assert!(role_lines[0].ends_with(ELLIPSIS));

        let max = Column::Role.width() - 2.0 * CELL_PADDING_PT;
        for line in &role_lines {
            let width = Font::Regular.text_width(line, SMALL_FONT_SIZE);
            assert!(width <= max, "{:?} is {:.1}pt, cell holds {:.1}pt", line, width, max);
            assert!(role_x + width <= Column::Time.x());
        }
    }

    #[test]
    fn test_row_cells_show_formatted_values() {
        let record = attendee(7);
        let mut surface = RecordingSurface::default();
        surface.begin_page();
        let cell = draw_attendee_row(&mut surface, 500.0, 7, &record, None);
        assert_eq!(cell, SignatureCell::Placeholder);

        let texts = surface.texts_on(1);
        for expected in ["7", "Attendee Number 7", "123.456.789-07", "10/03/2025", "08:07"] {
            assert!(texts.contains(&expected.to_string()), "missing {:?} in {:?}", expected, texts);
        }
    }

    #[test]
    fn test_overlong_name_is_single_line_with_ellipsis() {
        let mut record = attendee(1);
        record.full_name = "Maria Aparecida dos Santos Oliveira de Albuquerque e Silva Pereira".into();
        let mut surface = RecordingSurface::default();
        surface.begin_page();
        draw_attendee_row(&mut surface, 500.0, 1, &record, None);

        let name = surface
            .texts_on(1)
            .into_iter()
            .find(|t| t.starts_with("Maria"))
            .unwrap();
        assert!(name.ends_with(ELLIPSIS));
        assert!(
            Font::Regular.text_width(&name, CELL_FONT_SIZE)
                <= Column::Name.width() - 2.0 * CELL_PADDING_PT
        );
    }
}
