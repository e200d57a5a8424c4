// Page allocation and the vertical write cursor

use crate::geometry::{CONTENT_WIDTH_PT, FOOTER_HEIGHT_PT, MARGIN_PT, PAGE_HEIGHT_PT};
use crate::surface::{ink, Surface};
use crate::text::Font;

const FOOTER_FONT_SIZE: f32 = 7.0;

/// Lowest y a block may reach: bottom margin plus the footer strip.
pub const CONTENT_BOTTOM_PT: f32 = MARGIN_PT + FOOTER_HEIGHT_PT;

/// First y on a fresh page.
pub const CONTENT_TOP_PT: f32 = PAGE_HEIGHT_PT - MARGIN_PT;

/// Position of the next block: 1-based page number and the y of its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    fn top_of(page: usize) -> Self {
        Self {
            page,
            y: CONTENT_TOP_PT,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn remaining(&self) -> f32 {
        self.y - CONTENT_BOTTOM_PT
    }
}

/// Draws the top of a continuation page and returns the height it used.
pub type RepeatHeader<S> = Box<dyn Fn(&mut S, &Cursor) -> f32>;

/// Owns the surface and the cursor. Blocks ask for room with `ensure_space`
/// and report what they used with `advance`; nothing else moves the cursor.
pub struct PageManager<S: Surface> {
    surface: S,
    cursor: Option<Cursor>,
    footer_label: String,
    repeat_header: Option<RepeatHeader<S>>,
}

impl<S: Surface> PageManager<S> {
    pub fn new(surface: S, footer_label: impl Into<String>) -> Self {
        Self {
            surface,
            cursor: None,
            footer_label: footer_label.into(),
            repeat_header: None,
        }
    }

    /// `None` until the first page exists.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Top edge of the next block. On a manager with no page yet this is the
    /// top of the page that `ensure_space` will allocate.
    pub fn y(&self) -> f32 {
        self.cursor.map_or(CONTENT_TOP_PT, |c| c.y)
    }

    pub fn page(&self) -> usize {
        self.cursor.map_or(0, |c| c.page)
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Hook run at the top of every page allocated by `ensure_space`.
    pub fn set_repeat_header(&mut self, hook: RepeatHeader<S>) {
        self.repeat_header = Some(hook);
    }

    pub fn clear_repeat_header(&mut self) {
        self.repeat_header = None;
    }

    /// Allocate a page and move the cursor to its top margin.
    pub fn new_page(&mut self) {
        let page = self.page() + 1;
        self.surface.begin_page();
        self.cursor = Some(Cursor::top_of(page));
        self.draw_footer(page);
        log::debug!("Started page {}", page);
    }

    /// Make sure a block of `height` fits above the footer strip, breaking to
    /// a new page (and running the repeat hook) when it does not. Returns
    /// whether a page break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None => {
                self.new_page();
                return true;
            }
        };

        if cursor.y - height >= CONTENT_BOTTOM_PT {
            return false;
        }

        self.new_page();
        self.run_repeat_header();

        if let Some(c) = self.cursor {
            if c.remaining() < height {
                log::warn!(
                    "Block of {:.1}pt does not fit on an empty page ({:.1}pt free)",
                    height,
                    c.remaining()
                );
            }
        }
        true
    }

    /// Move the cursor down past a block that was just drawn.
    pub fn advance(&mut self, height: f32) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.y -= height;
        }
    }

    /// Hand back the surface and the number of pages allocated.
    pub fn finish(self) -> (S, usize) {
        let pages = self.page();
        (self.surface, pages)
    }

    fn run_repeat_header(&mut self) {
        let used = match (&self.repeat_header, self.cursor) {
            (Some(hook), Some(cursor)) => hook(&mut self.surface, &cursor),
            _ => return,
        };
        self.advance(used);
    }

    fn draw_footer(&mut self, page: usize) {
        let rule_y = CONTENT_BOTTOM_PT - 3.0;
        self.surface.line(
            (MARGIN_PT, rule_y),
            (MARGIN_PT + CONTENT_WIDTH_PT, rule_y),
            0.3,
            ink::RULE,
        );

        let label = format!("{} · page {}", self.footer_label, page);
        let width = Font::Regular.text_width(&label, FOOTER_FONT_SIZE);
        self.surface.text(
            &label,
            Font::Regular,
            FOOTER_FONT_SIZE,
            MARGIN_PT + CONTENT_WIDTH_PT - width,
            MARGIN_PT + 2.0,
            ink::MUTED,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;

    fn manager() -> PageManager<RecordingSurface> {
        PageManager::new(RecordingSurface::default(), "Session AB12CD")
    }

    #[test]
    fn test_starts_without_page() {
        let pages = manager();
        assert!(pages.cursor().is_none());
        assert_eq!(pages.page(), 0);
        let (surface, count) = pages.finish();
        assert_eq!(count, 0);
        assert_eq!(surface.pages, 0);
    }

    #[test]
    fn test_first_ensure_space_allocates_page() {
        let mut pages = manager();
        assert!(pages.ensure_space(10.0));
        let cursor = pages.cursor().unwrap();
        assert_eq!(cursor.page(), 1);
        assert_eq!(cursor.y(), CONTENT_TOP_PT);
        assert_eq!(pages.surface().texts_on(1), vec!["Session AB12CD · page 1"]);
    }

    #[test]
    fn test_advance_moves_cursor_down() {
        let mut pages = manager();
        pages.new_page();
        pages.advance(100.0);
        assert!((pages.y() - (CONTENT_TOP_PT - 100.0)).abs() < 1e-3);
        assert!(!pages.ensure_space(50.0));
        assert_eq!(pages.page(), 1);
    }

    #[test]
    fn test_block_ending_exactly_at_footer_stays() {
        let mut pages = manager();
        pages.new_page();
        let free = pages.cursor().unwrap().remaining();
        assert!(!pages.ensure_space(free));
        assert_eq!(pages.page(), 1);
        assert!(pages.ensure_space(free + 0.5));
        assert_eq!(pages.page(), 2);
    }

    #[test]
    fn test_page_break_runs_repeat_header() {
        let mut pages = manager();
        pages.set_repeat_header(Box::new(|surface: &mut RecordingSurface, cursor: &Cursor| {
            surface.text("continued", Font::Bold, 9.0, MARGIN_PT, cursor.y() - 10.0, 0.0);
            20.0
        }));

        // First page comes from ensure_space without the hook
        pages.ensure_space(10.0);
        pages.advance(pages.cursor().unwrap().remaining() - 5.0);
        assert!(pages.ensure_space(10.0));

        let cursor = pages.cursor().unwrap();
        assert_eq!(cursor.page(), 2);
        assert!((cursor.y() - (CONTENT_TOP_PT - 20.0)).abs() < 1e-3);

        let surface = pages.surface();
        assert!(!surface.texts_on(1).contains(&"continued".to_string()));
        assert!(surface.texts_on(2).contains(&"continued".to_string()));
    }

    #[test]
    fn test_cleared_hook_not_run() {
        let mut pages = manager();
        pages.set_repeat_header(Box::new(|_: &mut RecordingSurface, _: &Cursor| 40.0));
        pages.clear_repeat_header();
        pages.new_page();
        pages.advance(700.0);
        pages.ensure_space(100.0);
        assert_eq!(pages.y(), CONTENT_TOP_PT);
    }

    #[test]
    fn test_oversized_block_breaks_once() {
        let mut pages = manager();
        pages.new_page();
        pages.advance(10.0);
        assert!(pages.ensure_space(5000.0));
        assert_eq!(pages.page(), 2);
        let (_, count) = pages.finish();
        assert_eq!(count, 2);
    }
}
