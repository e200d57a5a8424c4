// Fixed page and table geometry. All values are PDF points, origin bottom-left.

// ============================================================================
// Page
// ============================================================================

/// A4 dimensions in points
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// Margin on all four sides
pub const MARGIN_PT: f32 = 36.0;

/// Footer strip above the bottom margin. No block may start inside it.
pub const FOOTER_HEIGHT_PT: f32 = 14.0;

pub const CONTENT_WIDTH_PT: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;

/// Points to millimetres, for the printpdf API
pub const PT_TO_MM: f32 = 0.352_777_8;

// ============================================================================
// Blocks
// ============================================================================

/// Page-1 header: logo row, title and info grid
pub const HEADER_BLOCK_HEIGHT_PT: f32 = 139.0;
pub const LOGO_BOX_WIDTH_PT: f32 = 170.0;
pub const LOGO_BOX_HEIGHT_PT: f32 = 52.0;

/// Continuation banner at the top of pages 2+
pub const BANNER_HEIGHT_PT: f32 = 16.0;

pub const TABLE_HEADER_HEIGHT_PT: f32 = 18.0;
pub const ROW_HEIGHT_PT: f32 = 34.0;

/// Trainer signature block: caption, signature box, name line
pub const SIGNATURE_BLOCK_HEIGHT_PT: f32 = 90.0;

// ============================================================================
// Table columns
// ============================================================================

pub const INDEX_COL_WIDTH_PT: f32 = 24.0;
pub const NAME_COL_WIDTH_PT: f32 = 140.0;
pub const TAX_ID_COL_WIDTH_PT: f32 = 82.0;
pub const ROLE_COL_WIDTH_PT: f32 = 100.0;
pub const TIME_COL_WIDTH_PT: f32 = 62.0;
/// The signature column takes whatever the fixed columns leave.
pub const SIGNATURE_COL_WIDTH_PT: f32 = CONTENT_WIDTH_PT
    - (INDEX_COL_WIDTH_PT
        + NAME_COL_WIDTH_PT
        + TAX_ID_COL_WIDTH_PT
        + ROLE_COL_WIDTH_PT
        + TIME_COL_WIDTH_PT);

/// Horizontal text padding inside a cell
pub const CELL_PADDING_PT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Index,
    Name,
    TaxId,
    Role,
    Time,
    Signature,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Index,
        Column::Name,
        Column::TaxId,
        Column::Role,
        Column::Time,
        Column::Signature,
    ];

    pub fn width(self) -> f32 {
        match self {
            Column::Index => INDEX_COL_WIDTH_PT,
            Column::Name => NAME_COL_WIDTH_PT,
            Column::TaxId => TAX_ID_COL_WIDTH_PT,
            Column::Role => ROLE_COL_WIDTH_PT,
            Column::Time => TIME_COL_WIDTH_PT,
            Column::Signature => SIGNATURE_COL_WIDTH_PT,
        }
    }

    /// Left edge of the column in page coordinates
    pub fn x(self) -> f32 {
        let mut x = MARGIN_PT;
        for col in Column::ALL {
            if col == self {
                break;
            }
            x += col.width();
        }
        x
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Index => "#",
            Column::Name => "NAME",
            Column::TaxId => "TAX ID",
            Column::Role => "ROLE",
            Column::Time => "CHECK-IN",
            Column::Signature => "SIGNATURE",
        }
    }

    /// Cell rectangle for a row whose top edge is at `top`
    pub fn cell(self, top: f32, height: f32) -> Rect {
        Rect::new(self.x(), top - height, self.width(), height)
    }
}

/// Axis-aligned box; `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink by `d` on every side
    pub fn inset(&self, d: f32) -> Rect {
        Rect::new(
            self.x + d,
            self.y + d,
            (self.width - 2.0 * d).max(0.0),
            (self.height - 2.0 * d).max(0.0),
        )
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }
}
