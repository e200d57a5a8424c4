//! Attendance report renderer.
//!
//! Turns a closed training session (company, trainer, attendee rows and
//! their signature images) into a paginated A4 PDF: a page-1 header with
//! logos and session details, an attendee table that repeats its header on
//! every continuation page, and a closing trainer signature block.
//!
//! Missing or broken images never fail a render; they are replaced by
//! placeholders. Only a structurally invalid model or an encoder failure
//! produce an error.

pub mod assets;
pub mod error;
pub mod format;
pub mod geometry;
pub mod header;
pub mod image;
pub mod model;
pub mod page;
pub mod report;
pub mod surface;
pub mod table;
pub mod text;

pub use assets::{
    AssetResolver, DocumentStore, FsAssetResolver, FsDocumentStore, HttpAssetResolver,
    MemoryAssetResolver, MemoryDocumentStore,
};
pub use error::{AssetError, ReportError, StoreError};
pub use model::{AssetRef, AttendeeRecord, Company, ReportModel, Session};
pub use report::{
    render_report, LayoutSummary, RenderedReport, ReportConfig, ReportRenderer, DEFAULT_TITLE,
};
pub use table::{RowPlacement, SignatureCell, SIGNATURE_PLACEHOLDER};
