use thiserror::Error;

/// Fatal render failures. Anything recoverable (missing logos, broken
/// signatures, overlong text) never reaches this type.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report model: {0}")]
    InvalidModel(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to store report at {path}: {source}")]
    StoreError {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why an asset reference could not be turned into a drawable image.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch asset: {0}")]
    Http(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rejected by store: {0}")]
    Rejected(String),
}
