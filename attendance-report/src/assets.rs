// Asset resolution and document storage contracts

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{AssetError, StoreError};
use crate::image::DecodedImage;
use crate::model::AssetRef;

// ============================================================================
// Resolvers
// ============================================================================

/// Fetches raw image bytes for an asset reference. Called once per logo and
/// once per attendee row, possibly from several renders at the same time.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetError>;
}

/// Reads `<root>/<bucket>/<path>` from the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, asset: &AssetRef) -> Result<PathBuf, AssetError> {
        let relative = Path::new(&asset.bucket).join(asset.path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(AssetError::NotFound(asset.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for(asset)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(asset.to_string()))
            }
            Err(e) => Err(AssetError::Io(e)),
        }
    }
}

/// Fetches `<base_url>/<bucket>/<path>` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpAssetResolver {
    base_url: String,
}

impl HttpAssetResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, asset: &AssetRef) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            asset.bucket,
            asset.path.trim_start_matches('/')
        )
    }
}

impl AssetResolver for HttpAssetResolver {
    fn resolve(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetError> {
        let url = self.url_for(asset);
        let response = match ureq::get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Err(AssetError::NotFound(url)),
            Err(e) => return Err(AssetError::Http(format!("{}: {}", url, e))),
        };

        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// In-memory assets, keyed by reference.
#[derive(Debug, Default)]
pub struct MemoryAssetResolver {
    assets: HashMap<AssetRef, Vec<u8>>,
}

impl MemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: AssetRef, bytes: Vec<u8>) {
        self.assets.insert(asset, bytes);
    }

    pub fn with(mut self, asset: AssetRef, bytes: Vec<u8>) -> Self {
        self.insert(asset, bytes);
        self
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn resolve(&self, asset: &AssetRef) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(asset)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(asset.to_string()))
    }
}

/// Resolve and decode one asset. Decode failures are reported the same way
/// as missing assets.
pub fn load_image(
    resolver: &dyn AssetResolver,
    asset: &AssetRef,
) -> Result<DecodedImage, AssetError> {
    let bytes = resolver.resolve(asset)?;
    DecodedImage::from_bytes(&bytes)
}

/// Like `load_image`, but absence and failure both become `None`, with a
/// warning for failures.
pub fn try_load_image(
    resolver: &dyn AssetResolver,
    asset: Option<&AssetRef>,
) -> Option<DecodedImage> {
    let asset = asset?;
    match load_image(resolver, asset) {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("Skipping image {}: {}", asset, e);
            None
        }
    }
}

/// Try each candidate in order, returning the first that resolves and decodes.
pub fn first_available(
    resolver: &dyn AssetResolver,
    candidates: &[AssetRef],
) -> Option<DecodedImage> {
    candidates
        .iter()
        .find_map(|asset| try_load_image(resolver, Some(asset)))
}

// ============================================================================
// Document store
// ============================================================================

/// Persists a finished report.
pub trait DocumentStore: Send + Sync {
    fn store(&self, bytes: &[u8], path: &str) -> Result<(), StoreError>;
}

/// Writes reports below a root directory, creating folders as needed.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl DocumentStore for FsDocumentStore {
    fn store(&self, bytes: &[u8], path: &str) -> Result<(), StoreError> {
        if Path::new(path)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(StoreError::Rejected(format!("not a relative path: {}", path)));
        }
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, bytes)?;
        Ok(())
    }
}

/// Keeps stored documents in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.documents
            .lock()
            .ok()
            .and_then(|docs| docs.get(path).cloned())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn store(&self, bytes: &[u8], path: &str) -> Result<(), StoreError> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|_| StoreError::Rejected("store lock poisoned".into()))?;
        docs.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Proposed storage location: `reports/<session_code>/<timestamp>.pdf`.
pub fn storage_path(session_code: &str, generated_at: &DateTime<Utc>) -> String {
    format!(
        "reports/{}/{}.pdf",
        session_code,
        generated_at.format("%Y%m%dT%H%M%SZ")
    )
}
