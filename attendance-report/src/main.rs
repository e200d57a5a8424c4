// attendance-report: Render a closed session's attendance report as PDF

use attendance_report::{
    AssetRef, AssetResolver, FsAssetResolver, FsDocumentStore, HttpAssetResolver, ReportConfig,
    ReportError, ReportModel, ReportRenderer, DEFAULT_TITLE,
};
use clap::Parser;
use thiserror::Error;

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read report model: {0}")]
    ModelError(String),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// CLI
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Render a session attendance report as PDF")]
struct Args {
    /// Report model (JSON: company, session, attendees)
    #[arg(short, long)]
    model: String,

    /// Asset root: a local directory or an http(s) base URL
    #[arg(short, long, default_value = ".")]
    assets: String,

    /// Brand logo as bucket/path; repeat to give fallbacks, first match wins
    #[arg(long = "brand-logo", value_parser = parse_asset_ref)]
    brand_logo: Vec<AssetRef>,

    /// Document title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Root directory of the report store
    #[arg(long, default_value = ".")]
    out_dir: String,

    /// Write to this file instead of the store's proposed path
    #[arg(short, long)]
    output: Option<String>,
}

fn parse_asset_ref(s: &str) -> Result<AssetRef, String> {
    AssetRef::parse(s).ok_or_else(|| format!("expected bucket/path, got {:?}", s))
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let model = load_model(&args.model)?;
    let resolver = make_resolver(&args.assets);

    let config = ReportConfig {
        title: args.title,
        brand_logo: args.brand_logo,
        ..ReportConfig::default()
    };
    let renderer = ReportRenderer::new(resolver.as_ref(), config);

    let (report, written_to) = match args.output {
        Some(path) => {
            let report = renderer.render(&model)?;
            std::fs::write(&path, &report.bytes)?;
            (report, path)
        }
        None => {
            let store = FsDocumentStore::new(&args.out_dir);
            let report = renderer.render_and_store(&model, &store)?;
            let path = store.full_path(&report.storage_path).display().to_string();
            (report, path)
        }
    };

    println!("✓ Generated: {}", written_to);
    println!("  Session: {}", model.session.code);
    println!("  Attendees: {}", report.layout.rows.len());
    println!("  Pages: {}", report.layout.pages);

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn load_model(path: &str) -> Result<ReportModel, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::ModelError(format!("{}: {}", path, e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::ModelError(format!("Invalid JSON: {}", e)))
}

fn make_resolver(assets: &str) -> Box<dyn AssetResolver> {
    if assets.starts_with("http://") || assets.starts_with("https://") {
        Box::new(HttpAssetResolver::new(assets))
    } else {
        Box::new(FsAssetResolver::new(assets))
    }
}
