use std::io::Cursor;
use std::thread;

use attendance_report::{
    render_report, AssetRef, AttendeeRecord, Company, MemoryAssetResolver, ReportConfig,
    ReportModel, ReportRenderer, Session, SignatureCell,
};
use chrono::{DateTime, Duration, FixedOffset};
use image::{ImageFormat, Rgba, RgbaImage};

fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn model(code: &str, attendees: usize) -> ReportModel {
    let start = ts("2025-06-02T14:00:00+00:00");
    ReportModel {
        company: Company {
            name: "Northwind Logistics".into(),
            legal_name: "Northwind Logistics S.A.".into(),
            tax_id: "11222333000181".into(),
            address: "Av. Paulista 1000, São Paulo".into(),
            logo: None,
        },
        session: Session {
            code: code.into(),
            topic: "Working at heights".into(),
            location: "Warehouse B".into(),
            scheduled_at: start,
            trainer_name: "João Pereira".into(),
            closed_at: start + Duration::hours(3),
            trainer_signature: None,
        },
        attendees: (0..attendees)
            .map(|i| AttendeeRecord {
                full_name: format!("Participant {}", i + 1),
                tax_id: "52998224725".into(),
                role: "Warehouse assistant".into(),
                checked_in_at: start + Duration::seconds(i as i64 * 30),
                signature: Some(AssetRef::new("sig", format!("{}.png", i + 1))),
            })
            .collect(),
    }
}

#[test]
fn test_empty_session_renders_one_page() {
    let report = render_report(&model("EMPTY1", 0), &MemoryAssetResolver::new()).unwrap();
    assert_eq!(report.layout.pages, 1);
    assert!(report.layout.rows.is_empty());
    assert!(report.bytes.starts_with(b"%PDF"));
    assert!(report.storage_path.starts_with("reports/EMPTY1/"));
    assert!(report.storage_path.ends_with(".pdf"));
}

#[test]
fn test_page_count_grows_with_attendees() {
    let resolver = MemoryAssetResolver::new();
    let mut last = 0;
    for n in [0, 1, 10, 17, 18, 40, 59, 60, 120] {
        let report = render_report(&model("GROW01", n), &resolver).unwrap();
        assert!(
            report.layout.pages >= last,
            "{} attendees went down to {} pages",
            n,
            report.layout.pages
        );
        last = report.layout.pages;
    }
    assert!(last >= 6);
}

#[test]
fn test_signatures_resolved_per_row() {
    let resolver = MemoryAssetResolver::new()
        .with(AssetRef::new("sig", "1.png"), png(240, 80))
        .with(AssetRef::new("sig", "3.png"), png(80, 240));
    let report = render_report(&model("SIGS01", 4), &resolver).unwrap();
    let cells: Vec<SignatureCell> = report.layout.rows.iter().map(|r| r.signature).collect();
    assert_eq!(
        cells,
        vec![
            SignatureCell::Image,
            SignatureCell::Placeholder,
            SignatureCell::Image,
            SignatureCell::Placeholder,
        ]
    );
    assert_eq!(report.layout.trainer_signature, SignatureCell::Placeholder);
}

#[test]
fn test_concurrent_renders_match_sequential() {
    let mut resolver = MemoryAssetResolver::new();
    for i in 1..=50 {
        resolver.insert(AssetRef::new("sig", format!("{}.png", i)), png(120, 40));
    }
    let resolver = &resolver;

    let expected: Vec<_> = (0..4)
        .map(|k| {
            render_report(&model(&format!("PAR00{}", k), 10 + k * 13), resolver)
                .unwrap()
                .layout
        })
        .collect();

    let parallel: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|k| {
                scope.spawn(move || {
                    let config = ReportConfig::default();
                    ReportRenderer::new(resolver, config)
                        .render(&model(&format!("PAR00{}", k), 10 + k * 13))
                        .unwrap()
                        .layout
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(parallel, expected);
}

#[test]
fn test_missing_ordering_information_is_fatal() {
    let mut m = model("ORDER1", 3);
    m.attendees[2].checked_in_at = m.attendees[0].checked_in_at - Duration::minutes(5);
    assert!(render_report(&m, &MemoryAssetResolver::new()).is_err());
}
