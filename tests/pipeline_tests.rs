mod common;

use common::{SETTINGS_JSON, legacy_workbook_bytes, wide_workbook_bytes};
use kollelpay::errors::AppError;
use kollelpay::models::attendance::Layout;
use kollelpay::{NameOrder, Settings, normalize, process_workbook};

fn settings() -> Settings {
    normalize(serde_json::from_str(SETTINGS_JSON).unwrap()).unwrap()
}

#[test]
fn wide_workbook_end_to_end() {
    let report = process_workbook(
        &wide_workbook_bytes(true),
        Some("attendance.xlsx"),
        &settings(),
        NameOrder::Locale,
    )
    .unwrap();

    assert_eq!(report.layout, Layout::Wide);
    assert_eq!(report.month.key(), "2024-03");
    assert_eq!(report.results.len(), 2);

    // Locale order: כ before ל.
    let cohen = &report.results[0];
    let levi = &report.results[1];
    assert_eq!(cohen.name, "כהן");
    assert_eq!(levi.name, "לוי");

    assert_eq!(levi.working_days, 3);
    assert_eq!(levi.total_hours, 12.0);
    assert_eq!(levi.stipend, 2000.0);

    // 8 of 12 hours: below 90%, high rate on the 4 missing hours.
    assert_eq!(cohen.required_hours, 12.0);
    assert_eq!(cohen.total_deduction, 100.0);
    assert_eq!(cohen.stipend, 1900.0);
    assert!(cohen.daily[2].absent);

    assert_eq!(report.total_payout(), 3900.0);
}

#[test]
fn missing_type_row_is_a_structural_error() {
    let err = process_workbook(
        &wide_workbook_bytes(false),
        Some("attendance.xlsx"),
        &settings(),
        NameOrder::Locale,
    )
    .unwrap_err();

    match err {
        AppError::MissingHeaders { missing, found } => {
            assert_eq!(missing, vec!["type row (entry/exit)".to_string()]);
            assert!(found.iter().any(|f| f.starts_with("date row")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_workbook_end_to_end() {
    let report =
        process_workbook(&legacy_workbook_bytes(), None, &settings(), NameOrder::Locale).unwrap();

    assert_eq!(report.layout, Layout::Legacy);
    assert_eq!(report.month.key(), "2024-03");
    assert!(report.active_days.is_none());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Notes"));

    let levi = report.scholar("לוי").unwrap();
    assert_eq!(levi.working_days, 3);
    assert_eq!(levi.stipend, 2000.0);

    let cohen = report.scholar("כהן").unwrap();
    assert_eq!(cohen.working_days, 3);
    assert_eq!(cohen.total_deduction, 100.0);
    assert_eq!(cohen.stipend, 1900.0);
}

#[test]
fn codepoint_order_is_available() {
    let report = process_workbook(
        &wide_workbook_bytes(true),
        None,
        &settings(),
        NameOrder::Codepoint,
    )
    .unwrap();
    let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["כהן", "לוי"]);
}

#[test]
fn garbage_is_not_a_workbook() {
    let err = process_workbook(b"not a workbook", None, &settings(), NameOrder::Locale).unwrap_err();
    assert!(matches!(err, AppError::Workbook(_)));
}
