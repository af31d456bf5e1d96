mod common;

use calamine::{Data, Reader, Xlsx, open_workbook};
use common::{init_with_month, init_with_settings, kp, settings_file, setup_test_db, temp_out, wide_workbook_file};
use predicates::str::contains;
use std::fs;

#[test]
fn init_creates_the_database() {
    let db_path = setup_test_db("init_creates");

    kp().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());
}

#[test]
fn process_requires_settings() {
    let db_path = setup_test_db("process_requires_settings");
    kp().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let wb = wide_workbook_file("process_requires_settings");
    kp().args(["--db", &db_path, "process", &wb])
        .assert()
        .failure()
        .stderr(contains("No settings saved"));
}

#[test]
fn process_prints_the_month_without_saving() {
    let db_path = setup_test_db("process_no_save");
    init_with_settings(&db_path, "process_no_save");

    let wb = wide_workbook_file("process_no_save");
    kp().args(["--db", &db_path, "process", &wb])
        .assert()
        .success()
        .stdout(contains("03/2024"))
        .stdout(contains("לוי"))
        .stdout(contains("3900.00"))
        .stdout(contains("Not saved"));

    kp().args(["--db", &db_path, "months"])
        .assert()
        .success()
        .stdout(contains("No saved months"));
}

#[test]
fn saved_month_is_listed_and_shown() {
    let db_path = setup_test_db("saved_month_listed");
    init_with_month(&db_path, "saved_month_listed");

    kp().args(["--db", &db_path, "months"])
        .assert()
        .success()
        .stdout(contains("2024-03"))
        .stdout(contains("3900.00"));

    kp().args(["--db", &db_path, "show", "03/2024", "--details"])
        .assert()
        .success()
        .stdout(contains("כהן"))
        .stdout(contains("1900.00"))
        .stdout(contains("absent"));
}

#[test]
fn saving_twice_needs_force() {
    let db_path = setup_test_db("saving_twice");
    init_with_month(&db_path, "saving_twice");
    let wb = wide_workbook_file("saving_twice");

    kp().args(["--db", &db_path, "process", &wb, "--save"])
        .assert()
        .failure()
        .stderr(contains("already saved"));

    kp().args(["--db", &db_path, "process", &wb, "--save", "--force"])
        .assert()
        .success();
}

#[test]
fn approving_an_absence_restores_the_stipend() {
    let db_path = setup_test_db("approve_absence");
    init_with_month(&db_path, "approve_absence");

    kp().args([
        "--db", &db_path, "approve", "2024-03", "--scholar", "כהן", "--day", "3", "--session",
        "a", "--kind", "absence",
    ])
    .assert()
    .success()
    .stdout(contains("2000.00"));

    kp().args(["--db", &db_path, "months"])
        .assert()
        .success()
        .stdout(contains("4000.00"));

    kp().args([
        "--db", &db_path, "approve", "2024-03", "--scholar", "כהן", "--day", "3", "--session",
        "a", "--revoke",
    ])
    .assert()
    .success()
    .stdout(contains("1900.00"));
}

#[test]
fn approve_rejects_unknown_targets() {
    let db_path = setup_test_db("approve_unknown");
    init_with_month(&db_path, "approve_unknown");

    kp().args([
        "--db", &db_path, "approve", "2024-03", "--scholar", "nobody", "--day", "1", "--session",
        "a",
    ])
    .assert()
    .failure()
    .stderr(contains("not found"));

    kp().args([
        "--db", &db_path, "approve", "2024-03", "--scholar", "לוי", "--day", "1", "--session",
        "a", "--kind", "holiday",
    ])
    .assert()
    .failure();
}

#[test]
fn export_csv_and_json() {
    let db_path = setup_test_db("export_csv_json");
    init_with_month(&db_path, "export_csv_json");

    let csv_out = temp_out("export_csv_json", "csv");
    kp().args(["--db", &db_path, "export", "2024-03", "--format", "csv", "--file", &csv_out])
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_out).expect("read csv");
    assert!(csv.starts_with("scholar,month,"));
    assert!(csv.contains("כהן"));
    assert!(csv.contains("1900"));

    let json_out = temp_out("export_csv_json", "json");
    kp().args(["--db", &db_path, "export", "2024-03", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("read json")).expect("json");
    assert_eq!(rows.as_array().map(|a| a.len()), Some(2));
    assert_eq!(rows[0]["scholar"], "כהן");
    assert_eq!(rows[0]["stipend"], 1900.0);
}

#[test]
fn export_xlsx_has_summary_and_details() {
    let db_path = setup_test_db("export_xlsx");
    init_with_month(&db_path, "export_xlsx");

    let out = temp_out("export_xlsx", "xlsx");
    kp().args(["--db", &db_path, "export", "2024-03", "--format", "xlsx", "--file", &out])
        .assert()
        .success();

    let mut wb: Xlsx<_> = open_workbook(&out).expect("open exported xlsx");
    assert_eq!(wb.sheet_names(), vec!["Summary".to_string(), "Details".to_string()]);

    let summary = wb.worksheet_range("Summary").expect("summary sheet");
    assert_eq!(summary.get_value((0, 0)), Some(&Data::String("scholar".into())));
    assert_eq!(summary.get_value((1, 0)), Some(&Data::String("כהן".into())));
    assert_eq!(summary.get_value((1, 10)), Some(&Data::Float(1900.0)));

    let details = wb.worksheet_range("Details").expect("details sheet");
    // header + 3 days for each scholar
    assert_eq!(details.height(), 7);
}

#[test]
fn export_of_unknown_month_fails() {
    let db_path = setup_test_db("export_unknown_month");
    init_with_settings(&db_path, "export_unknown_month");

    let out = temp_out("export_unknown_month", "csv");
    kp().args(["--db", &db_path, "export", "2024-04", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("No saved month"));
}

#[test]
fn delete_removes_the_month() {
    let db_path = setup_test_db("delete_month");
    init_with_month(&db_path, "delete_month");

    kp().args(["--db", &db_path, "delete", "2024-03"])
        .assert()
        .success();

    kp().args(["--db", &db_path, "show", "2024-03"])
        .assert()
        .failure()
        .stderr(contains("No saved month"));

    kp().args(["--db", &db_path, "delete", "2024-03"])
        .assert()
        .failure();
}

#[test]
fn organizations_are_isolated() {
    let db_path = setup_test_db("org_isolation");
    init_with_month(&db_path, "org_isolation");

    kp().args(["--db", &db_path, "--org", "other", "months"])
        .assert()
        .success()
        .stdout(contains("No saved months for organization 'other'"));

    let settings = settings_file("org_isolation_other");
    kp().args(["--db", &db_path, "--org", "other", "settings", "--import", &settings])
        .assert()
        .success();
    kp().args(["--db", &db_path, "--org", "other", "settings", "--print"])
        .assert()
        .success()
        .stdout(contains("\"baseStipend\": 2000"));
}

#[test]
fn settings_import_rejects_overlapping_sessions() {
    let db_path = setup_test_db("settings_overlap");
    kp().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let bad = temp_out("settings_overlap_bad", "json");
    fs::write(
        &bad,
        r#"{"sessions": [
            {"id": "a", "name": "A", "start": "09:00", "end": "13:00"},
            {"id": "b", "name": "B", "start": "12:00", "end": "15:00"}
        ]}"#,
    )
    .unwrap();

    kp().args(["--db", &db_path, "settings", "--import", &bad])
        .assert()
        .failure()
        .stderr(contains("Invalid settings"));
}

#[test]
fn settings_import_can_recompute_saved_months() {
    let db_path = setup_test_db("settings_recompute");
    init_with_month(&db_path, "settings_recompute");

    let richer = temp_out("settings_recompute_richer", "json");
    fs::write(&richer, common::SETTINGS_JSON.replace("2000", "3000")).unwrap();

    kp().args(["--db", &db_path, "settings", "--import", &richer, "--recompute"])
        .assert()
        .success()
        .stdout(contains("Recomputed 1 saved months"));

    // 3000 + 2900
    kp().args(["--db", &db_path, "months"])
        .assert()
        .success()
        .stdout(contains("5900.00"));
}

#[test]
fn settings_template_is_valid_json() {
    let out = kp()
        .args(["settings", "--template", "--prompt", "base 2500, round up"])
        .output()
        .expect("run template");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let start = stdout.find('{').expect("json object");
    let value: serde_json::Value = serde_json::from_str(stdout[start..].trim()).expect("json");
    assert_eq!(value["baseStipend"], 2500.0);
    assert_eq!(value["rounding"], "upTo10");
    assert_eq!(value["sessions"].as_array().map(|s| s.len()), Some(2));
}

#[test]
fn log_records_mutating_commands() {
    let db_path = setup_test_db("log_records");
    init_with_month(&db_path, "log_records");

    kp().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("settings"))
        .stdout(contains("process"));
}

#[test]
fn db_info_and_check() {
    let db_path = setup_test_db("db_info_check");
    init_with_month(&db_path, "db_info_check");

    kp().args(["--db", &db_path, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Saved months:"))
        .stdout(contains("Integrity check passed"));
}
