#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rust_xlsxwriter::Workbook;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn kp() -> Command {
    cargo_bin_cmd!("kollelpay")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_kollelpay.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub const SETTINGS_JSON: &str = r#"{
  "baseStipend": 2000,
  "deduction": {"highRate": 25, "lowRate": 20, "thresholdPercent": 90},
  "sessions": [
    {"id": "a", "name": "סדר א", "start": "09:00", "end": "13:00", "punctualityBonusEnabled": false}
  ]
}"#;

pub fn settings_file(name: &str) -> String {
    let p = temp_out(&format!("{name}_settings"), "json");
    fs::write(&p, SETTINGS_JSON).expect("write settings");
    p
}

/// Write string rows into a sheet; empty strings leave the cell blank.
fn write_rows(ws: &mut rust_xlsxwriter::Worksheet, rows: &[Vec<&str>]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                ws.write_string(r as u32, c as u16, *value).expect("write cell");
            }
        }
    }
}

/// Three days of סדר א. לוי attends all of them, כהן misses the third.
pub fn wide_rows(with_type_row: bool) -> Vec<Vec<&'static str>> {
    let mut rows = vec![
        vec!["", "01/03/2024", "", "02/03/2024", "", "03/03/2024", ""],
        vec!["", "סדר א", "", "", "", "", ""],
    ];
    if with_type_row {
        rows.push(vec!["שם", "כניסה", "יציאה", "כניסה", "יציאה", "כניסה", "יציאה"]);
    } else {
        rows.push(vec!["שם"]);
    }
    rows.push(vec!["לוי", "09:00", "13:00", "09:00", "13:00", "09:00", "13:00"]);
    rows.push(vec!["כהן", "09:00", "13:00", "09:00", "13:00"]);
    rows
}

pub fn wide_workbook_bytes(with_type_row: bool) -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    write_rows(ws, &wide_rows(with_type_row));
    wb.save_to_buffer().expect("xlsx buffer")
}

pub fn wide_workbook_file(name: &str) -> String {
    let p = temp_out(&format!("{name}_wide"), "xlsx");
    fs::write(&p, wide_workbook_bytes(true)).expect("write workbook");
    p
}

/// One sheet per scholar; the second scholar has an empty third day.
pub fn legacy_workbook_bytes() -> Vec<u8> {
    let mut wb = Workbook::new();

    let ws = wb.add_worksheet();
    ws.set_name("Levi").expect("sheet name");
    write_rows(
        ws,
        &[
            vec!["דוח נוכחות"],
            vec!["שם: לוי"],
            vec!["יום", "תאריך", "כניסה", "יציאה"],
            vec!["א", "01/03/2024", "09:00", "13:00"],
            vec!["ב", "02/03/2024", "09:00", "13:00"],
            vec!["ג", "03/03/2024", "09:00", "13:00"],
            vec!["ד", "04/03/2024", "חופש"],
            vec!["סה\"כ", "", "12:00"],
        ],
    );

    let ws = wb.add_worksheet();
    ws.set_name("Cohen").expect("sheet name");
    write_rows(
        ws,
        &[
            vec!["שם: כהן"],
            vec!["יום", "תאריך", "כניסה", "יציאה"],
            vec!["א", "01/03/2024", "09:00", "13:00"],
            vec!["ב", "02/03/2024", "09:00", "13:00"],
            vec!["ג", "03/03/2024"],
        ],
    );

    let ws = wb.add_worksheet();
    ws.set_name("Notes").expect("sheet name");
    write_rows(ws, &[vec!["nothing to see here"]]);

    wb.save_to_buffer().expect("xlsx buffer")
}

/// init + settings import, the state most CLI tests start from.
pub fn init_with_settings(db_path: &str, name: &str) {
    kp().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let settings = settings_file(name);
    kp().args(["--db", db_path, "settings", "--import", &settings])
        .assert()
        .success();
}

/// init + settings + the wide workbook saved as 2024-03.
pub fn init_with_month(db_path: &str, name: &str) {
    init_with_settings(db_path, name);
    let wb = wide_workbook_file(name);
    kp().args(["--db", db_path, "process", &wb, "--save"])
        .assert()
        .success();
}
