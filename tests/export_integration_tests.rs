//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - CSV export with directory creation
//! - Output directory defaulting to input parent
//! - Heartbeat-only input producing no CSV

use jt701_parser::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATA_FRAME: &str = "2480006200111911003418042116225922348310113550543F12980000002D060000000020E028109228661F00010000868822040248195F000001CC0156";

fn messages() -> Vec<DecodedMessage> {
    decode_hex(DATA_FRAME).expect("reference frame decodes")
}

#[cfg(feature = "csv")]
#[test]
fn test_export_csv_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let nonexistent_dir = temp_dir.path().join("nonexistent").join("output");
    let input = temp_dir.path().join("lock.hex");

    let export_opts = ExportOptions {
        csv: true,
        json: false,
        output_dir: Some(nonexistent_dir.to_str().unwrap().to_string()),
    };

    let report = export_messages(&messages(), &input, &export_opts).unwrap();
    let csv_path = nonexistent_dir.join("lock.jt701.csv");
    assert_eq!(report.csv_path.as_deref(), Some(csv_path.as_path()));
    assert!(nonexistent_dir.exists(), "Output directory should be created");

    let content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("terminal_id,imei,serial_no,date,time,latitude,longitude"));

    let row = lines.next().unwrap();
    assert!(row.starts_with("8000620011,868822040248195F,86,2021-04-18,16:22:59,22.580517,113.917572,F,33.3,304"));
    assert!(row.ends_with("CoverClosed,AckRequired|RopeInserted|MotorLocked,platformACKCommandRequired|lockRopeState|motorState|backCoverStatus"));
    assert!(lines.next().is_none());
}

#[cfg(feature = "csv")]
#[test]
fn test_export_defaults_to_input_parent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("capture.txt");

    let export_opts = ExportOptions {
        csv: true,
        ..Default::default()
    };

    export_messages(&messages(), &input, &export_opts).unwrap();
    assert!(temp_dir.path().join("capture.jt701.csv").exists());
    assert!(!temp_dir.path().join("capture.jt701.jsonl").exists());
}

#[cfg(feature = "csv")]
#[test]
fn test_heartbeat_only_writes_no_csv() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("beat.hex");
    let heartbeat = decode_hex("28373030303331333333342C404A5429").unwrap();

    let export_opts = ExportOptions {
        csv: true,
        ..Default::default()
    };

    let report = export_messages(&heartbeat, &input, &export_opts).unwrap();
    assert_eq!(report.csv_path, None);
    assert!(!temp_dir.path().join("beat.jt701.csv").exists());
}

#[cfg(feature = "json")]
#[test]
fn test_export_json_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("lock.hex");

    let export_opts = ExportOptions {
        json: true,
        ..Default::default()
    };

    let report = export_messages(&messages(), &input, &export_opts).unwrap();
    let json_path = report.json_path.expect("JSON path reported");
    let content = fs::read_to_string(json_path).unwrap();
    assert_eq!(content.lines().count(), 1);

    let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(value["terminal_id"], "8000620011");
    assert_eq!(value["records"][0]["date"], "2021-04-18");
}

#[test]
fn test_compute_export_paths_uses_stem() {
    let (csv, json) = compute_export_paths(Path::new("dumps/site-a.hex"), &ExportOptions::default());
    assert_eq!(csv, Path::new("dumps/site-a.jt701.csv"));
    assert_eq!(json, Path::new("dumps/site-a.jt701.jsonl"));
}
