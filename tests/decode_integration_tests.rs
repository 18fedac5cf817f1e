//! Integration tests for the decoding pipeline
//!
//! Covers the public surface end to end:
//! - Splitting a captured dump and decoding each segment
//! - Heartbeats riding along with data frames
//! - Error kinds surfacing through the top-level calls
//! - The human-readable projection of decoded records

use jt701_parser::*;
use std::fs;
use tempfile::TempDir;

/// Two position reports from one lock with a heartbeat in between, as captured
const CAPTURE: &str = "24 75 00 31 36 20 19 12 00 34 15 07 20 21 49 53 22 34 97 50 11 35 50 36 4F 00 68 00 00 00 00 05 00 00 00 00 10 E0 4F 04 44 0B 32 1F 00 07 0F 0F 0F 0F 0F 0F 0F 0F 0F 0F 00 00 01 CC 00 02 28 37 35 30 30 33 31 33 36 32 30 2C 40 4A 54 29 24 75 00 31 36 20 19 11 00 34 15 07 20 21 50 25 22 34 88 02 11 35 50 23 1F 00 89 00 00 00 00 05 00 00 00 00 00 E0 4F 04 44 0B 32 1F 00 07 0F 0F 0F 0F 0F 0F 0F 0F 0F 0F 00 00 01 CC 00 60";

/// Single data frame carrying a provisioned IMEI
const PROVISIONED: &str = "2480006200111911003418042116225922348310113550543F12980000002D060000000020E028109228661F00010000868822040248195F000001CC0156";

#[test]
fn test_capture_splits_into_two_frames() {
    let frames = split_frames(CAPTURE).unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames[0].starts_with("2475003136"));
    assert!(frames[0].ends_with("28373530303331333632302C404A5429"));
    assert!(frames[1].ends_with("01CC0060"));
    assert!(frames.iter().all(|f| f.chars().all(|c| !c.is_ascii_lowercase())));
}

#[test]
fn test_capture_first_record_fields() {
    let messages = decode_hex(CAPTURE).unwrap();
    let message = &messages[0];

    assert_eq!(message.protocol_header, 0x24);
    assert_eq!(message.terminal_id, "7500313620");
    assert_eq!(message.device_type, 1);
    assert_eq!(message.data_type, 2);
    assert!(message.contains_healthcheck);
    assert_eq!(message.imei, "0F0F0F0F0F0F0F0F");
    assert_eq!(message.imei_digits(), None);

    let record = &message.records[0];
    assert_eq!(record.date, "150720");
    assert_eq!(record.time, "214953");
    assert_eq!(record.lat_raw, 22_349_750);
    assert_eq!(record.lng_raw, 113_550_364);
    assert_eq!(record.direction_indicator, 'F');
    assert_eq!(record.angle, 0x68);
    assert_eq!(record.visible_satellites, 5);
    assert_eq!(record.battery_level_percent, 0x4F);
    assert_eq!(record.cell_id(), 0x0444);
    assert_eq!(record.lac(), 0x0B32);
    assert_eq!(record.mcc, 460);
    assert_eq!(record.mnc(), 0x0F00);
    assert!(record.has_high_event(HighByteLockEvent::CoverOpen));
    assert!(record.has_low_event(LowByteLockEvent::MotorLocked));
    assert!(!record.has_low_event(LowByteLockEvent::RopeCut));
}

#[test]
fn test_capture_projection() {
    let messages = decode_hex(CAPTURE).unwrap();
    let human = HumanMessage::from_decoded(&messages[0]).unwrap();
    let record = &human.records[0];

    assert_eq!(human.data_type, "Alarm data");
    assert_eq!(record.date, "2020-07-15");
    assert_eq!(record.time, "21:49:53");
    assert!((record.latitude - 22.582917).abs() < 1e-6);
    assert!((record.longitude - 113.917273).abs() < 1e-6);
    assert_eq!(record.angle_degrees, 208);
    assert_eq!(record.speed_kmh, 0.0);
    assert_eq!(record.high_events, "CoverOpen");
    assert_eq!(record.low_events, "AckRequired|RopeInserted|MotorLocked");
}

#[test]
fn test_whole_capture_as_one_buffer() {
    let message = decode_hex_buffer(CAPTURE).unwrap();
    assert_eq!(message.records.len(), 2);
    assert_eq!(message.records[0].serial_no, 2);
    assert_eq!(message.records[1].serial_no, 0x60);
    // header fields come from the last frame
    assert_eq!(message.data_type, 1);
}

#[test]
fn test_provisioned_imei() {
    let message = decode_hex_buffer(PROVISIONED).unwrap();
    assert_eq!(message.imei, "868822040248195F");
    assert_eq!(message.imei_digits(), Some("868822040248195"));
    assert_eq!(protocol_version_label(message.protocol_version), "JT701");
}

#[test]
fn test_heartbeat_only_buffer() {
    let message = decode_hex_buffer("28373030303331333333342C404A5429").unwrap();
    assert_eq!(message.protocol_header, 0x28);
    assert!(message.contains_healthcheck);
    assert!(!message.has_records());
}

#[test]
fn test_error_kinds_surface() {
    assert!(matches!(
        decode_hex_buffer("2480"),
        Err(DecodeError::FrameTooShort { .. })
    ));
    assert!(matches!(
        decode_hex_buffer("00000000000000000000000000000000"),
        Err(DecodeError::UnrecognizedHeader(0x00))
    ));
    assert!(matches!(
        decode_hex_buffer(&PROVISIONED[..100]),
        Err(DecodeError::IncompleteField { .. })
    ));
    assert!(matches!(
        decode_hex("24 80 0G"),
        Err(DecodeError::MalformedHex(_))
    ));
}

#[test]
fn test_decode_file_reads_multiline_dump() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("capture.hex");
    let wrapped: String = CAPTURE
        .split(' ')
        .collect::<Vec<_>>()
        .chunks(16)
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, wrapped).unwrap();

    let messages = decode_file(&path).unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains_healthcheck);
}

#[test]
fn test_decode_file_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = decode_file(&temp_dir.path().join("absent.hex"));
    assert!(matches!(result, Err(DecodeError::Io(_))));
}
