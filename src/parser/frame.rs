//! Cursor walk over one transport buffer of JT701 frames
//!
//! A buffer holds data frames (0x24) back to back, possibly interleaved with
//! heartbeat frames (0x28 ... `JT)`) and command replies (0x28 ... 0x29).

use crate::error::{DecodeError, Result};
use crate::parser::stream::{parse_decimal_digits, FrameStream};
use crate::types::{
    DecodedMessage, EventSet, PalRecord, COMMAND_FRAME_MARKER, COMMAND_FRAME_TERMINATOR,
    DATA_FRAME_MARKER,
};
use tracing::{debug, trace, warn};

/// A heartbeat is the smallest frame a device sends
pub const MIN_PACKET_SIZE: usize = 16;
/// Bytes in a heartbeat frame, markers included
pub const HEARTBEAT_FRAME_SIZE: usize = 16;
/// Trailer closing a heartbeat frame
pub const HEARTBEAT_TRAILER: [u8; 3] = *b"JT)";
/// Record length a data frame declares for the fixed layout
pub const FIXED_RECORD_LENGTH: u16 = 52;

/// Exclusive upper bound on the latitude magnitude
pub const LATITUDE_LIMIT: i64 = 850_000_000;
/// Exclusive upper bound on the longitude magnitude
pub const LONGITUDE_LIMIT: i64 = 1_800_000_000;
/// Largest course in degrees after scaling
pub const MAX_ANGLE_DEGREES: u16 = 360;

const TERMINAL_ID_BYTES: usize = 5;
const HEARTBEAT_TERMINAL_ID_BYTES: usize = 10;
const IMEI_BYTES: usize = 8;
const IMEI_DIGITS: usize = 15;

/// Kind of frame found at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Heartbeat,
    Command,
}

/// Decode every frame in `data`
///
/// All-or-nothing: the first bad field fails the whole buffer.
pub fn decode(data: &[u8]) -> Result<DecodedMessage> {
    if data.len() < MIN_PACKET_SIZE {
        return Err(DecodeError::FrameTooShort {
            minimum: MIN_PACKET_SIZE,
            actual: data.len(),
        });
    }

    let header = data[0];
    if header != DATA_FRAME_MARKER && header != COMMAND_FRAME_MARKER {
        return Err(DecodeError::UnrecognizedHeader(header));
    }

    let mut decoded = DecodedMessage {
        protocol_header: header,
        ..Default::default()
    };
    let mut stream = FrameStream::new(data);

    while !stream.at_end() {
        let frame_start = stream.pos;
        let kind = classify(&stream);
        trace!("{:?} frame at offset {}", kind, frame_start);

        match kind {
            FrameKind::Heartbeat => parse_heartbeat(&mut stream, &mut decoded)?,
            FrameKind::Command => skip_command(&mut stream)?,
            FrameKind::Data => {
                let record = parse_data_frame(&mut stream, &mut decoded)?;
                debug!(
                    "data frame #{} at offset {}: serial {}, lat {}, lng {}",
                    decoded.records.len() + 1,
                    frame_start,
                    record.serial_no,
                    record.lat_raw,
                    record.lng_raw
                );
                decoded.records.push(record);
            }
        }
    }

    Ok(decoded)
}

/// Classify the frame starting at the cursor
pub fn classify(stream: &FrameStream) -> FrameKind {
    if stream.peek_at(0) != Some(COMMAND_FRAME_MARKER) {
        return FrameKind::Data;
    }

    let trailer = [stream.peek_at(13), stream.peek_at(14), stream.peek_at(15)];
    if trailer == HEARTBEAT_TRAILER.map(Some) {
        FrameKind::Heartbeat
    } else {
        FrameKind::Command
    }
}

fn parse_heartbeat(stream: &mut FrameStream, decoded: &mut DecodedMessage) -> Result<()> {
    let start = stream.pos;
    stream.skip("heartbeat marker", 1)?;
    decoded.terminal_id = stream.read_ascii_digits("heartbeat terminal id", HEARTBEAT_TERMINAL_ID_BYTES)?;
    decoded.contains_healthcheck = true;
    stream.set_position(start + HEARTBEAT_FRAME_SIZE);

    debug!("heartbeat from terminal {}", decoded.terminal_id);
    Ok(())
}

fn skip_command(stream: &mut FrameStream) -> Result<()> {
    stream.skip("command marker", 1)?;
    let payload = stream.read_until("command frame", COMMAND_FRAME_TERMINATOR)?;

    // command replies are not interpreted
    debug!("skipped command frame with {} payload bytes", payload.len());
    Ok(())
}

/// Parse one data frame at the cursor using the fixed layout
///
/// Frame-level identifiers are written into `decoded`; the per-sample fields
/// are returned as a record.
pub fn parse_data_frame(
    stream: &mut FrameStream,
    decoded: &mut DecodedMessage,
) -> Result<PalRecord> {
    let mut record = PalRecord::default();

    decoded.protocol_header = stream.read_u8("protocol header")?;
    decoded.terminal_id = stream.read_hex_text("terminal id", TERMINAL_ID_BYTES)?;
    decoded.protocol_version = stream.read_u8("protocol version")?;

    let type_byte = stream.read_u8("device type")?;
    decoded.device_type = (type_byte & 0xF0) >> 4;
    decoded.data_type = type_byte & 0x0F;

    record.record_length = stream.read_u16_be("record length")?;
    if record.record_length != FIXED_RECORD_LENGTH {
        warn!(
            "data frame declares record length {}, decoding fixed {}-byte layout",
            record.record_length, FIXED_RECORD_LENGTH
        );
    }

    record.date = stream.read_hex_text("date", 3)?;
    record.time = stream.read_hex_text("time", 3)?;
    record.utime_millis = parse_decimal_digits("time", &record.time)?;
    record.utime_seconds = record.utime_millis / 1000;

    let latitude = stream.read_hex_text("latitude", 4)?;
    record.lat_raw = check_latitude(parse_decimal_digits("latitude", &latitude)? as i64)? as u32;

    let longitude = stream.read_hex_text("longitude", 5)?;
    let (digits, direction) = split_longitude(&longitude)?;
    record.lng_raw = check_longitude(parse_decimal_digits("longitude", digits)? as i64)? as u32;
    record.direction_indicator = direction;

    record.speed = stream.read_u8("speed")?;
    record.angle = check_angle(stream.read_u8("angle")?)?;
    record.distance_km = stream.read_u32_be("mileage")?;
    record.visible_satellites = stream.read_u8("visible satellites")?;
    decoded.bind_vehicle_id = stream.read_hex_text("bind vehicle id", 4)?;

    record.high_events = EventSet::from_bits(stream.read_u8("high event byte")?);
    record.low_events = EventSet::from_bits(stream.read_u8("low event byte")?);
    record.battery_level_percent = stream.read_u8("battery level")?;
    record.cell_id_position_code = stream.read_u32_be("cell id position code")?;
    record.gsm_signal_quality = stream.read_u8("gsm signal quality")?;
    record.fence_alarm_id = stream.read_u8("fence alarm id")?;
    record.expanded_device_status = stream.read_u8("expanded device status")?;
    record.mnc_high_byte = stream.read_u8("mnc high byte")?;
    record.expanded_device_status2 = stream.read_u8("expanded device status 2")?;

    decoded.imei = check_imei(stream.read_hex_text("imei", IMEI_BYTES)?)?;

    // cell ID repeats the upper half of the position code
    stream.skip("reserved cell id", 2)?;
    record.mcc = stream.read_u16_be("mcc")?;
    record.mnc_low_byte = stream.read_u8("mnc low byte")?;
    record.serial_no = stream.read_u8("serial number")?;

    Ok(record)
}

/// Validate a raw latitude magnitude
pub fn check_latitude(raw: i64) -> Result<i64> {
    if -LATITUDE_LIMIT < raw && raw < LATITUDE_LIMIT {
        Ok(raw)
    } else {
        Err(DecodeError::out_of_range(
            "latitude",
            format!("want -{LATITUDE_LIMIT} < lat < {LATITUDE_LIMIT}, got {raw}"),
        ))
    }
}

/// Validate a raw longitude magnitude
pub fn check_longitude(raw: i64) -> Result<i64> {
    if -LONGITUDE_LIMIT < raw && raw < LONGITUDE_LIMIT {
        Ok(raw)
    } else {
        Err(DecodeError::out_of_range(
            "longitude",
            format!("want -{LONGITUDE_LIMIT} < lng < {LONGITUDE_LIMIT}, got {raw}"),
        ))
    }
}

/// Validate a raw course byte, which must scale to at most 360 degrees
pub fn check_angle(raw: u8) -> Result<u8> {
    let degrees = u16::from(raw) * 2;
    if degrees > MAX_ANGLE_DEGREES {
        return Err(DecodeError::out_of_range(
            "angle",
            format!("want angle <= {MAX_ANGLE_DEGREES}, got {degrees}"),
        ));
    }
    Ok(raw)
}

/// Split the longitude text into its digits and the trailing direction nibble
fn split_longitude(text: &str) -> Result<(&str, char)> {
    match text.char_indices().last() {
        Some((idx, direction)) if idx > 0 => Ok((&text[..idx], direction)),
        _ => Err(DecodeError::out_of_range(
            "longitude",
            format!("{text:?} has no direction indicator"),
        )),
    }
}

/// Accept a 15-digit IMEI (plus filler) or an unprovisioned non-decimal region
fn check_imei(imei: String) -> Result<String> {
    let digits = imei.trim_end_matches('F');
    if digits.bytes().all(|b| b.is_ascii_digit()) && digits.len() != IMEI_DIGITS {
        return Err(DecodeError::out_of_range(
            "imei",
            format!("want {IMEI_DIGITS} digits, got {:?}", imei),
        ));
    }
    Ok(imei)
}
