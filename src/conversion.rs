//! Display conversions for decoded JT701 fields
//!
//! Pure functions turning raw codes and magnitudes into units and labels.
//! None of them touch a `DecodedMessage`; the projection in `human` builds
//! its own output from them.

use crate::error::{DecodeError, Result};

/// Protocol version code of the JT701D generation
pub const JT701D_VERSION_CODE: u8 = 19;

/// Raw speed unit in km/h
pub const SPEED_UNIT_KMH: f64 = 1.85;

/// Signal quality reported when the modem has no reading
pub const GSM_NO_SIGNAL: u8 = 99;

/// Device status bits in ascending bit order
///
/// Bits 0-7 come from the low event byte, bits 8-15 from the high one.
pub const DEVICE_STATUS_FLAGS: [(u8, &str); 16] = [
    (0, "baseStationPositioning"),
    (1, "enterFenceAlarm"),
    (2, "exitFenceAlarm"),
    (3, "lockRopeCutAlarm"),
    (4, "vibrationAlarm"),
    (5, "platformACKCommandRequired"),
    (6, "lockRopeState"),
    (7, "motorState"),
    (8, "longTimeUnlockingAlarm"),
    (9, "wrongPasswordAlarm"),
    (10, "swipeIllegalRFIDCardAlarm"),
    (11, "lowBatteryAlarm"),
    (12, "backCoverOpenedAlarm"),
    (13, "backCoverStatus"),
    (14, "motorStuckAlarm"),
    (15, "reserved"),
];

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

pub fn protocol_version_label(code: u8) -> &'static str {
    if code == JT701D_VERSION_CODE {
        "JT701D"
    } else {
        "JT701"
    }
}

pub fn device_type_label(device_type: u8) -> &'static str {
    match device_type {
        1 => "Regular rechargeable JT701",
        _ => "Unknown device type",
    }
}

pub fn data_type_label(data_type: u8) -> &'static str {
    match data_type {
        1 => "Real-time position data",
        2 => "Alarm data",
        3 => "Blind area position data",
        4 => "Sub-new position data (newly added by JT701D)",
        _ => "Unknown data type",
    }
}

fn two_digit_pairs(field: &str) -> Result<[u32; 3]> {
    if field.len() != 6 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidDate(field.to_string()));
    }
    let pair = |i: usize| -> u32 {
        let b = field.as_bytes();
        u32::from(b[i] - b'0') * 10 + u32::from(b[i + 1] - b'0')
    };
    Ok([pair(0), pair(2), pair(4)])
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Render a DDMMYY field as `YYYY-MM-DD`
///
/// Two-digit years are taken as 20YY, which is the only century the devices
/// report.
pub fn date_label(ddmmyy: &str) -> Result<String> {
    let [day, month, yy] = two_digit_pairs(ddmmyy)?;
    let year = 2000 + yy;

    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return Err(DecodeError::InvalidDate(ddmmyy.to_string())),
    };
    if day == 0 || day > days_in_month {
        return Err(DecodeError::InvalidDate(ddmmyy.to_string()));
    }

    Ok(format!("{year:04}-{month:02}-{day:02}"))
}

/// Render a HHMMSS field as `HH:MM:SS`
pub fn time_label(hhmmss: &str) -> Result<String> {
    let [hours, minutes, seconds] = two_digit_pairs(hhmmss)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(DecodeError::InvalidDate(hhmmss.to_string()));
    }
    Ok(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}

fn direction_nibble(indicator: char) -> Result<u32> {
    indicator.to_digit(16).ok_or_else(|| {
        DecodeError::out_of_range("direction indicator", format!("{indicator:?} is not a hex digit"))
    })
}

/// Describe the four low bits of the direction nibble
///
/// Bit 0 GPS fix, bit 1 north (else south), bit 2 east (else west),
/// bit 3 the vendor's fixed-value bit.
pub fn direction_indicator_label(indicator: char) -> Result<String> {
    let nibble = direction_nibble(indicator)?;

    let positioning = if nibble & 0x01 != 0 {
        "GPS positioning"
    } else {
        "GPS not positioning"
    };
    let latitude = if nibble & 0x02 != 0 {
        "north latitude"
    } else {
        "south latitude"
    };
    let longitude = if nibble & 0x04 != 0 {
        "east longitude"
    } else {
        "west longitude"
    };
    let fixed_value = if nibble & 0x08 != 0 {
        "fixed value.1"
    } else {
        "fixed value.0"
    };

    Ok([fixed_value, longitude, latitude, positioning].join(","))
}

/// Convert a raw DDMMmmmm magnitude into decimal degrees
pub fn coordinate_degrees(raw: impl Into<i64>) -> f64 {
    let raw = raw.into();
    let degrees = raw / 1_000_000;
    let minutes = (raw % 1_000_000) / 10_000;
    let fractional_minutes = (raw % 10_000) as f64 / 10_000.0;
    round6(degrees as f64 + (minutes as f64 + fractional_minutes) / 60.0)
}

/// Apply the hemisphere bits of the direction nibble to a degree value
///
/// South and west flip the sign; a non-hex indicator fails like
/// [`direction_indicator_label`].
pub fn signed_coordinates(lat_degrees: f64, lng_degrees: f64, indicator: char) -> Result<(f64, f64)> {
    let nibble = direction_nibble(indicator)?;
    let lat = if nibble & 0x02 != 0 { lat_degrees } else { -lat_degrees };
    let lng = if nibble & 0x04 != 0 { lng_degrees } else { -lng_degrees };
    Ok((lat, lng))
}

pub fn speed_kmh(raw: u8) -> f64 {
    round6(f64::from(raw) * SPEED_UNIT_KMH)
}

pub fn angle_degrees(raw: u8) -> u16 {
    u16::from(raw) * 2
}

/// Map the "no reading" code 0 to 99
pub fn gsm_signal_quality_label(value: u8) -> u8 {
    if value == 0 {
        GSM_NO_SIGNAL
    } else {
        value
    }
}

/// Expand the 16-bit device status into named flags, ascending bit order
pub fn device_status_flags(status: u16) -> Vec<(&'static str, bool)> {
    DEVICE_STATUS_FLAGS
        .iter()
        .map(|&(bit, name)| (name, status & (1 << bit) != 0))
        .collect()
}

/// Names of the set device status flags joined by `|`, or `0` when none are set
pub fn format_device_status(status: u16) -> String {
    let active: Vec<&str> = device_status_flags(status)
        .into_iter()
        .filter(|&(_, set)| set)
        .map(|(name, _)| name)
        .collect();

    if active.is_empty() {
        "0".to_string()
    } else {
        active.join("|")
    }
}
