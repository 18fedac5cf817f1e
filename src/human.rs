//! Human-readable projection of a decoded message
//!
//! The view is built as a fresh value from a borrowed `DecodedMessage`; the
//! canonical decode result keeps its raw magnitudes untouched.

use crate::conversion::*;
use crate::error::Result;
use crate::types::{DecodedMessage, PalRecord};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One device status flag with its state
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusFlag {
    pub name: &'static str,
    pub active: bool,
}

/// Display view of a PAL record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HumanRecord {
    pub date: String,
    pub time: String,
    pub utime_millis: u64,
    pub utime_seconds: u64,
    /// Decimal degrees, unsigned as on the wire
    pub latitude: f64,
    pub longitude: f64,
    /// Decimal degrees with south/west applied from the direction nibble
    pub signed_latitude: f64,
    pub signed_longitude: f64,
    pub direction_indicator: String,
    pub speed_kmh: f64,
    pub angle_degrees: u16,
    pub distance_km: u32,
    pub visible_satellites: u8,
    pub battery_level_percent: u8,
    pub cell_id: u16,
    pub lac: u16,
    pub mcc: u16,
    pub mnc: u16,
    pub gsm_signal_quality: u8,
    pub fence_alarm_id: u8,
    pub expanded_device_status: u8,
    pub expanded_device_status2: u8,
    pub serial_no: u8,
    pub data_length: u16,
    pub high_events: String,
    pub low_events: String,
    pub device_status: Vec<StatusFlag>,
}

/// Display view of a whole decoded message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HumanMessage {
    pub protocol_header: u8,
    pub protocol_version: &'static str,
    pub imei: String,
    pub terminal_id: String,
    pub device_type: &'static str,
    pub data_type: &'static str,
    pub bind_vehicle_id: String,
    pub contains_healthcheck: bool,
    pub records: Vec<HumanRecord>,
}

impl HumanRecord {
    pub fn from_record(record: &PalRecord) -> Result<Self> {
        let latitude = coordinate_degrees(record.lat_raw);
        let longitude = coordinate_degrees(record.lng_raw);
        let (signed_latitude, signed_longitude) =
            signed_coordinates(latitude, longitude, record.direction_indicator)?;

        Ok(Self {
            date: date_label(&record.date)?,
            time: time_label(&record.time)?,
            utime_millis: record.utime_millis,
            utime_seconds: record.utime_seconds,
            latitude,
            longitude,
            signed_latitude,
            signed_longitude,
            direction_indicator: direction_indicator_label(record.direction_indicator)?,
            speed_kmh: speed_kmh(record.speed),
            angle_degrees: angle_degrees(record.angle),
            distance_km: record.distance_km,
            visible_satellites: record.visible_satellites,
            battery_level_percent: record.battery_level_percent,
            cell_id: record.cell_id(),
            lac: record.lac(),
            mcc: record.mcc,
            mnc: record.mnc(),
            gsm_signal_quality: gsm_signal_quality_label(record.gsm_signal_quality),
            fence_alarm_id: record.fence_alarm_id,
            expanded_device_status: record.expanded_device_status,
            expanded_device_status2: record.expanded_device_status2,
            serial_no: record.serial_no,
            data_length: record.record_length,
            high_events: record.high_events.render(),
            low_events: record.low_events.render(),
            device_status: device_status_flags(record.device_status())
                .into_iter()
                .map(|(name, active)| StatusFlag { name, active })
                .collect(),
        })
    }
}

impl HumanMessage {
    /// Build the display view; fails if any record carries an invalid date or time
    pub fn from_decoded(decoded: &DecodedMessage) -> Result<Self> {
        let records = decoded
            .records
            .iter()
            .map(HumanRecord::from_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            protocol_header: decoded.protocol_header,
            protocol_version: protocol_version_label(decoded.protocol_version),
            imei: decoded.imei.clone(),
            terminal_id: decoded.terminal_id.clone(),
            device_type: device_type_label(decoded.device_type),
            data_type: data_type_label(decoded.data_type),
            bind_vehicle_id: decoded.bind_vehicle_id.clone(),
            contains_healthcheck: decoded.contains_healthcheck,
            records,
        })
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    #[cfg(feature = "json")]
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for HumanMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} terminal {} (IMEI {})",
            self.protocol_version, self.terminal_id, self.imei
        )?;
        writeln!(f, "  device: {} / {}", self.device_type, self.data_type)?;
        if self.contains_healthcheck {
            writeln!(f, "  heartbeat received")?;
        }
        for record in &self.records {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

impl fmt::Display for HumanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  #{} {} {}: {:.6}, {:.6} ({})",
            self.serial_no,
            self.date,
            self.time,
            self.latitude,
            self.longitude,
            self.direction_indicator
        )?;
        writeln!(
            f,
            "    speed {} km/h, course {}°, {} sats, mileage {} km",
            self.speed_kmh, self.angle_degrees, self.visible_satellites, self.distance_km
        )?;
        writeln!(
            f,
            "    battery {}%, GSM {}, cell {}/{} MCC {} MNC {}",
            self.battery_level_percent, self.gsm_signal_quality, self.cell_id, self.lac, self.mcc, self.mnc
        )?;

        let events = [self.high_events.as_str(), self.low_events.as_str()]
            .into_iter()
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join("|");
        if !events.is_empty() {
            writeln!(f, "    events: {events}")?;
        }
        Ok(())
    }
}
