use crate::types::events::{EventSet, HighByteLockEvent, LowByteLockEvent};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Marker byte opening a positional/alarm data frame
pub const DATA_FRAME_MARKER: u8 = 0x24;
/// Marker byte opening a heartbeat or command frame
pub const COMMAND_FRAME_MARKER: u8 = 0x28;
/// Marker byte closing a heartbeat or command frame
pub const COMMAND_FRAME_TERMINATOR: u8 = 0x29;

/// Positional / Alarm / Lock sample from one data frame
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PalRecord {
    /// Time field read as a literal decimal magnitude, not an epoch timestamp
    pub utime_millis: u64,
    pub utime_seconds: u64,
    /// DDMMYY
    pub date: String,
    /// HHMMSS
    pub time: String,
    /// Raw latitude magnitude, convert with `coordinate_degrees`
    pub lat_raw: u32,
    /// Raw longitude magnitude with the direction nibble removed
    pub lng_raw: u32,
    /// Hex digit trailing the longitude field (fix status and hemispheres)
    pub direction_indicator: char,
    /// Raw speed unit, 1.85 km/h each
    pub speed: u8,
    /// Raw course unit, 2 degrees each
    pub angle: u8,
    /// Mileage in km
    pub distance_km: u32,
    pub visible_satellites: u8,
    /// Cell ID in the upper 16 bits, location area code in the lower 16
    pub cell_id_position_code: u32,
    pub mcc: u16,
    pub mnc_high_byte: u8,
    pub mnc_low_byte: u8,
    /// 99 means no reading, see `gsm_signal_quality_label`
    pub gsm_signal_quality: u8,
    pub fence_alarm_id: u8,
    /// Wake-up source (0-10)
    pub expanded_device_status: u8,
    /// Battery charging status
    pub expanded_device_status2: u8,
    pub battery_level_percent: u8,
    pub serial_no: u8,
    /// Bytes from the date field through the serial number, as declared
    pub record_length: u16,
    pub high_events: EventSet<HighByteLockEvent>,
    pub low_events: EventSet<LowByteLockEvent>,
}

impl PalRecord {
    /// Mobile station cell ID
    pub fn cell_id(&self) -> u16 {
        (self.cell_id_position_code >> 16) as u16
    }

    /// Location area code
    pub fn lac(&self) -> u16 {
        (self.cell_id_position_code & 0xFFFF) as u16
    }

    pub fn mnc(&self) -> u16 {
        u16::from(self.mnc_high_byte) << 8 | u16::from(self.mnc_low_byte)
    }

    /// Both event bytes as the 16-bit device status word (high byte first)
    pub fn device_status(&self) -> u16 {
        u16::from(self.high_events.bits()) << 8 | u16::from(self.low_events.bits())
    }

    pub fn add_high_event(&mut self, event: HighByteLockEvent) {
        self.high_events.add(event);
    }

    pub fn has_high_event(&self, event: HighByteLockEvent) -> bool {
        self.high_events.has(event)
    }

    pub fn add_low_event(&mut self, event: LowByteLockEvent) {
        self.low_events.add(event);
    }

    pub fn has_low_event(&self, event: LowByteLockEvent) -> bool {
        self.low_events.has(event)
    }
}

/// Decode result for one transport buffer
///
/// Header-level fields come from the last data frame in the buffer; `records`
/// holds one entry per data frame, in frame order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DecodedMessage {
    pub protocol_header: u8,
    pub protocol_version: u8,
    /// IMEI region as hex text, including the `F` filler nibble
    pub imei: String,
    pub terminal_id: String,
    pub device_type: u8,
    pub data_type: u8,
    pub bind_vehicle_id: String,
    pub contains_healthcheck: bool,
    pub records: Vec<PalRecord>,
}

impl DecodedMessage {
    /// The 15-digit IMEI, if the device reported one
    pub fn imei_digits(&self) -> Option<&str> {
        let digits = self.imei.trim_end_matches(['F', 'f']);
        if digits.len() == 15 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(digits)
        } else {
            None
        }
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}
