//! Export of decoded messages to files
//!
//! CSV holds one row per PAL record (feature `csv`); JSON lines hold one
//! human-readable message per line (feature `json`).

use crate::types::DecodedMessage;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg(any(feature = "csv", feature = "json"))]
use crate::human::HumanMessage;
#[cfg(any(feature = "csv", feature = "json"))]
use anyhow::Context;

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

/// Paths written by an export run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Output paths for an input file: `<stem>.jt701.csv` and `<stem>.jt701.jsonl`
///
/// Files land in `output_dir` when set, else next to the input.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> (PathBuf, PathBuf) {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("jt701");

    let dir = match &export_options.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    (
        dir.join(format!("{stem}.jt701.csv")),
        dir.join(format!("{stem}.jt701.jsonl")),
    )
}

/// Run every export enabled in `export_options`
pub fn export_messages(
    messages: &[DecodedMessage],
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    if export_options.csv {
        report.csv_path = export_to_csv(messages, input_path, export_options)?;
    }
    if export_options.json {
        report.json_path = export_to_json(messages, input_path, export_options)?;
    }

    Ok(report)
}

#[cfg(any(feature = "csv", feature = "json"))]
fn prepare_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {parent:?}"))?;
        }
    }
    Ok(())
}

#[cfg(feature = "csv")]
const CSV_HEADER: [&str; 24] = [
    "terminal_id",
    "imei",
    "serial_no",
    "date",
    "time",
    "latitude",
    "longitude",
    "direction_indicator",
    "speed_kmh",
    "angle_degrees",
    "distance_km",
    "visible_satellites",
    "battery_level_percent",
    "gsm_signal_quality",
    "cell_id",
    "lac",
    "mcc",
    "mnc",
    "fence_alarm_id",
    "expanded_device_status",
    "expanded_device_status2",
    "high_events",
    "low_events",
    "device_status",
];

/// Write one CSV row per PAL record; returns `None` when there are no records
#[cfg(feature = "csv")]
pub fn export_to_csv(
    messages: &[DecodedMessage],
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    use crate::conversion::format_device_status;

    if messages.iter().all(|m| m.records.is_empty()) {
        return Ok(None);
    }

    let (csv_path, _) = compute_export_paths(input_path, export_options);
    prepare_output(&csv_path)?;

    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create CSV file: {csv_path:?}"))?;
    writer.write_record(CSV_HEADER)?;

    for message in messages {
        let human = HumanMessage::from_decoded(message)?;
        for (record, raw) in human.records.iter().zip(&message.records) {
            writer.write_record([
                human.terminal_id.clone(),
                human.imei.clone(),
                record.serial_no.to_string(),
                record.date.clone(),
                record.time.clone(),
                format!("{:.6}", record.signed_latitude),
                format!("{:.6}", record.signed_longitude),
                raw.direction_indicator.to_string(),
                record.speed_kmh.to_string(),
                record.angle_degrees.to_string(),
                record.distance_km.to_string(),
                record.visible_satellites.to_string(),
                record.battery_level_percent.to_string(),
                record.gsm_signal_quality.to_string(),
                record.cell_id.to_string(),
                record.lac.to_string(),
                record.mcc.to_string(),
                record.mnc.to_string(),
                record.fence_alarm_id.to_string(),
                record.expanded_device_status.to_string(),
                record.expanded_device_status2.to_string(),
                record.high_events.clone(),
                record.low_events.clone(),
                format_device_status(raw.device_status()),
            ])?;
        }
    }

    writer.flush()?;
    Ok(Some(csv_path))
}

#[cfg(not(feature = "csv"))]
pub fn export_to_csv(
    _messages: &[DecodedMessage],
    _input_path: &Path,
    _export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    anyhow::bail!("CSV export requires the `csv` feature")
}

/// Write one JSON line per message; returns `None` when there are no messages
#[cfg(feature = "json")]
pub fn export_to_json(
    messages: &[DecodedMessage],
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    use std::io::Write;

    if messages.is_empty() {
        return Ok(None);
    }

    let (_, json_path) = compute_export_paths(input_path, export_options);
    prepare_output(&json_path)?;

    let file = std::fs::File::create(&json_path)
        .with_context(|| format!("Failed to create JSON file: {json_path:?}"))?;
    let mut writer = std::io::BufWriter::new(file);

    for message in messages {
        let line = HumanMessage::from_decoded(message)?.to_json()?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(Some(json_path))
}

#[cfg(not(feature = "json"))]
pub fn export_to_json(
    _messages: &[DecodedMessage],
    _input_path: &Path,
    _export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    anyhow::bail!("JSON export requires the `json` feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_next_to_input() {
        let (csv, json) =
            compute_export_paths(Path::new("/data/lock.hex"), &ExportOptions::default());
        assert_eq!(csv, PathBuf::from("/data/lock.jt701.csv"));
        assert_eq!(json, PathBuf::from("/data/lock.jt701.jsonl"));
    }

    #[test]
    fn test_paths_in_output_dir() {
        let options = ExportOptions {
            output_dir: Some("/tmp/out".to_string()),
            ..Default::default()
        };
        let (csv, _) = compute_export_paths(Path::new("/data/lock.hex"), &options);
        assert_eq!(csv, PathBuf::from("/tmp/out/lock.jt701.csv"));
    }

    #[test]
    fn test_nothing_enabled_writes_nothing() {
        let report =
            export_messages(&[], Path::new("lock.hex"), &ExportOptions::default()).unwrap();
        assert_eq!(report, ExportReport::default());
    }
}
