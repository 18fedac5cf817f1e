//! CLI binary for JT701 Parser
//!
//! This provides the command-line interface for the JT701 parser library.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use glob::glob;
use jt701_parser::{decode_hex, export_messages, DecodedMessage, ExportOptions, HumanMessage};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

fn build_command() -> Command {
    let long_version = format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_GIT_COMMIT_DATE").unwrap_or("unknown")
    );

    Command::new("JT701 Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .about("Decode JT701/JT701D e-lock telemetry from hex dumps. Prints a readable summary, optionally JSON or CSV.")
        .arg(
            Arg::new("files")
                .help("Text files holding hex dumps (whitespace ignored, supports globbing)")
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("hex")
                .long("hex")
                .help("Decode an inline hex dump instead of files")
                .value_name("TEXT")
                .conflicts_with("files"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print each decoded message as JSON and export .jt701.jsonl files")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export PAL records to .jt701.csv files")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();

    for pattern in patterns {
        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => glob_iter.filter_map(|entry| entry.ok()).collect(),
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![PathBuf::from(pattern)]
        };

        for path in paths {
            if !path.is_file() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }
            debug!("added input file {:?}", path);
            valid_paths.push(path);
        }
    }

    valid_paths
}

fn print_messages(messages: &[DecodedMessage], as_json: bool) -> Result<()> {
    for message in messages {
        let human = HumanMessage::from_decoded(message)?;
        if as_json {
            println!("{}", human.to_json()?);
        } else {
            println!("{human}");
        }
    }
    Ok(())
}

fn process_file(path: &Path, matches: &ArgMatches, export_options: &ExportOptions) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read hex dump: {path:?}"))?;
    let messages = decode_hex(&text).with_context(|| format!("Failed to decode {path:?}"))?;
    debug!("{} message(s) in {:?}", messages.len(), path);

    print_messages(&messages, matches.get_flag("json"))?;

    let report = export_messages(&messages, path, export_options)?;
    if let Some(csv_path) = report.csv_path {
        println!("Exported records to: {}", csv_path.display());
    }
    if let Some(json_path) = report.json_path {
        println!("Exported messages to: {}", json_path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));

    if let Some(raw) = matches.get_one::<String>("hex") {
        let messages = decode_hex(raw).context("Failed to decode inline hex dump")?;
        return print_messages(&messages, matches.get_flag("json"));
    }

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    if file_patterns.is_empty() {
        build_command().print_help()?;
        std::process::exit(2);
    }

    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let valid_paths = expand_patterns(&file_patterns);
    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for path in &valid_paths {
        println!("Processing: {}", path.display());
        match process_file(path, &matches, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {}: {e:#}", path.display());
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_long_version_reports_package_version() {
        let long_version = build_command().render_long_version();
        assert!(long_version.contains(env!("CARGO_PKG_VERSION")));
        assert!(long_version.contains('('));
    }

    #[test]
    fn test_hex_conflicts_with_files() {
        let result =
            build_command().try_get_matches_from(["jt701_parser", "--hex", "24", "capture.hex"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_flags_parse() {
        let matches = build_command()
            .try_get_matches_from(["jt701_parser", "--csv", "--output-dir", "out", "a.hex"])
            .unwrap();
        assert!(matches.get_flag("csv"));
        assert!(!matches.get_flag("json"));
        assert_eq!(matches.get_one::<String>("output-dir").unwrap(), "out");
    }
}
