//! JT701 Parser Library
//!
//! A Rust library for decoding telemetry frames sent by JT701/JT701D GPS
//! electronic locks. Decoding is synchronous and stateless: every call owns
//! its cursor and output, so buffers can be decoded from any number of
//! threads without coordination.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of PAL records
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable the JSON projection and JSON-lines export
//! - **`serde`**: Enable serialization of the data model
//!
//! # Quick Start
//!
//! Decode one data frame:
//! ```rust
//! use jt701_parser::{coordinate_degrees, decode_hex_buffer};
//!
//! let message = decode_hex_buffer(
//!     "2480006200111911003418042116225922348310113550543F12980000002D060000000020E028109228661F00010000868822040248195F000001CC0156",
//! ).unwrap();
//! let record = &message.records[0];
//! assert_eq!(message.terminal_id, "8000620011");
//! assert!((coordinate_degrees(record.lat_raw) - 22.580517).abs() < 1e-6);
//! ```
//!
//! Split a spaced hex dump into frames and project each for display:
//! ```rust,no_run
//! use jt701_parser::{decode_file, HumanMessage};
//! use std::path::Path;
//!
//! for message in decode_file(Path::new("capture.hex")).unwrap() {
//!     println!("{}", HumanMessage::from_decoded(&message).unwrap());
//! }
//! ```
//!
//! # Public API
//!
//! ## Decoding Functions
//! - [`split_frames`] - Split a hex dump into per-frame hex strings
//! - [`decode`] - Decode one transport buffer of raw bytes
//! - [`decode_hex`] - Split and decode a hex dump, one message per segment
//! - [`decode_hex_buffer`] - Decode a hex dump as a single buffer
//! - [`decode_file`] - Read and decode a hex dump file
//!
//! ## Data Types
//! - [`DecodedMessage`] - Frame-level identifiers plus the PAL records
//! - [`PalRecord`] - One positional/alarm/lock sample
//! - [`EventSet`] - Lock/alarm event byte as a flag set
//! - [`HumanMessage`] - Display view with units and labels
//!
//! ## Conversion Utilities
//! - [`coordinate_degrees`] - Raw magnitude to decimal degrees
//! - [`speed_kmh`] / [`angle_degrees`] - Unit scaling
//! - [`date_label`] / [`time_label`] - Calendar rendering
//! - [`device_status_flags`] - 16-bit status expansion

pub mod conversion;
pub mod error;
pub mod export;
pub mod human;
pub mod parser;
pub mod types;

#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
pub use error::{DecodeError, Result};
pub use export::*;
pub use human::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
pub use types::*;
