//! Output formatters for encoded earthquake events.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::encode::{VisualEncoding, depth_label, encode_event};
use crate::models::Feature;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Depth-band colors, mirroring the map palette bands
const GREEN: &str = "\x1b[92m"; // shallow: depth <= 20
const YELLOW: &str = "\x1b[93m"; // crustal: depth > 20
const MAGENTA: &str = "\x1b[95m"; // intermediate: depth > 60
const RED: &str = "\x1b[91m"; // deep: depth > 100

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// An event together with its visual encoding.
///
/// This is the normalized structure emitted in JSON/NDJSON output and
/// by the server's events endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedEvent {
    pub id: String,
    pub time: String,
    pub magnitude: Option<f64>,
    pub depth_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub place: Option<String>,
    pub url: Option<String>,
    pub encoding: VisualEncoding,
}

impl From<&Feature> for EncodedEvent {
    fn from(f: &Feature) -> Self {
        Self {
            id: f.id.clone(),
            time: f
                .time()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".into()),
            magnitude: f.properties.mag,
            depth_km: f.depth_km(),
            latitude: f.latitude(),
            longitude: f.longitude(),
            place: f.properties.place.clone(),
            url: f.properties.url.clone(),
            encoding: encode_event(f),
        }
    }
}

/// Get the terminal color for a depth value.
fn depth_color(depth_km: f64) -> &'static str {
    match depth_km {
        d if d > 100.0 => RED,
        d if d > 60.0 => MAGENTA,
        d if d > 20.0 => YELLOW,
        _ => GREEN,
    }
}

/// Write events in human-readable format.
///
/// One line per event: magnitude, depth band, the marker color the map
/// will use, and the popup text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, events: &[Feature]) -> io::Result<()> {
    for event in events {
        let enc = encode_event(event);

        let time = event
            .time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());

        let mag_str = event
            .properties
            .mag
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "?".into());

        let depth = event.depth_km();
        let color = depth_color(depth);
        let label = depth_label(depth);

        writeln!(
            writer,
            "{color}{BOLD}M{mag_str}{RESET} │ \
             {color}{label:8}{RESET} │ \
             {DIM}{depth:>6.1}km{RESET} │ \
             {swatch} │ \
             {time} UTC │ \
             {popup}",
            swatch = enc.fill_color,
            popup = enc.popup_text,
        )?;
    }
    Ok(())
}

/// Write events as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, events: &[Feature]) -> io::Result<()> {
    let output: Vec<EncodedEvent> = events.iter().map(EncodedEvent::from).collect();
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write events as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, events: &[Feature]) -> io::Result<()> {
    for event in events {
        let output = EncodedEvent::from(event);
        let json = serde_json::to_string(&output)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write events in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events<W: Write>(writer: &mut W, events: &[Feature], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, events),
        Format::Json => write_json(writer, events),
        Format::Ndjson => write_ndjson(writer, events),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureCollection;

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_ndjson_carries_encoding() {
        let json = include_str!("../tools/sample_query.json");
        let collection: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample response");

        let mut buf = Vec::new();
        write_ndjson(&mut buf, &collection.features).expect("write failed");
        let text = String::from_utf8(buf).expect("not utf-8");

        assert_eq!(text.lines().count(), collection.features.len());
        let first: serde_json::Value =
            serde_json::from_str(text.lines().next().expect("no lines")).expect("bad line");
        assert_eq!(first["encoding"]["radius_px"], 10.0);
        assert_eq!(first["encoding"]["fill_color"], "#a3f005");
    }
}
