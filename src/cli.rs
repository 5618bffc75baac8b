//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::map::MapOptions;
use crate::output::Format;
use crate::query::{BBox, DEFAULT_LIMIT, QuerySpec, parse_date};

/// Interactive earthquake maps from USGS data.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch events and write a standalone HTML map
    Render(RenderArgs),

    /// Fetch events and print their visual encodings
    Encode(EncodeArgs),

    /// Fetch events once and serve the map over HTTP
    Serve(ServeArgs),
}

/// Event query selection, shared by all commands.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Start of the query window (YYYY-MM-DD or RFC 3339, default: 24h ago)
    #[arg(long, value_parser = parse_query_date)]
    pub start: Option<DateTime<Utc>>,

    /// End of the query window (YYYY-MM-DD or RFC 3339, default: now)
    #[arg(long, value_parser = parse_query_date)]
    pub end: Option<DateTime<Utc>>,

    /// Bounding box: minlat,minlon,maxlat,maxlon
    #[arg(long, value_parser = parse_bbox)]
    pub bbox: Option<BBox>,

    /// Minimum magnitude to request
    #[arg(long)]
    pub min_magnitude: Option<f64>,

    /// Maximum number of events to request
    #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

impl QueryArgs {
    /// Build the query spec, filling unset bounds from the default
    /// 24-hour window.
    #[must_use]
    pub fn to_spec(&self) -> QuerySpec {
        let mut spec = QuerySpec::last_day();
        if let Some(start) = self.start {
            spec.start = start;
        }
        if let Some(end) = self.end {
            spec.end = end;
        }
        spec.bbox = self.bbox;
        spec.min_magnitude = self.min_magnitude;
        spec.limit = self.limit;
        spec
    }
}

/// Map view selection, shared by `render` and `serve`.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Page title
    #[arg(long, default_value = "Earthquake Map")]
    pub title: String,

    /// Initial map center: lat,lon
    #[arg(long, default_value = "50,-50", value_parser = parse_center)]
    pub center: (f64, f64),

    /// Initial zoom level
    #[arg(long, default_value = "3")]
    pub zoom: u8,
}

impl ViewArgs {
    /// Build the page options for the map builder.
    #[must_use]
    pub fn to_options(&self) -> MapOptions {
        MapOptions {
            title: self.title.clone(),
            center_lat: self.center.0,
            center_lon: self.center.1,
            zoom: self.zoom,
        }
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Output path for the HTML document
    #[arg(long, short = 'o', default_value = "map.html")]
    pub output: String,
}

/// Arguments for the `encode` command.
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a query date from string.
fn parse_query_date(s: &str) -> Result<DateTime<Utc>, String> {
    parse_date(s)
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a bounding box from string.
fn parse_bbox(s: &str) -> Result<BBox, String> {
    s.parse()
}

/// Parse a map center from a `lat,lon` string.
fn parse_center(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("center requires 2 values (lat,lon), got {}", parts.len()));
    }

    let lat: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }

    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_center() {
        let (lat, lon) = parse_center("50,-50").unwrap();
        assert!((lat - 50.0).abs() < f64::EPSILON);
        assert!((lon - (-50.0)).abs() < f64::EPSILON);

        assert!(parse_center("50").is_err());
        assert!(parse_center("95,-50").is_err());
        assert!(parse_center("50,200").is_err());
    }
}
