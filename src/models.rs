//! Data models for USGS earthquake query responses.
//!
//! These structures match the GeoJSON format returned by the FDSN event
//! service. Only the fields the map consumes are deserialized.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::errors::QuakeMapError;

/// Top-level GeoJSON response from the query service.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Response metadata
    pub metadata: Metadata,

    /// Earthquake events
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), QuakeMapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakeMapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }
}

/// Metadata about the query response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// When this response was generated (ms since epoch)
    pub generated: i64,

    /// Echo of the query URL
    pub url: String,

    /// Human-readable title
    pub title: String,

    /// Number of events in the response
    pub count: usize,
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Always "Feature"
    #[serde(rename = "type")]
    pub type_: String,

    /// Unique event ID
    pub id: String,

    /// Geographic location
    pub geometry: Geometry,

    /// Event properties
    pub properties: Properties,
}

impl Feature {
    /// Validate the event structure.
    pub fn validate(&self) -> Result<(), QuakeMapError> {
        if self.id.is_empty() {
            return Err(QuakeMapError::Validation("empty event ID".into()));
        }
        if self.geometry.coordinates.len() != 3 {
            return Err(QuakeMapError::Validation(format!(
                "expected 3 coordinates, got {}",
                self.geometry.coordinates.len()
            )));
        }
        Ok(())
    }

    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.properties.time).single()
    }

    /// Get longitude (degrees).
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.geometry.coordinates.first().copied().unwrap_or(0.0)
    }

    /// Get latitude (degrees).
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.geometry.coordinates.get(1).copied().unwrap_or(0.0)
    }

    /// Get depth in kilometers (positive down).
    ///
    /// A missing third coordinate reads as 0.0, which the encoder maps
    /// to the shallow band.
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.geometry.coordinates.get(2).copied().unwrap_or(0.0)
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Always "Point"
    #[serde(rename = "type")]
    pub type_: String,

    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// Event properties from the query service.
///
/// The service returns many more fields; only the ones the encoder and
/// page builder touch are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value (may be null for unreviewed events)
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: i64,

    /// Event page URL
    pub url: Option<String>,

    /// Human-readable title
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_query_response() {
        let json = include_str!("../tools/sample_query.json");
        let collection: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample response");

        collection.validate().expect("invalid collection");
        assert_eq!(collection.type_, "FeatureCollection");
        assert_eq!(collection.features.len(), collection.metadata.count);
        assert!(!collection.features.is_empty());

        for feature in &collection.features {
            feature.validate().expect("invalid feature");
            assert!(!feature.id.is_empty());
        }
    }

    #[test]
    fn test_coordinate_accessors() {
        let json = include_str!("../tools/sample_query.json");
        let collection: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample response");

        let first = &collection.features[0];
        assert!((first.longitude() - (-116.8601)).abs() < 1e-6);
        assert!((first.latitude() - 33.4935).abs() < 1e-6);
        assert!((first.depth_km() - 11.12).abs() < 1e-6);
        assert!(first.time().is_some());
    }
}
