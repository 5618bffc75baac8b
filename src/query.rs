//! Query specification for the FDSN event service.
//!
//! Builds the parameter set for a one-shot event query: time window,
//! geographic bounding box, magnitude floor, and result limit.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Default number of events to request.
pub const DEFAULT_LIMIT: usize = 2000;

/// Geographic bounding box for the query.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl std::str::FromStr for BBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(format!(
                "bbox requires 4 values (minlat,minlon,maxlat,maxlon), got {}",
                parts.len()
            ));
        }

        let vals: Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse::<f64>()).collect();
        let vals = vals.map_err(|e| format!("invalid number in bbox: {e}"))?;

        let bbox = Self {
            min_lat: vals[0],
            min_lon: vals[1],
            max_lat: vals[2],
            max_lon: vals[3],
        };

        // Validate ranges
        if bbox.min_lat < -90.0 || bbox.min_lat > 90.0 {
            return Err(format!("min_lat {} out of range [-90, 90]", bbox.min_lat));
        }
        if bbox.max_lat < -90.0 || bbox.max_lat > 90.0 {
            return Err(format!("max_lat {} out of range [-90, 90]", bbox.max_lat));
        }
        if bbox.min_lon < -180.0 || bbox.min_lon > 180.0 {
            return Err(format!("min_lon {} out of range [-180, 180]", bbox.min_lon));
        }
        if bbox.max_lon < -180.0 || bbox.max_lon > 180.0 {
            return Err(format!("max_lon {} out of range [-180, 180]", bbox.max_lon));
        }
        if bbox.min_lat > bbox.max_lat {
            return Err(format!(
                "min_lat {} must be <= max_lat {}",
                bbox.min_lat, bbox.max_lat
            ));
        }

        Ok(bbox)
    }
}

/// Parse a query date: `YYYY-MM-DD` or full RFC 3339.
///
/// Bare dates resolve to midnight UTC.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD or RFC 3339): {e}"))
}

/// Criteria for a one-shot event query.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub bbox: Option<BBox>,
    pub min_magnitude: Option<f64>,
    pub limit: usize,
}

impl QuerySpec {
    /// Query covering the 24 hours ending now.
    #[must_use]
    pub fn last_day() -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(1),
            end,
            bbox: None,
            min_magnitude: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Build the key/value pairs for the query URL.
    ///
    /// The service rejects windows where start is not before end, so
    /// that is checked here rather than round-tripped to the API.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, String> {
        if self.start >= self.end {
            return Err(format!(
                "start {} must be before end {}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            ));
        }

        let mut params = vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ("endtime", self.end.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ("orderby", "time".to_string()),
            ("limit", self.limit.to_string()),
        ];

        if let Some(bbox) = self.bbox {
            params.push(("minlatitude", bbox.min_lat.to_string()));
            params.push(("maxlatitude", bbox.max_lat.to_string()));
            params.push(("minlongitude", bbox.min_lon.to_string()));
            params.push(("maxlongitude", bbox.max_lon.to_string()));
        }

        if let Some(min_mag) = self.min_magnitude {
            params.push(("minmagnitude", min_mag.to_string()));
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_parse() {
        let bbox: BBox = "25.16,-123.83,48.74,-69.52".parse().unwrap();
        assert!((bbox.min_lat - 25.16).abs() < 0.001);
        assert!((bbox.min_lon - (-123.83)).abs() < 0.001);
        assert!((bbox.max_lat - 48.74).abs() < 0.001);
        assert!((bbox.max_lon - (-69.52)).abs() < 0.001);
    }

    #[test]
    fn test_bbox_rejects_bad_input() {
        assert!("1,2,3".parse::<BBox>().is_err());
        assert!("95.0,-120.0,96.0,-110.0".parse::<BBox>().is_err());
        assert!("40.0,-120.0,30.0,-110.0".parse::<BBox>().is_err());
        assert!("a,b,c,d".parse::<BBox>().is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let d = parse_date("2014-01-01").unwrap();
        assert_eq!(d.format("%Y-%m-%dT%H:%M:%S").to_string(), "2014-01-01T00:00:00");

        let d = parse_date("2014-01-01T12:30:00Z").unwrap();
        assert_eq!(d.format("%H:%M").to_string(), "12:30");

        assert!(parse_date("01/01/2014").is_err());
    }

    #[test]
    fn test_query_params() {
        let spec = QuerySpec {
            start: parse_date("2014-01-01").unwrap(),
            end: parse_date("2014-01-02").unwrap(),
            bbox: Some("25.16,-123.83,48.74,-69.52".parse().unwrap()),
            min_magnitude: Some(2.5),
            limit: 100,
        };

        let params = spec.to_params().unwrap();
        let get = |key| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("format"), Some("geojson"));
        assert_eq!(get("starttime"), Some("2014-01-01T00:00:00"));
        assert_eq!(get("endtime"), Some("2014-01-02T00:00:00"));
        assert_eq!(get("minlatitude"), Some("25.16"));
        assert_eq!(get("maxlongitude"), Some("-69.52"));
        assert_eq!(get("minmagnitude"), Some("2.5"));
        assert_eq!(get("limit"), Some("100"));
    }

    #[test]
    fn test_query_rejects_inverted_window() {
        let spec = QuerySpec {
            start: parse_date("2014-01-02").unwrap(),
            end: parse_date("2014-01-01").unwrap(),
            bbox: None,
            min_magnitude: None,
            limit: DEFAULT_LIMIT,
        };
        assert!(spec.to_params().is_err());
    }
}
