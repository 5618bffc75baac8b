//! Visual encoding of earthquake events.
//!
//! Maps raw event records to marker styles: depth drives the fill color
//! through a fixed six-level palette, radius and opacity are constant,
//! and the popup text combines magnitude and place.

use serde::Serialize;

use crate::models::Feature;

// Depth palette, shallow to deep. The marker style is the single source
// of truth; the legend is derived from the same constants.
const COLOR_SHALLOW: &str = "#a3f005"; // <= 20 km
const COLOR_20: &str = "#f0f005"; // > 20 km
const COLOR_40: &str = "#f0d105"; // > 40 km
const COLOR_60: &str = "#f09a05"; // > 60 km
const COLOR_80: &str = "#d43d0b"; // > 80 km
const COLOR_100: &str = "#9c0909"; // > 100 km

/// All palette colors, shallow to deep.
pub const PALETTE: [&str; 6] = [
    COLOR_SHALLOW,
    COLOR_20,
    COLOR_40,
    COLOR_60,
    COLOR_80,
    COLOR_100,
];

/// Marker radius in pixels. Magnitude does not affect sizing; it only
/// appears in the popup text.
pub const MARKER_RADIUS_PX: f64 = 10.0;

/// Marker fill opacity.
pub const MARKER_FILL_OPACITY: f64 = 0.85;

/// Marker stroke color (dark outline around each circle).
pub const MARKER_STROKE_COLOR: &str = "#07260a";

/// Marker stroke opacity.
pub const MARKER_STROKE_OPACITY: f64 = 1.0;

/// Marker stroke weight in pixels.
pub const MARKER_STROKE_WEIGHT: f64 = 0.5;

/// Map a hypocenter depth to its palette color.
///
/// Thresholds are checked deepest-first with strictly-greater-than
/// comparisons, so each boundary value belongs to the band below it
/// (exactly 100 km is the 80-100 band). Depths of 20 km or less,
/// negative depths, and NaN all resolve to the shallow color, keeping
/// the function total over every `f64` input.
#[must_use]
pub fn color_for_depth(depth_km: f64) -> &'static str {
    match depth_km {
        d if d > 100.0 => COLOR_100,
        d if d > 80.0 => COLOR_80,
        d if d > 60.0 => COLOR_60,
        d if d > 40.0 => COLOR_40,
        d if d > 20.0 => COLOR_20,
        _ => COLOR_SHALLOW,
    }
}

/// Marker style and popup content for one event.
///
/// Immutable once built; every event yields exactly one encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEncoding {
    pub radius_px: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
    pub popup_text: String,
}

/// Build the visual encoding for a single event.
///
/// Pure and infallible: missing magnitude or place degrade to "unknown"
/// in the popup text, and any depth (including a missing third
/// coordinate) resolves to a palette color.
#[must_use]
pub fn encode_event(event: &Feature) -> VisualEncoding {
    let magnitude = event
        .properties
        .mag
        .map_or_else(|| "unknown".to_string(), |m| m.to_string());
    let place = event.properties.place.as_deref().unwrap_or("unknown");

    VisualEncoding {
        radius_px: MARKER_RADIUS_PX,
        fill_color: color_for_depth(event.depth_km()),
        fill_opacity: MARKER_FILL_OPACITY,
        stroke_color: MARKER_STROKE_COLOR,
        stroke_opacity: MARKER_STROKE_OPACITY,
        stroke_weight: MARKER_STROKE_WEIGHT,
        popup_text: format!("Magnitude: {magnitude}; Location: {place}"),
    }
}

/// One legend row: the lower bound of a depth band and its color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendLevel {
    pub threshold_km: u32,
    pub color: &'static str,
}

/// The fixed legend scale, ascending by depth band.
///
/// Each row's color matches what `color_for_depth` returns for depths
/// inside that band.
#[must_use]
pub const fn legend_levels() -> [LegendLevel; 6] {
    [
        LegendLevel {
            threshold_km: 0,
            color: COLOR_SHALLOW,
        },
        LegendLevel {
            threshold_km: 20,
            color: COLOR_20,
        },
        LegendLevel {
            threshold_km: 40,
            color: COLOR_40,
        },
        LegendLevel {
            threshold_km: 60,
            color: COLOR_60,
        },
        LegendLevel {
            threshold_km: 80,
            color: COLOR_80,
        },
        LegendLevel {
            threshold_km: 100,
            color: COLOR_100,
        },
    ]
}

/// Depth band label for terminal output.
#[must_use]
pub fn depth_label(depth_km: f64) -> &'static str {
    match depth_km {
        d if d > 100.0 => "DEEP",
        d if d > 60.0 => "INTERMED",
        d if d > 20.0 => "CRUSTAL",
        _ => "SHALLOW",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Feature, Geometry, Properties};

    fn event(mag: Option<f64>, depth: f64, place: Option<&str>) -> Feature {
        Feature {
            type_: "Feature".into(),
            id: "test1234".into(),
            geometry: Geometry {
                type_: "Point".into(),
                coordinates: vec![-120.0, 37.0, depth],
            },
            properties: Properties {
                mag,
                place: place.map(String::from),
                time: 1_700_000_000_000,
                url: None,
                title: None,
            },
        }
    }

    #[test]
    fn test_color_total_over_all_depths() {
        for d in [0.0, 20.0, -5.0, 1000.0, f64::NAN, f64::INFINITY] {
            let color = color_for_depth(d);
            assert!(PALETTE.contains(&color), "no palette color for {d}");
        }
    }

    #[test]
    fn test_color_thresholds_exclusive() {
        assert_eq!(color_for_depth(100.1), COLOR_100);
        assert_eq!(color_for_depth(100.0), COLOR_80);
        assert_eq!(color_for_depth(80.0), COLOR_60);
        assert_eq!(color_for_depth(60.0), COLOR_40);
        assert_eq!(color_for_depth(40.0), COLOR_20);
    }

    #[test]
    fn test_color_shallow_fallback() {
        assert_eq!(color_for_depth(20.1), COLOR_20);
        assert_eq!(color_for_depth(20.0), COLOR_SHALLOW);
        assert_eq!(color_for_depth(0.0), COLOR_SHALLOW);
        assert_eq!(color_for_depth(-5.0), COLOR_SHALLOW);
        assert_eq!(color_for_depth(f64::NAN), COLOR_SHALLOW);
    }

    #[test]
    fn test_encode_deterministic() {
        let e = event(Some(4.2), 45.0, Some("10km N of Example"));
        assert_eq!(encode_event(&e), encode_event(&e));
    }

    #[test]
    fn test_encode_popup_text() {
        let e = event(Some(4.2), 45.0, Some("10km N of Example"));
        let enc = encode_event(&e);
        assert_eq!(enc.popup_text, "Magnitude: 4.2; Location: 10km N of Example");
        assert_eq!(enc.fill_color, COLOR_40);
        assert!((enc.radius_px - 10.0).abs() < f64::EPSILON);
        assert!((enc.fill_opacity - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_encode_missing_fields() {
        let e = event(None, 5.0, None);
        let enc = encode_event(&e);
        assert_eq!(enc.popup_text, "Magnitude: unknown; Location: unknown");
        assert_eq!(enc.fill_color, COLOR_SHALLOW);
    }

    #[test]
    fn test_legend_six_ascending_bands() {
        let levels = legend_levels();
        assert_eq!(levels.len(), 6);

        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.threshold_km, 20 * u32::try_from(i).expect("small index"));
            assert_eq!(level.color, PALETTE[i]);
        }

        // Each band's color agrees with the marker mapping for a depth
        // just inside the band.
        for level in levels {
            let probe = f64::from(level.threshold_km) + 0.1;
            assert_eq!(color_for_depth(probe), level.color);
        }
    }
}
