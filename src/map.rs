//! Standalone map page builder.
//!
//! Generates a self-contained HTML document that hands the encoded
//! events to Leaflet: three selectable base tile layers, an
//! "Earthquakes" overlay with one circle marker per event, a layer
//! control, and a depth legend. Tile rendering, projection, and
//! pan/zoom all belong to Leaflet and the tile providers.

use std::fmt::Write as _;

use crate::encode::{encode_event, legend_levels};
use crate::models::Feature;

/// A selectable base tile layer.
struct BaseLayer {
    name: &'static str,
    url_template: &'static str,
    attribution: &'static str,
    max_zoom: u8,
}

/// Token-free tile providers for the three base map choices.
const BASE_LAYERS: [BaseLayer; 3] = [
    BaseLayer {
        name: "Grayscale",
        url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
        attribution: "&copy; <a href=\\\"https://www.openstreetmap.org/copyright\\\">OpenStreetMap</a> contributors &copy; <a href=\\\"https://carto.com/attributions\\\">CARTO</a>",
        max_zoom: 19,
    },
    BaseLayer {
        name: "Satellite",
        url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri &mdash; Source: Esri, Maxar, Earthstar Geographics",
        max_zoom: 18,
    },
    BaseLayer {
        name: "Terrain",
        url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution: "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; <a href=\\\"https://opentopomap.org\\\">OpenTopoMap</a> (CC-BY-SA)",
        max_zoom: 17,
    },
];

/// Page-level options for the rendered map.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub title: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: "Earthquake Map".to_string(),
            center_lat: 50.0,
            center_lon: -50.0,
            zoom: 3,
        }
    }
}

/// Escape text for a double-quoted JavaScript string literal.
fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            // Keeps "</script>" from terminating the surrounding tag.
            '<' => out.push_str("\\u003c"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for HTML content.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// JavaScript variable name for a base layer.
fn layer_var(layer: &BaseLayer) -> String {
    layer.name.to_lowercase()
}

/// Emit the `L.tileLayer` declarations for all base layers.
fn base_layers_js() -> String {
    let mut js = String::new();
    for layer in &BASE_LAYERS {
        let _ = writeln!(
            js,
            "var {} = L.tileLayer(\"{}\", {{ attribution: \"{}\", maxZoom: {} }});",
            layer_var(layer),
            layer.url_template,
            layer.attribution,
            layer.max_zoom
        );
    }
    js
}

/// Emit one `L.circleMarker` call per event, added to the overlay group.
///
/// Markers are emitted in input order; each one is styled entirely from
/// the event's visual encoding.
fn markers_js(events: &[Feature]) -> String {
    let mut js = String::new();
    for event in events {
        let enc = encode_event(event);
        let _ = writeln!(
            js,
            "L.circleMarker([{lat}, {lon}], {{ radius: {radius}, fillColor: \"{fill}\", \
             fillOpacity: {fill_op}, color: \"{stroke}\", opacity: {stroke_op}, \
             weight: {weight}, stroke: true }}).bindPopup(\"{popup}\").addTo(earthquakes);",
            lat = event.latitude(),
            lon = event.longitude(),
            radius = enc.radius_px,
            fill = enc.fill_color,
            fill_op = enc.fill_opacity,
            stroke = enc.stroke_color,
            stroke_op = enc.stroke_opacity,
            weight = enc.stroke_weight,
            popup = escape_js(&enc.popup_text),
        );
    }
    js
}

/// Build the legend rows from the fixed depth scale.
fn legend_rows() -> String {
    let levels = legend_levels();
    let mut rows = String::new();
    for (i, level) in levels.iter().enumerate() {
        let range = match levels.get(i + 1) {
            Some(next) => format!("{}&ndash;{} km", level.threshold_km, next.threshold_km),
            None => format!("{}+ km", level.threshold_km),
        };
        let _ = write!(
            rows,
            "<i style=\\\"background:{}\\\"></i> {}<br>",
            level.color, range
        );
    }
    rows
}

/// Render the complete standalone map page.
#[must_use]
pub fn render_page(events: &[Feature], opts: &MapOptions) -> String {
    let base_layers = base_layers_js();
    let markers = markers_js(events);
    let legend = legend_rows();

    let base_map_entries = BASE_LAYERS
        .iter()
        .map(|l| format!("\"{} Map\": {}", l.name, layer_var(l)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body {{ height: 100%; margin: 0; }}
#map {{ height: 100%; }}
.legend {{
  background: #fff;
  padding: 8px 12px;
  font: 12px/1.7 -apple-system, BlinkMacSystemFont, sans-serif;
  border-radius: 4px;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.3);
}}
.legend i {{
  width: 12px;
  height: 12px;
  display: inline-block;
  margin-right: 6px;
  vertical-align: -1px;
}}
</style>
</head>
<body>
<div id="map"></div>
<script>
{base_layers}
var map = L.map("map", {{
  center: [{center_lat}, {center_lon}],
  zoom: {zoom},
  layers: [{default_layer}]
}});

var earthquakes = L.layerGroup();
{markers}
earthquakes.addTo(map);

var baseMaps = {{ {base_map_entries} }};
var overlayMaps = {{ "Earthquakes": earthquakes }};
L.control.layers(baseMaps, overlayMaps).addTo(map);

var legend = L.control({{ position: "bottomright" }});
legend.onAdd = function () {{
  var div = L.DomUtil.create("div", "legend");
  div.innerHTML = "<strong>Depth</strong><br>{legend}";
  return div;
}};
legend.addTo(map);
</script>
</body>
</html>
"##,
        title = escape_html(&opts.title),
        base_layers = base_layers,
        center_lat = opts.center_lat,
        center_lon = opts.center_lon,
        zoom = opts.zoom,
        default_layer = layer_var(&BASE_LAYERS[0]),
        markers = markers,
        base_map_entries = base_map_entries,
        legend = legend,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::PALETTE;
    use crate::models::FeatureCollection;

    fn sample_events() -> Vec<Feature> {
        let json = include_str!("../tools/sample_query.json");
        let collection: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample response");
        collection.features
    }

    #[test]
    fn test_page_contains_layers_and_markers() {
        let events = sample_events();
        let page = render_page(&events, &MapOptions::default());

        assert!(page.contains("\"Grayscale Map\""));
        assert!(page.contains("\"Satellite Map\""));
        assert!(page.contains("\"Terrain Map\""));
        assert!(page.contains("\"Earthquakes\": earthquakes"));

        let marker_count = page.matches("L.circleMarker(").count();
        assert_eq!(marker_count, events.len());
    }

    #[test]
    fn test_page_contains_full_legend() {
        let page = render_page(&[], &MapOptions::default());
        for color in PALETTE {
            assert!(page.contains(color), "legend missing {color}");
        }
        assert!(page.contains("0&ndash;20 km"));
        assert!(page.contains("100+ km"));
    }

    #[test]
    fn test_page_uses_requested_view() {
        let opts = MapOptions {
            title: "California".to_string(),
            center_lat: 37.5,
            center_lon: -119.0,
            zoom: 6,
        };
        let page = render_page(&[], &opts);
        assert!(page.contains("<title>California</title>"));
        assert!(page.contains("center: [37.5, -119],"));
        assert!(page.contains("zoom: 6,"));
    }

    #[test]
    fn test_popup_text_is_escaped() {
        let mut events = sample_events();
        events.truncate(1);
        events[0].properties.place = Some("5km \"N\" of <script>town</script>".to_string());

        let page = render_page(&events, &MapOptions::default());
        assert!(page.contains("5km \\\"N\\\" of \\u003cscript>town\\u003c/script>"));
        assert!(!page.contains("of <script>town"));
    }
}
