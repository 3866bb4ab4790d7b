use crate::classify::MarkerStyle;
use crate::feed::EventRecord;
use crate::legend::{depth_legend, LegendBand};
use crate::prelude::{Classifier, FeedError, FeedResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER_ID: &str = "map";
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.09,
    lon: -95.71,
};
pub const DEFAULT_ZOOM: u8 = 5;
pub const OVERLAY_NAME: &str = "Earthquakes";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

/// Where the map is mounted and what it initially shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub container_id: String,
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewSettings {
    /// The container id has to be usable both as an element id and as a
    /// CSS selector: a letter followed by letters, digits, `-` or `_`.
    pub fn validate(&self) -> FeedResult<()> {
        let mut chars = self.container_id.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(FeedError::Render(format!(
                "map container id {:?} is missing or invalid",
                self.container_id
            )))
        }
    }
}

/// Background raster tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn street() -> Self {
        Self {
            name: "Street Map".into(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
        }
    }

    pub fn topographic() -> Self {
        Self {
            name: "Topographic Map".into(),
            url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".into(),
            attribution: "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; <a href=\"https://opentopomap.org\">OpenTopoMap</a> (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)".into(),
        }
    }
}

/// A single event drawn as a circle marker with a popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub lat: f64,
    pub lon: f64,
    pub style: MarkerStyle,
    pub popup: String,
    pub record: EventRecord,
}

impl CircleMarker {
    pub fn from_record(record: &EventRecord, classifier: &impl Classifier) -> Self {
        let (lat, lon) = record.lat_lon();
        Self {
            lat,
            lon,
            style: classifier.style(record),
            popup: popup_html(record),
            record: record.clone(),
        }
    }
}

/// Togglable marker layer drawn above the base tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub name: String,
    pub markers: Vec<CircleMarker>,
}

/// Everything needed to draw the map once. Built per render pass and owned
/// by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub settings: ViewSettings,
    pub base_layers: Vec<TileLayer>,
    pub overlay: Option<Overlay>,
    pub legend: Vec<LegendBand>,
}

impl MapView {
    pub fn build(
        settings: &ViewSettings,
        records: &[EventRecord],
        classifier: &impl Classifier,
    ) -> FeedResult<Self> {
        let mut view = Self::empty(settings)?;
        let markers: Vec<CircleMarker> = records
            .iter()
            .map(|record| CircleMarker::from_record(record, classifier))
            .collect();

        LogManager::new("render").record(&format!("built {} markers", markers.len()));

        view.overlay = Some(Overlay {
            name: OVERLAY_NAME.to_string(),
            markers,
        });
        Ok(view)
    }

    /// Base layers and legend only, used when there is nothing to plot.
    pub fn empty(settings: &ViewSettings) -> FeedResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings: settings.clone(),
            base_layers: vec![TileLayer::street(), TileLayer::topographic()],
            overlay: None,
            legend: depth_legend(),
        })
    }

    pub fn markers(&self) -> &[CircleMarker] {
        self.overlay
            .as_ref()
            .map(|overlay| overlay.markers.as_slice())
            .unwrap_or_default()
    }
}

pub fn popup_html(record: &EventRecord) -> String {
    format!(
        "<h3>{}</h3><hr><p>Magnitude: {}<br>Location: ({},{})<br>Depth: {} km<br>{}</p>",
        escape_html(&record.place),
        record.magnitude,
        record.longitude,
        record.latitude,
        record.depth_km,
        record.human_time()
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DepthMagnitudeClassifier;
    use chrono::{TimeZone, Utc};

    fn record(place: &str, magnitude: f64, depth_km: f64) -> EventRecord {
        EventRecord::new(
            place,
            magnitude,
            Utc.timestamp_millis_opt(0).unwrap(),
            10.0,
            20.0,
            depth_km,
        )
    }

    #[test]
    fn builds_one_marker_per_record() {
        let records = vec![record("A", 3.0, 5.0), record("B", 4.0, 50.0)];
        let view = MapView::build(
            &ViewSettings::default(),
            &records,
            &DepthMagnitudeClassifier::default(),
        )
        .unwrap();
        assert_eq!(view.markers().len(), 2);
        assert_eq!(view.markers()[1].style.radius, 16.0);
        assert_eq!(view.base_layers.len(), 2);
        assert_eq!(view.legend.len(), 5);
        assert_eq!(view.overlay.as_ref().unwrap().name, OVERLAY_NAME);
    }

    #[test]
    fn popup_lists_fields() {
        let popup = popup_html(&record("X", 3.0, 5.0));
        assert_eq!(
            popup,
            "<h3>X</h3><hr><p>Magnitude: 3<br>Location: (10,20)<br>Depth: 5 km<br>Thu Jan 01 1970 00:00:00 UTC</p>"
        );
    }

    #[test]
    fn popup_escapes_place() {
        let popup = popup_html(&record("<b>Ridge & Rise</b>", 1.0, 1.0));
        assert!(popup.contains("&lt;b&gt;Ridge &amp; Rise&lt;/b&gt;"));
    }

    #[test]
    fn invalid_container_is_render_error() {
        for id in ["", "1map", "my map", "map<"] {
            let settings = ViewSettings {
                container_id: id.to_string(),
                ..Default::default()
            };
            let err = MapView::empty(&settings).unwrap_err();
            assert!(matches!(err, FeedError::Render(_)), "id {id:?}");
        }
    }

    #[test]
    fn empty_view_has_no_overlay() {
        let view = MapView::empty(&ViewSettings::default()).unwrap();
        assert!(view.overlay.is_none());
        assert!(view.markers().is_empty());
    }
}
