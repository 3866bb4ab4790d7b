use crate::feed::geojson::Feature;
use crate::prelude::FeedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_PLACE: &str = "Unknown location";

/// One earthquake as received from the feed. Never mutated after decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub place: String,
    pub magnitude: f64,
    pub time: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

impl EventRecord {
    pub fn new(
        place: impl Into<String>,
        magnitude: f64,
        time: DateTime<Utc>,
        longitude: f64,
        latitude: f64,
        depth_km: f64,
    ) -> Self {
        Self {
            place: place.into(),
            magnitude,
            time,
            longitude,
            latitude,
            depth_km,
        }
    }

    /// Leaflet orders points as `(lat, lon)`.
    pub fn lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn human_time(&self) -> String {
        self.time.format("%a %b %d %Y %H:%M:%S UTC").to_string()
    }
}

impl TryFrom<&Feature> for EventRecord {
    type Error = FeedError;

    fn try_from(feature: &Feature) -> Result<Self, Self::Error> {
        let coordinates = &feature.geometry.coordinates;
        if coordinates.len() < 3 {
            return Err(FeedError::Parse(format!(
                "expected [lon, lat, depth], got {} coordinates",
                coordinates.len()
            )));
        }

        let millis = feature.properties.time;
        let time = if millis.is_finite() {
            DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)
        } else {
            None
        }
        .ok_or_else(|| FeedError::Parse(format!("timestamp {} out of range", millis)))?;

        let place = feature
            .properties
            .place
            .clone()
            .filter(|place| !place.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string());

        Ok(Self {
            place,
            magnitude: feature.properties.mag.unwrap_or(0.0),
            time,
            longitude: coordinates[0],
            latitude: coordinates[1],
            depth_km: coordinates[2],
        })
    }
}
