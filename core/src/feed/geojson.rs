use crate::feed::record::EventRecord;
use crate::prelude::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};

/// Top-level GeoJSON document returned by the summary feed.
///
/// Only the fields the map needs are modelled; everything else in the
/// document (metadata, bbox, per-feature ids) is ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Geometry,
}

/// Per-event attributes. The live feed sends `null` for `place` and `mag`
/// on some reviewed events. `time` is epoch milliseconds; some producers
/// emit it as a float, so it is kept as `f64` and truncated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub mag: Option<f64>,
    pub time: f64,
}

/// Point geometry as `[longitude, latitude, depth_km]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}

impl FeatureCollection {
    pub fn from_json(body: &str) -> FeedResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_slice(body: &[u8]) -> FeedResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Converts every feature to an [`EventRecord`], failing on the first
    /// feature whose geometry is not a 3D point.
    pub fn records(&self) -> FeedResult<Vec<EventRecord>> {
        self.features
            .iter()
            .enumerate()
            .map(|(idx, feature)| {
                EventRecord::try_from(feature)
                    .map_err(|err| FeedError::Parse(format!("feature {}: {}", idx, err)))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_feed() {
        let body = r#"{"features":[{"properties":{"place":"X","mag":3,"time":0},"geometry":{"coordinates":[10,20,5]}}]}"#;
        let collection = FeatureCollection::from_json(body).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].properties.mag, Some(3.0));
        assert_eq!(collection.features[0].geometry.coordinates, vec![10.0, 20.0, 5.0]);
    }

    #[test]
    fn ignores_unknown_fields_and_nulls() {
        let body = r#"{
            "type": "FeatureCollection",
            "metadata": {"count": 1},
            "features": [{
                "type": "Feature",
                "id": "us7000abcd",
                "properties": {"place": null, "mag": null, "time": 1700000000000, "tsunami": 0},
                "geometry": {"type": "Point", "coordinates": [-120.5, 36.1, 8.2]}
            }]
        }"#;
        let collection = FeatureCollection::from_json(body).unwrap();
        let props = &collection.features[0].properties;
        assert!(props.place.is_none());
        assert!(props.mag.is_none());
    }

    #[test]
    fn accepts_float_timestamps() {
        let body = r#"{"features":[{"properties":{"place":"X","mag":3,"time":1.7e12},"geometry":{"coordinates":[10,20,5]}}]}"#;
        let records = FeatureCollection::from_json(body).unwrap().records().unwrap();
        assert_eq!(records[0].time.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = FeatureCollection::from_json(r#"{"features": {"oops": true}}"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));

        let err = FeatureCollection::from_json(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn records_reports_index_of_bad_feature() {
        let body = r#"{"features":[
            {"properties":{"place":"A","mag":1,"time":0},"geometry":{"coordinates":[1,2,3]}},
            {"properties":{"place":"B","mag":1,"time":0},"geometry":{"coordinates":[1,2]}}
        ]}"#;
        let err = FeatureCollection::from_json(body).unwrap().records().unwrap_err();
        match err {
            FeedError::Parse(message) => assert!(message.starts_with("feature 1")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
