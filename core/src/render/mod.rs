pub mod html;
pub mod projection;
pub mod view;

pub use html::{legend_html, render_failure_page, render_page};
pub use projection::{screen_pixel, world_pixel};
pub use view::{
    popup_html, CircleMarker, LatLng, MapView, Overlay, TileLayer, ViewSettings,
    DEFAULT_CONTAINER_ID, OVERLAY_NAME,
};

use crate::classify::DepthMagnitudeClassifier;
use crate::feed::FeatureCollection;
use crate::prelude::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};

/// Output of one render pass: the structured view and its HTML page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedMap {
    pub view: MapView,
    pub html: String,
}

/// Classifies every feature with the default classifier and renders the
/// populated page.
pub fn render_collection(
    collection: &FeatureCollection,
    settings: &ViewSettings,
) -> FeedResult<RenderedMap> {
    let records = collection.records()?;
    let view = MapView::build(settings, &records, &DepthMagnitudeClassifier::default())?;
    let html = render_page(&view)?;
    Ok(RenderedMap { view, html })
}

/// Renders the on-page failure notice for a fetch or parse error.
pub fn render_failure(settings: &ViewSettings, error: &FeedError) -> FeedResult<RenderedMap> {
    let view = MapView::empty(settings)?;
    let html = render_failure_page(&view, error)?;
    Ok(RenderedMap { view, html })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_feature_feed_renders_expected_marker() {
        let body = r#"{"features":[{"properties":{"place":"X","mag":3,"time":0},"geometry":{"coordinates":[10,20,5]}}]}"#;
        let collection = FeatureCollection::from_json(body).unwrap();
        let rendered = render_collection(&collection, &ViewSettings::default()).unwrap();

        let markers = rendered.view.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!((markers[0].lat, markers[0].lon), (20.0, 10.0));
        assert_eq!(markers[0].style.radius, 9.0);
        assert!(markers[0].popup.contains("X"));
        assert!(markers[0].popup.contains("Magnitude: 3"));
        assert!(rendered.html.contains("Magnitude: 3"));
    }

    #[test]
    fn shallow_and_deep_features_get_interior_and_clamped_colors() {
        let body = r#"{"features":[
            {"properties":{"place":"shallow","mag":2,"time":0},"geometry":{"coordinates":[0,0,5]}},
            {"properties":{"place":"deep","mag":2,"time":0},"geometry":{"coordinates":[0,0,50]}}
        ]}"#;
        let collection = FeatureCollection::from_json(body).unwrap();
        let rendered = render_collection(&collection, &ViewSettings::default()).unwrap();
        let ramp = crate::classify::ColorRamp::yl_or_rd();

        let markers = rendered.view.markers();
        assert_ne!(markers[0].style.fill_color, ramp.start());
        assert_ne!(markers[0].style.fill_color, ramp.end());
        assert_eq!(markers[1].style.fill_color, ramp.end());
    }

    #[test]
    fn malformed_feature_aborts_render() {
        let body = r#"{"features":[{"properties":{"place":"X","mag":3,"time":0},"geometry":{"coordinates":[10]}}]}"#;
        let collection = FeatureCollection::from_json(body).unwrap();
        let err = render_collection(&collection, &ViewSettings::default()).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn failure_render_keeps_legend() {
        let err = FeedError::Parse("missing features".into());
        let rendered = render_failure(&ViewSettings::default(), &err).unwrap();
        assert!(rendered.view.overlay.is_none());
        assert_eq!(rendered.view.legend.len(), 5);
        assert!(rendered.html.contains("missing features"));
    }
}
