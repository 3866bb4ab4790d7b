use crate::classify::{MarkerStyle, Rgb};
use crate::feed::EventRecord;

/// Common error type for fetching, parsing and rendering the feed.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("unexpected feed shape: {0}")]
    Parse(String),
    #[error("render failure: {0}")]
    Render(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

/// Maps the two numeric attributes of an event onto marker display parameters.
pub trait Classifier {
    fn radius(&self, magnitude: f64) -> f64;
    fn fill_color(&self, depth_km: f64) -> Rgb;

    fn style(&self, record: &EventRecord) -> MarkerStyle {
        MarkerStyle::filled(
            self.radius(record.magnitude),
            self.fill_color(record.depth_km),
        )
    }
}
