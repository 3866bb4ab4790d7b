use log::debug;
use quakecore::feed::FeatureCollection;
use quakecore::prelude::{FeedError, FeedResult};
use std::path::{Path, PathBuf};

/// Magnitude 2.5+ events from the past 30 days.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/2.5_month.geojson";

/// Where a run reads its feed from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
    Synthetic { count: usize, seed: u64 },
}

impl FeedSource {
    pub fn describe(&self) -> String {
        match self {
            FeedSource::Url(url) => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
            FeedSource::Synthetic { count, seed } => {
                format!("synthetic feed ({} events, seed {})", count, seed)
            }
        }
    }
}

/// Single-shot GeoJSON reader. No retries; every failure is returned as a
/// typed [`FeedError`].
#[derive(Debug, Clone, Default)]
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> FeedResult<FeatureCollection> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FeedError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Network(format!("{} returned {}", url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FeedError::Network(err.to_string()))?;
        FeatureCollection::from_slice(&body)
    }

    pub async fn read_file(&self, path: &Path) -> FeedResult<FeatureCollection> {
        let body = tokio::fs::read(path)
            .await
            .map_err(|err| FeedError::Network(format!("reading {}: {}", path.display(), err)))?;
        FeatureCollection::from_slice(&body)
    }
}
