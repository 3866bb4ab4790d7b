use crate::fetch::{FeedClient, FeedSource};
use crate::generator::{build_synthetic_feed, SyntheticConfig};
use crate::workflow::config::MapConfig;
use anyhow::Context;
use quakecore::feed::FeatureCollection;
use quakecore::prelude::{FeedError, FeedResult};
use quakecore::render::{render_collection, render_failure, RenderedMap};
use quakecore::telemetry::{LogManager, MetricsRecorder};
use std::sync::Arc;

pub struct WorkflowResult {
    pub rendered: RenderedMap,
    /// Set when the feed could not be loaded; `rendered` is then the
    /// failure page.
    pub error: Option<FeedError>,
}

impl WorkflowResult {
    pub fn marker_count(&self) -> usize {
        self.rendered.view.markers().len()
    }
}

/// One fetch → classify → render pass.
#[derive(Clone)]
pub struct Runner {
    config: MapConfig,
    client: FeedClient,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: MapConfig, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            config,
            client: FeedClient::new(),
            metrics,
        }
    }

    pub async fn load(&self) -> FeedResult<FeatureCollection> {
        match self.config.source() {
            FeedSource::Url(url) => self.client.fetch(&url).await,
            FeedSource::File(path) => self.client.read_file(&path).await,
            FeedSource::Synthetic { count, seed } => Ok(build_synthetic_feed(&SyntheticConfig {
                count,
                seed,
                center: self.config.view.center,
                ..Default::default()
            })),
        }
    }

    /// Never fails on a bad feed: the error is logged and rendered as the
    /// failure page. Only an unrenderable view is an error.
    pub async fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new("workflow");
        let source = self.config.source();
        logger.record(&format!("loading {}", source.describe()));

        let outcome = self
            .load()
            .await
            .and_then(|collection| render_collection(&collection, &self.config.view));

        match outcome {
            Ok(rendered) => {
                let result = WorkflowResult {
                    rendered,
                    error: None,
                };
                self.metrics.record_fetch(result.marker_count());
                logger.record(&format!("rendered {} markers", result.marker_count()));
                Ok(result)
            }
            Err(err) => {
                logger.warn(&format!("loading {} failed: {}", source.describe(), err));
                self.metrics.record_failure();
                let rendered = render_failure(&self.config.view, &err)
                    .context("rendering failure page")?;
                Ok(WorkflowResult {
                    rendered,
                    error: Some(err),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn runner_for(config: MapConfig) -> (Runner, Arc<MetricsRecorder>) {
        let metrics = Arc::new(MetricsRecorder::new());
        (Runner::new(config, metrics.clone()), metrics)
    }

    #[tokio::test]
    async fn runner_renders_synthetic_feed() {
        let config = MapConfig {
            synthetic: Some(8),
            seed: 3,
            ..Default::default()
        };
        let (runner, metrics) = runner_for(config);
        let result = runner.execute().await.unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.marker_count(), 8);
        assert_eq!(metrics.snapshot().markers, 8);
    }

    #[tokio::test]
    async fn runner_renders_file_feed() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"{"features":[{"properties":{"place":"X","mag":3,"time":0},"geometry":{"coordinates":[10,20,5]}}]}"#,
        )
        .unwrap();
        let config = MapConfig {
            feed_file: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let (runner, _) = runner_for(config);
        let result = runner.execute().await.unwrap();
        let marker = &result.rendered.view.markers()[0];
        assert_eq!((marker.lat, marker.lon), (20.0, 10.0));
        assert_eq!(marker.style.radius, 9.0);
        assert!(result.rendered.html.contains("Magnitude: 3"));
    }

    #[tokio::test]
    async fn unreadable_feed_renders_failure_page() {
        let config = MapConfig {
            feed_file: Some("/definitely/not/here.geojson".into()),
            ..Default::default()
        };
        let (runner, metrics) = runner_for(config);
        let result = runner.execute().await.unwrap();
        assert!(matches!(result.error, Some(FeedError::Network(_))));
        assert_eq!(result.marker_count(), 0);
        assert!(result.rendered.html.contains("Unable to load earthquake data"));
        assert_eq!(metrics.snapshot().failures, 1);
    }
}
