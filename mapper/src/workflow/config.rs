use crate::fetch::client::{FeedSource, DEFAULT_FEED_URL};
use anyhow::Context;
use quakecore::render::ViewSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub feed_url: String,
    pub feed_file: Option<PathBuf>,
    pub synthetic: Option<usize>,
    pub seed: u64,
    pub output: PathBuf,
    pub bind: SocketAddr,
    pub view: ViewSettings,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_file: None,
            synthetic: None,
            seed: 0,
            output: PathBuf::from("map.html"),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            view: ViewSettings::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub feed_url: Option<String>,
    pub feed_file: Option<PathBuf>,
    pub synthetic: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
}

impl MapConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading map config {}", path_ref.display()))?;
        let config: MapConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing map config {}", path_ref.display()))?;
        config
            .view
            .validate()
            .with_context(|| format!("validating map config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.feed_url {
            self.feed_url = url;
        }
        if let Some(path) = overrides.feed_file {
            self.feed_file = Some(path);
        }
        if let Some(count) = overrides.synthetic {
            self.synthetic = Some(count);
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
    }

    /// Synthetic generation wins over a local file, which wins over the URL.
    pub fn source(&self) -> FeedSource {
        if let Some(count) = self.synthetic {
            FeedSource::Synthetic {
                count,
                seed: self.seed,
            }
        } else if let Some(path) = &self.feed_file {
            FeedSource::File(path.clone())
        } else {
            FeedSource::Url(self.feed_url.clone())
        }
    }
}
