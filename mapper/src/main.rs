use anyhow::{bail, Context};
use bridge::MapBridge;
use clap::Parser;
use quakecore::telemetry::MetricsRecorder;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use workflow::{ConfigOverrides, MapConfig, Runner};

mod bridge;
mod fetch;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Renders the earthquake feed as an interactive map")]
struct Args {
    /// Load a map config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// GeoJSON feed URL (defaults to the USGS 2.5+ past-30-days summary)
    #[arg(long)]
    url: Option<String>,
    /// Read the feed from a local GeoJSON file instead of the network
    #[arg(long)]
    feed_file: Option<PathBuf>,
    /// Generate N synthetic events around the map center instead of fetching
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Where to write the rendered page
    #[arg(long)]
    output: Option<PathBuf>,
    /// Serve the rendered map over HTTP instead of writing a file
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            feed_url: self.url.clone(),
            feed_file: self.feed_file.clone(),
            synthetic: self.synthetic,
            seed: self.seed,
            output: self.output.clone(),
            bind: self.bind,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        MapConfig::load(path)?
    } else {
        MapConfig::default()
    };
    config.apply(args.overrides());

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(run(config, args.serve))
}

async fn run(config: MapConfig, serve: bool) -> anyhow::Result<()> {
    let metrics = Arc::new(MetricsRecorder::new());
    let runner = Runner::new(config.clone(), metrics.clone());
    let result = runner.execute().await?;

    if serve {
        let bridge = MapBridge::new(metrics);
        bridge.publish(&result);
        return bridge.serve(config.bind).await;
    }

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(&config.output, &result.rendered.html)
        .with_context(|| format!("writing {}", config.output.display()))?;

    println!(
        "Rendered {} markers -> {}",
        result.marker_count(),
        config.output.display()
    );

    if let Some(err) = result.error {
        bail!("earthquake feed unavailable: {}", err);
    }
    Ok(())
}
