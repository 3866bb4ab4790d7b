use crate::bridge::BridgeModel;
use crate::workflow::WorkflowResult;
use anyhow::Context;
use log::info;
use quakecore::telemetry::{Metrics, MetricsRecorder};
use serde::Serialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock, RwLockReadGuard},
};
use tokio::signal;
use warp::{http::StatusCode, reply::Response, Filter, Reply};

const PENDING_PAGE: &str = "<!DOCTYPE html><html><body><p>Map is still loading.</p></body></html>";

type SharedModel = Arc<RwLock<BridgeModel>>;

/// Body of `/status`: bridge state plus the fetch counters.
#[derive(Debug, Serialize)]
struct StatusReport {
    status: &'static str,
    #[serde(flatten)]
    metrics: Metrics,
    message: String,
}

fn read_model(state: &SharedModel) -> RwLockReadGuard<'_, BridgeModel> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Local HTTP endpoint serving the rendered map page and its JSON payload.
pub struct MapBridge {
    state: SharedModel,
    metrics: Arc<MetricsRecorder>,
}

impl MapBridge {
    pub fn new(metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeModel::default())),
            metrics,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone + Send + Sync + 'static
    {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let metrics = self.metrics.clone();
        let metrics_filter = warp::any().map(move || metrics.clone());

        let page_route = warp::path::end()
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let model = read_model(&state);
                match &model.html {
                    Some(html) => warp::reply::html(html.clone()).into_response(),
                    None => warp::reply::with_status(
                        warp::reply::html(PENDING_PAGE),
                        StatusCode::SERVICE_UNAVAILABLE,
                    )
                    .into_response(),
                }
            });

        let map_route = warp::path("map")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let model = read_model(&state);
                match (&model.view, &model.error) {
                    (Some(view), None) => warp::reply::json(view).into_response(),
                    (_, error) => warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "error",
                            "message": error.clone().unwrap_or_else(|| model.message.clone()),
                        })),
                        StatusCode::NOT_FOUND,
                    )
                    .into_response(),
                }
            });

        let status_route = warp::path("status")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter)
            .and(metrics_filter)
            .map(|state: SharedModel, metrics: Arc<MetricsRecorder>| {
                let model = read_model(&state);
                warp::reply::json(&StatusReport {
                    status: model.status(),
                    metrics: metrics.snapshot(),
                    message: model.error.clone().unwrap_or_else(|| model.message.clone()),
                })
                .into_response()
            });

        page_route.or(map_route).unify().or(status_route).unify()
    }

    pub fn publish(&self, result: &WorkflowResult) {
        let mut guard = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = BridgeModel {
            html: Some(result.rendered.html.clone()),
            view: Some(result.rendered.view.clone()),
            error: result.error.as_ref().map(|err| err.to_string()),
            message: format!("{} markers rendered", result.marker_count()),
        };
        println!(
            "[bridge] markers: {}, status: {}",
            result.marker_count(),
            guard.status()
        );
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    /// Serves until Ctrl+C.
    pub async fn serve(&self, bind: SocketAddr) -> anyhow::Result<()> {
        let (addr, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(bind, async {
                signal::ctrl_c().await.ok();
            })
            .with_context(|| format!("binding map bridge on {}", bind))?;
        info!("map bridge listening on http://{}", addr);
        self.publish_status(&format!("serving http://{} (Ctrl+C to stop)...", addr));
        server.await;
        Ok(())
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> BridgeModel {
        read_model(&self.state).clone()
    }
}
