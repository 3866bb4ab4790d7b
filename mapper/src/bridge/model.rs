use quakecore::render::MapView;
use serde::{Deserialize, Serialize};

/// What the bridge currently serves. Written once per run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeModel {
    pub html: Option<String>,
    pub view: Option<MapView>,
    pub error: Option<String>,
    pub message: String,
}

impl BridgeModel {
    pub fn status(&self) -> &'static str {
        match (&self.html, &self.error) {
            (None, _) => "pending",
            (Some(_), Some(_)) => "error",
            (Some(_), None) => "ok",
        }
    }
}
