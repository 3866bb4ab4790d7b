pub mod config;
pub mod runner;

pub use config::{ConfigOverrides, MapConfig};
pub use runner::{Runner, WorkflowResult};
