pub mod synthetic;

pub use synthetic::{build_synthetic_feed, SyntheticConfig};
