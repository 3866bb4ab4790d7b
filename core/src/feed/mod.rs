pub mod geojson;
pub mod record;

pub use geojson::{Feature, FeatureCollection, Geometry, Properties};
pub use record::EventRecord;
