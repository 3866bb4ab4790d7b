pub mod marker;
pub mod ramp;
pub mod scale;

pub use marker::{depth_color, radius, DepthMagnitudeClassifier, MarkerStyle};
pub use ramp::{ColorRamp, Rgb};
pub use scale::LinearScale;
