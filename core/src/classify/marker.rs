use crate::classify::ramp::{ColorRamp, Rgb};
use crate::classify::scale::LinearScale;
use crate::prelude::Classifier;
use serde::{Deserialize, Serialize};

/// Depth, in km, mapped to the shallow end of the ramp.
pub const DEPTH_MIN_KM: f64 = 0.0;
/// Depth, in km, mapped to the deep end of the ramp.
pub const DEPTH_MAX_KM: f64 = 42.0;

/// Radius grows with the square of magnitude; negative magnitudes are not
/// filtered and produce a positive radius.
pub fn radius(magnitude: f64) -> f64 {
    magnitude * magnitude
}

pub fn depth_color(depth_km: f64) -> Rgb {
    DepthMagnitudeClassifier::default().fill_color(depth_km)
}

/// Default classifier: squared magnitude for size, YlOrRd over `[0, 42]` km
/// for color.
#[derive(Debug, Clone, Copy)]
pub struct DepthMagnitudeClassifier {
    depth_scale: LinearScale,
    ramp: ColorRamp,
}

impl DepthMagnitudeClassifier {
    pub fn new(depth_scale: LinearScale, ramp: ColorRamp) -> Self {
        Self { depth_scale, ramp }
    }
}

impl Default for DepthMagnitudeClassifier {
    fn default() -> Self {
        Self::new(
            LinearScale::new(DEPTH_MIN_KM, DEPTH_MAX_KM),
            ColorRamp::yl_or_rd(),
        )
    }
}

impl Classifier for DepthMagnitudeClassifier {
    fn radius(&self, magnitude: f64) -> f64 {
        radius(magnitude)
    }

    fn fill_color(&self, depth_km: f64) -> Rgb {
        self.ramp.evaluate(self.depth_scale.scale_clamped(depth_km))
    }
}

/// Path options for a circle marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: Rgb,
    pub color: Rgb,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    /// Fixed black 1px border, opaque stroke, 0.7 fill.
    pub fn filled(radius: f64, fill_color: Rgb) -> Self {
        Self {
            radius,
            fill_color,
            color: Rgb::BLACK,
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::EventRecord;
    use chrono::{TimeZone, Utc};

    #[test]
    fn radius_is_magnitude_squared() {
        assert_eq!(radius(3.0), 9.0);
        assert_eq!(radius(0.0), 0.0);
        assert_eq!(radius(-2.0), 4.0);
        assert_eq!(radius(2.5), 6.25);
    }

    #[test]
    fn depth_extremes_hit_ramp_ends() {
        let ramp = ColorRamp::yl_or_rd();
        assert_eq!(depth_color(0.0), ramp.start());
        assert_eq!(depth_color(42.0), ramp.end());
    }

    #[test]
    fn depth_beyond_domain_is_clamped() {
        let ramp = ColorRamp::yl_or_rd();
        assert_eq!(depth_color(50.0), ramp.end());
        assert_eq!(depth_color(650.0), ramp.end());
        assert_eq!(depth_color(-1.5), ramp.start());
    }

    #[test]
    fn shallow_depth_is_interior() {
        let ramp = ColorRamp::yl_or_rd();
        let color = depth_color(5.0);
        assert_ne!(color, ramp.start());
        assert_ne!(color, ramp.end());
    }

    #[test]
    fn color_is_monotonic_in_depth() {
        // Blue climbs slightly near the deep end, so only red and green are
        // ordered once channels are rounded to 8 bits.
        let mut previous = depth_color(0.0);
        for step in 1..=4200 {
            let depth = step as f64 / 100.0;
            let current = depth_color(depth);
            assert!(current.r <= previous.r, "red rose at {depth} km");
            assert!(current.g <= previous.g, "green rose at {depth} km");
            previous = current;
        }
        assert!(depth_color(42.0).channel_sum() < depth_color(0.0).channel_sum());
    }

    #[test]
    fn style_uses_fixed_border() {
        let record = EventRecord::new(
            "X",
            3.0,
            Utc.timestamp_millis_opt(0).unwrap(),
            10.0,
            20.0,
            5.0,
        );
        let style = DepthMagnitudeClassifier::default().style(&record);
        assert_eq!(style.radius, 9.0);
        assert_eq!(style.color, Rgb::BLACK);
        assert_eq!(style.weight, 1.0);
        assert_eq!(style.fill_opacity, 0.7);
        assert_eq!(style.fill_color, depth_color(5.0));
    }
}
