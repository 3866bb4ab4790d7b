use serde::{Deserialize, Serialize};

/// Linear map from a numeric domain onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain_min: f64,
    pub domain_max: f64,
}

impl LinearScale {
    pub const fn new(domain_min: f64, domain_max: f64) -> Self {
        Self {
            domain_min,
            domain_max,
        }
    }

    /// Unclamped position of `value` within the domain. A degenerate domain
    /// maps everything to `0`.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.domain_min) / span
    }

    pub fn scale_clamped(&self, value: f64) -> f64 {
        let scaled = self.scale(value);
        if scaled.is_nan() {
            0.0
        } else {
            scaled.clamp(0.0, 1.0)
        }
    }
}
