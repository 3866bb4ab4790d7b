//! Perceptual color ramps evaluated on `t ∈ [0, 1]`.
//!
//! Ramps are sequential ColorBrewer schemes interpolated with a uniform
//! cubic B-spline per channel, so the curve passes through the first and
//! last stops exactly and stays smooth in between.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Sum of channels, a cheap lightness proxy for ordering ramp output.
    pub fn channel_sum(self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Yellow -> Orange -> Red, 9 classes.
const YL_OR_RD: &[Rgb] = &[
    Rgb::new(0xff, 0xff, 0xcc),
    Rgb::new(0xff, 0xed, 0xa0),
    Rgb::new(0xfe, 0xd9, 0x76),
    Rgb::new(0xfe, 0xb2, 0x4c),
    Rgb::new(0xfd, 0x8d, 0x3c),
    Rgb::new(0xfc, 0x4e, 0x2a),
    Rgb::new(0xe3, 0x1a, 0x1c),
    Rgb::new(0xbd, 0x00, 0x26),
    Rgb::new(0x80, 0x00, 0x26),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRamp {
    stops: &'static [Rgb],
}

impl ColorRamp {
    pub const fn yl_or_rd() -> Self {
        Self { stops: YL_OR_RD }
    }

    pub fn start(&self) -> Rgb {
        self.stops[0]
    }

    pub fn end(&self) -> Rgb {
        self.stops[self.stops.len() - 1]
    }

    /// Evaluates the ramp. `t` outside `[0, 1]` (and NaN) is clamped.
    pub fn evaluate(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Rgb::new(
            channel(self.stops, t, |c| c.r),
            channel(self.stops, t, |c| c.g),
            channel(self.stops, t, |c| c.b),
        )
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::yl_or_rd()
    }
}

fn channel(stops: &[Rgb], t: f64, pick: impl Fn(&Rgb) -> u8) -> u8 {
    let values: Vec<f64> = stops.iter().map(|c| pick(c) as f64).collect();
    basis_spline(&values, t).round().clamp(0.0, 255.0) as u8
}

/// Uniform cubic B-spline through `values`, with the end segments padded by
/// reflection so that `t = 0` and `t = 1` land on the first and last value.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let i = if t >= 1.0 {
        n - 1
    } else {
        (t * n as f64).floor() as usize
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    let local = (t - i as f64 / n as f64) * n as f64;
    basis(local, v0, v1, v2, v3)
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        let ramp = ColorRamp::yl_or_rd();
        assert_eq!(ramp.evaluate(0.0), Rgb::new(0xff, 0xff, 0xcc));
        assert_eq!(ramp.evaluate(1.0), Rgb::new(0x80, 0x00, 0x26));
    }

    #[test]
    fn out_of_range_is_clamped() {
        let ramp = ColorRamp::yl_or_rd();
        assert_eq!(ramp.evaluate(-0.5), ramp.start());
        assert_eq!(ramp.evaluate(7.0), ramp.end());
        assert_eq!(ramp.evaluate(f64::NAN), ramp.start());
    }

    #[test]
    fn ramp_darkens_monotonically() {
        let ramp = ColorRamp::yl_or_rd();
        let mut previous = ramp.evaluate(0.0);
        for step in 1..=200 {
            let current = ramp.evaluate(step as f64 / 200.0);
            assert!(current.r <= previous.r);
            assert!(current.g <= previous.g);
            previous = current;
        }

        for pair in YL_OR_RD.windows(2) {
            assert!(pair[1].channel_sum() < pair[0].channel_sum());
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb::new(0x80, 0x00, 0x26).to_hex(), "#800026");
        assert_eq!(Rgb::BLACK.to_string(), "#000000");
    }
}
