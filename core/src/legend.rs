use crate::classify::{depth_color, Rgb};
use serde::{Deserialize, Serialize};

/// Lower bounds of the depth bands shown in the legend, in km.
pub const DEPTH_BANDS: [u32; 5] = [0, 10, 20, 30, 40];

/// One swatch row of the depth legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendBand {
    pub from: u32,
    pub to: Option<u32>,
    pub color: Rgb,
}

impl LegendBand {
    /// `0–10` for bounded bands, `40+` for the open-ended last one.
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!("{}\u{2013}{}", self.from, to),
            None => format!("{}+", self.from),
        }
    }
}

/// Builds the static depth legend. Each swatch is sampled just inside its
/// band, at `from + 1` km.
pub fn depth_legend() -> Vec<LegendBand> {
    DEPTH_BANDS
        .iter()
        .enumerate()
        .map(|(idx, &from)| LegendBand {
            from,
            to: DEPTH_BANDS.get(idx + 1).copied(),
            color: depth_color(from as f64 + 1.0),
        })
        .collect()
}
