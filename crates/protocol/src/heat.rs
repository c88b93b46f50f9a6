use serde::{Deserialize, Serialize};

/// Fill color for a flame-graph bar, on the classic yellow-to-red ramp.
///
/// Wider bars (hotter frames) shift toward red; the ramp is a pure function
/// of the bar's width percentage so renderers on either side of the protocol
/// boundary agree on colors without a shared theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HeatColor {
    /// Heat color for a bar of the given width percentage in [0, 100].
    pub fn for_width(width_percent: f64) -> Self {
        let cold = 1.0 - width_percent * 0.01;
        Self {
            r: (245.0 + 10.0 * cold).floor() as u8,
            g: (110.0 + 105.0 * cold).floor() as u8,
            b: 100,
        }
    }

    /// Darkened variant used for the bar border.
    pub fn border(&self) -> Self {
        Self {
            r: self.r.saturating_sub(50),
            g: self.g.saturating_sub(50),
            b: self.b.saturating_sub(50),
        }
    }
}
