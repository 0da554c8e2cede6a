//! Color mapping for the choropleth: intensity to fill color.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Rgb {
    /// Manhattan distance across channels; used to check that two fills are
    /// visually distinguishable.
    pub fn channel_distance(self, other: Rgb) -> u32 {
        self.r.abs_diff(other.r) as u32
            + self.g.abs_diff(other.g) as u32
            + self.b.abs_diff(other.b) as u32
    }
}

/// Low end of the gradient: near-white blue.
const START: Rgb = Rgb { r: 240, g: 248, b: 255 };

/// High end of the gradient: the deep brand blue (#0b2d60).
const END: Rgb = Rgb { r: 11, g: 45, b: 96 };

/// Fill for shapes with no resolved sample at all. Distinct from the
/// intensity-0 color so "no data" and "zero sales" read differently.
pub(crate) const NO_DATA: Rgb = Rgb { r: 230, g: 243, b: 255 };

/// Exponent of the perceptual easing curve applied before interpolation.
const EASING: f64 = 0.9;

/// Minimum eased value for any region with a non-zero intensity, so small
/// regions stay distinguishable from "no data".
const VISIBILITY_FLOOR: f64 = 0.15;

/// Map an intensity in `[0, 1]` to a fill color along the blue gradient.
///
/// The easing power is applied first; intensities strictly above zero are
/// then floored at [`VISIBILITY_FLOOR`]. Zero stays exactly at the gradient
/// start.
pub fn intensity_color(intensity: f64) -> Rgb {
    // Handle NaN / infinities: fall back to the gradient start.
    if !intensity.is_finite() {
        return START;
    }

    let eased = intensity.clamp(0.0, 1.0).powf(EASING);
    let t = if intensity > 0.0 { eased.max(VISIBILITY_FLOOR) } else { 0.0 };
    let t = t.clamp(0.0, 1.0);

    Rgb {
        r: lerp(START.r, END.r, t),
        g: lerp(START.g, END.g, t),
        b: lerp(START.b, END.b, t),
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8
}
