//! Colours and colormaps for the paper figures.

use plotters::style::RGBColor;
use plotters::style::colors::colormaps::{ColorMap, DerivedColorMap};

/// Group A points (`baseline < candidate`), light salmon.
pub const GROUP_A: RGBColor = RGBColor(0xFF, 0xA0, 0x7A);
/// Group B points, light sea green.
pub const GROUP_B: RGBColor = RGBColor(0x20, 0xB2, 0xAA);
pub const GROUP_A_CONNECTOR: RGBColor = RGBColor(0xFF, 0xC8, 0xB0);
pub const GROUP_B_CONNECTOR: RGBColor = RGBColor(0x40, 0xC0, 0xB0);
/// Mean reference lines, cornsilk darkened enough to show on white.
pub const MEAN_LINE: RGBColor = RGBColor(0xC8, 0xB8, 0x8A);

/// Hash-family line colours for the scaling chart.
pub const FAMILY_COLORS: [RGBColor; 5] = [
    RGBColor(0x00, 0x00, 0x8B), // dark blue
    RGBColor(0x80, 0x00, 0x80), // purple
    RGBColor(0x00, 0x64, 0x00), // dark green
    RGBColor(0x8B, 0x00, 0x00), // dark red
    RGBColor(0x00, 0x8B, 0x8B), // dark cyan
];

/// Colormap through evenly spaced colour stops on [0,1].
pub struct LinearColormap {
    map: DerivedColorMap<RGBColor>,
    first: RGBColor,
}

impl LinearColormap {
    /// `colors` must not be empty.
    pub fn new(colors: &[RGBColor]) -> Self {
        Self {
            map: DerivedColorMap::new(colors),
            first: colors.first().copied().unwrap_or(RGBColor(0, 0, 0)),
        }
    }

    /// Orange → red → purple → black, used for runtime heatmaps.
    pub fn warm() -> Self {
        Self::new(&[
            RGBColor(0xFF, 0xA5, 0x00),
            RGBColor(0xFF, 0x00, 0x00),
            RGBColor(0x80, 0x00, 0x80),
            RGBColor(0x00, 0x00, 0x00),
        ])
    }

    /// ColorBrewer YlGn, light yellow to dark green.
    pub fn yellow_green() -> Self {
        Self::new(&[
            RGBColor(0xFF, 0xFF, 0xE5),
            RGBColor(0xF7, 0xFC, 0xB9),
            RGBColor(0xD9, 0xF0, 0xA3),
            RGBColor(0xAD, 0xDD, 0x8E),
            RGBColor(0x78, 0xC6, 0x79),
            RGBColor(0x41, 0xAB, 0x5D),
            RGBColor(0x23, 0x84, 0x43),
            RGBColor(0x00, 0x68, 0x37),
            RGBColor(0x00, 0x45, 0x29),
        ])
    }

    /// Colour at position `t`, clamped to [0,1]; `NaN` maps to the first stop.
    pub fn sample(&self, t: f64) -> RGBColor {
        if t.is_nan() {
            return self.first;
        }
        ColorMap::<RGBColor, f64>::get_color(&self.map, t.clamp(0.0, 1.0))
    }

    /// `n` colours taken at bucket centres, one per discrete band.
    pub fn discrete(&self, n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| self.sample((i as f64 + 0.5) / n as f64))
            .collect()
    }
}
