use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::AirfoilId;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: airfoil → RGBColor
// ---------------------------------------------------------------------------

/// Maps each airfoil of a comparison plot to a distinct colour, so the same
/// airfoil keeps its colour across the lift and drag plots.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<AirfoilId, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    pub fn new<'a>(airfoils: impl IntoIterator<Item = &'a AirfoilId>) -> Self {
        let airfoils: Vec<&AirfoilId> = airfoils.into_iter().collect();
        let palette = generate_palette(airfoils.len());
        let mapping = airfoils
            .into_iter()
            .zip(palette)
            .map(|(a, c)| (a.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: GRAY,
        }
    }

    pub fn color_for(&self, airfoil: &AirfoilId) -> RGBColor {
        self.mapping
            .get(airfoil)
            .copied()
            .unwrap_or(self.default_color)
    }
}
