use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Single-series bar colour for the distribution histogram.
pub const DISTRIBUTION_COLOR: Color32 = Color32::from_rgb(0x4c, 0x72, 0xb0);

// ---------------------------------------------------------------------------
// Color mapping: species label → Color32
// ---------------------------------------------------------------------------

/// Maps species labels to distinct colours. Fixed for the whole session so
/// a species keeps its colour across charts and filter changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours in the given label order, skipping duplicates.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut order: Vec<String> = Vec::new();
        for label in labels {
            if !order.iter().any(|l| l == label) {
                order.push(label.to_string());
            }
        }
        let palette = generate_palette(order.len());
        let mapping = order.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given species.
    pub fn color_for(&self, species: &str) -> Color32 {
        self.mapping
            .get(species)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_species_fall_back_to_gray() {
        let map = ColorMap::new(["Adelie", "Gentoo", "Adelie"]);
        assert_ne!(map.color_for("Adelie"), Color32::GRAY);
        assert_ne!(map.color_for("Adelie"), map.color_for("Gentoo"));
        assert_eq!(map.color_for("Emperor"), Color32::GRAY);
    }
}
