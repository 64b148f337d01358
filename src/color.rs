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
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: substance → Color32
// ---------------------------------------------------------------------------

/// Maps matched substances to distinct colours for plot annotations.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours in first-seen order; repeated names share a colour.
    pub fn new<'a>(substances: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ordered: Vec<&str> = Vec::new();
        for name in substances {
            if !ordered.contains(&name) {
                ordered.push(name);
            }
        }
        let palette = generate_palette(ordered.len());
        let mapping = ordered
            .into_iter()
            .zip(palette)
            .map(|(name, c)| (name.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, substance: &str) -> Color32 {
        self.mapping
            .get(substance)
            .copied()
            .unwrap_or(self.default_color)
    }
}
