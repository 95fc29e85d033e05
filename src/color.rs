use std::collections::BTreeMap;

use aging_atlas::data::model::Measure;
use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Fill for map groups without a value; kept out of the colour scale.
pub const MISSING_COLOR: Color32 = Color32::GRAY;

fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical colours: one per compared location
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl((i as f32 / n as f32) * 360.0, 0.7, 0.5))
        .collect()
}

#[derive(Debug, Clone)]
pub struct LocationColors {
    mapping: BTreeMap<String, Color32>,
}

impl LocationColors {
    pub fn new(locations: &[String]) -> Self {
        let mapping = locations
            .iter()
            .cloned()
            .zip(generate_palette(locations.len()))
            .collect();
        LocationColors { mapping }
    }

    pub fn color_for(&self, location: &str) -> Color32 {
        self.mapping.get(location).copied().unwrap_or(Color32::LIGHT_BLUE)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale: light to dark red
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedScale {
    min: f64,
    max: f64,
}

impl RedScale {
    /// `None` when there is no value to scale.
    pub fn new(range: Option<(f64, f64)>) -> Option<Self> {
        range.map(|(min, max)| RedScale { min, max })
    }

    pub fn color_for(&self, value: Measure) -> Color32 {
        let Some(v) = value.value() else {
            return MISSING_COLOR;
        };
        let span = self.max - self.min;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            ((v - self.min) / span).clamp(0.0, 1.0)
        };
        hsl(0.0, 0.85, 0.92 - 0.62 * t as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brightness(c: Color32) -> u32 {
        c.r() as u32 + c.g() as u32 + c.b() as u32
    }

    #[test]
    fn higher_values_are_darker() {
        let scale = RedScale::new(Some((10.0, 40.0))).unwrap();
        let low = scale.color_for(Measure::Value(10.0));
        let high = scale.color_for(Measure::Value(40.0));
        assert!(brightness(high) < brightness(low));
    }

    #[test]
    fn missing_values_are_neutral() {
        let scale = RedScale::new(Some((0.0, 1.0))).unwrap();
        assert_eq!(scale.color_for(Measure::Missing), MISSING_COLOR);
        assert!(RedScale::new(None).is_none());
    }

    #[test]
    fn palette_has_one_colour_per_location() {
        let names = vec!["Alaska".to_string(), "Ohio".to_string()];
        let colors = LocationColors::new(&names);
        assert_ne!(colors.color_for("Alaska"), colors.color_for("Ohio"));
        assert!(generate_palette(0).is_empty());
    }
}
