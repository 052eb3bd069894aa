use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

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
            hsl_to_color32(hsl)
        })
        .collect()
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Country colors: country name → Color32
// ---------------------------------------------------------------------------

/// Maps country names to distinct colours so a country keeps its colour
/// across the line, scatter, and bar charts of one frame.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CountryColors {
    /// Build a colour map from an ordered list of country names.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let palette = generate_palette(names.len());
        let mapping: BTreeMap<String, Color32> = names
            .into_iter()
            .zip(palette)
            .map(|(name, color)| (name.to_string(), color))
            .collect();

        CountryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a country.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Value ramp: scalar → Color32 on a continuous scale
// ---------------------------------------------------------------------------

/// Continuous colour scale for the capacity map tiles: purple at the low end
/// through magenta to amber at the high end.
#[derive(Debug, Clone, Copy)]
pub struct ValueRamp {
    min: f64,
    max: f64,
}

impl ValueRamp {
    pub fn new(min: f64, max: f64) -> Self {
        ValueRamp { min, max }
    }

    /// Build a ramp spanning the given values; degenerate inputs collapse to
    /// a single mid-scale colour.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            ValueRamp::new(0.0, 0.0)
        } else {
            ValueRamp::new(min, max)
        }
    }

    /// Map a value to its ramp colour.
    pub fn color_for(&self, value: f64) -> Color32 {
        let t = if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        // Hue 285 → 45 takes the short path through magenta and red.
        let low = Hsl::new(285.0, 0.70, 0.25);
        let high = Hsl::new(45.0, 0.95, 0.55);
        hsl_to_color32(low.mix(high, t as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn country_colors_are_stable_and_fall_back_to_gray() {
        let colors = CountryColors::new(["Alpha", "Beta"]);
        assert_eq!(colors.color_for("Alpha"), colors.color_for("Alpha"));
        assert_ne!(colors.color_for("Alpha"), colors.color_for("Beta"));
        assert_eq!(colors.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn ramp_endpoints_differ_and_degenerate_range_is_safe() {
        let ramp = ValueRamp::new(0.0, 100.0);
        assert_ne!(ramp.color_for(0.0), ramp.color_for(100.0));
        // Out-of-range values clamp to the endpoints.
        assert_eq!(ramp.color_for(-5.0), ramp.color_for(0.0));
        assert_eq!(ramp.color_for(500.0), ramp.color_for(100.0));

        let flat = ValueRamp::from_values([3.0]);
        assert_eq!(flat.color_for(3.0), flat.color_for(99.0));
    }
}
