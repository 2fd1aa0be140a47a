use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Base series colours: cyan, blue, violet, pink, amber, emerald, indigo, orange.
pub const SERIES_COLORS: [Color32; 8] = [
    Color32::from_rgb(0x22, 0xd3, 0xee),
    Color32::from_rgb(0x3b, 0x82, 0xf6),
    Color32::from_rgb(0x8b, 0x5c, 0xf6),
    Color32::from_rgb(0xec, 0x48, 0x99),
    Color32::from_rgb(0xf5, 0x9e, 0x0b),
    Color32::from_rgb(0x10, 0xb9, 0x81),
    Color32::from_rgb(0x63, 0x66, 0xf1),
    Color32::from_rgb(0xf9, 0x73, 0x16),
];

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

/// `n` series colours: the fixed palette first, generated hues after it.
pub fn series_palette(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = SERIES_COLORS.iter().copied().take(n).collect();
    if n > SERIES_COLORS.len() {
        colors.extend(generate_palette(n - SERIES_COLORS.len()));
    }
    colors
}

// ---------------------------------------------------------------------------
// Unit colours
// ---------------------------------------------------------------------------

/// Stable colour per unit, shared by the charts and the table.
#[derive(Debug, Clone, Default)]
pub struct UnitColors {
    mapping: BTreeMap<String, Color32>,
}

impl UnitColors {
    /// Assign colours in the given (first-seen) unit order.
    pub fn new(units: &[String]) -> Self {
        let mapping = units
            .iter()
            .cloned()
            .zip(series_palette(units.len()))
            .collect();
        UnitColors { mapping }
    }

    pub fn color_for(&self, unit: &str) -> Color32 {
        self.mapping.get(unit).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_extends_past_fixed_colors() {
        assert_eq!(series_palette(3), SERIES_COLORS[..3].to_vec());
        let long = series_palette(11);
        assert_eq!(long.len(), 11);
        assert_eq!(long[..8], SERIES_COLORS);
    }

    #[test]
    fn unknown_unit_is_gray() {
        let colors = UnitColors::new(&["DT-01".to_string(), "DT-02".to_string()]);
        assert_eq!(colors.color_for("DT-01"), SERIES_COLORS[0]);
        assert_eq!(colors.color_for("DT-02"), SERIES_COLORS[1]);
        assert_eq!(colors.color_for("EX-9"), Color32::GRAY);
    }
}
