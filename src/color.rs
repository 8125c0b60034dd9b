use std::collections::BTreeMap;

use apoe_onset::analysis::CohortLabel;
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
            let hue = 20.0 + (i as f32 / n as f32) * 360.0;
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

// ---------------------------------------------------------------------------
// Color mapping: cohort → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per cohort, shared by the charts and the table.
#[derive(Debug, Clone)]
pub struct CohortColors {
    mapping: BTreeMap<CohortLabel, Color32>,
}

impl Default for CohortColors {
    fn default() -> Self {
        let mapping = CohortLabel::ALL
            .into_iter()
            .zip(generate_palette(CohortLabel::ALL.len()))
            .collect();
        CohortColors { mapping }
    }
}

impl CohortColors {
    pub fn color_for(&self, cohort: CohortLabel) -> Color32 {
        self.mapping.get(&cohort).copied().unwrap_or(Color32::GRAY)
    }
}
