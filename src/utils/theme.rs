use eframe::egui::{self, Color32, Rounding, Stroke};

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Named colours of the upload page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Page background and text on accent buttons.
    pub first: Color32,
    /// Drop zone icon tint.
    pub second: Color32,
    /// Accent: buttons, progress fill, drop zone text.
    pub third: Color32,
    /// Headings, body text, progress track.
    pub fourth: Color32,
    /// Error indicator.
    pub sixth: Color32,
    pub success: Color32,
    pub drop_zone: Color32,
    pub drop_zone_border: Color32,
}

impl Palette {
    const HEX: [&'static str; 7] = [
        "#F9F9FD", "#A1A7CE", "#534ED8", "#453F56", "#E0B9BB", "#F73D31", "#C48473",
    ];

    /// Builds the palette from seven `#RRGGBB` strings, in order first..seventh.
    /// Every entry must parse; the fifth and seventh are not drawn.
    pub fn from_hex_list(hex: [&str; 7]) -> Option<Self> {
        let mut colors = [Color32::BLACK; 7];
        for (slot, value) in colors.iter_mut().zip(hex) {
            *slot = Color32::from_hex(value)?;
        }

        Some(Self {
            first: colors[0],
            second: colors[1],
            third: colors[2],
            fourth: colors[3],
            sixth: colors[5],
            success: Color32::from_rgb(34, 197, 94),
            drop_zone: Color32::from_rgb(241, 245, 249),
            drop_zone_border: Color32::from_rgb(148, 163, 184),
        })
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.first;
        visuals.window_fill = self.first;
        visuals.override_text_color = Some(self.fourth);
        visuals.selection.bg_fill = self.third;
        visuals.widgets.inactive.rounding = Rounding::same(8.0);
        visuals.widgets.hovered.rounding = Rounding::same(8.0);
        visuals.widgets.active.rounding = Rounding::same(8.0);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.second);
        ctx.set_visuals(visuals);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_hex_list(Self::HEX).unwrap_or(Self {
            first: Color32::WHITE,
            second: Color32::LIGHT_BLUE,
            third: Color32::BLUE,
            fourth: Color32::DARK_GRAY,
            sixth: Color32::RED,
            success: Color32::GREEN,
            drop_zone: Color32::LIGHT_GRAY,
            drop_zone_border: Color32::GRAY,
        })
    }
}
