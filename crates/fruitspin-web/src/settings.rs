/// Visual theme of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    /// Green-on-black, symbols drawn in their catalog colors.
    Matrix,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Default, Theme::Matrix];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Matrix => "Matrix",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Default => Palette {
                background: [0.09, 0.07, 0.12],
                reel_face: egui::Color32::from_rgb(245, 240, 228),
                reel_edge: egui::Color32::from_rgb(120, 40, 48),
                text: egui::Color32::from_rgb(30, 30, 30),
                payline: egui::Color32::from_rgb(220, 170, 40),
                flash: [1.0, 0.85, 0.3],
                tint_symbols: false,
            },
            Theme::Matrix => Palette {
                background: [0.0, 0.02, 0.0],
                reel_face: egui::Color32::from_rgb(4, 20, 6),
                reel_edge: egui::Color32::from_rgb(0, 140, 40),
                text: egui::Color32::from_rgb(0, 255, 70),
                payline: egui::Color32::from_rgb(0, 255, 70),
                flash: [0.2, 1.0, 0.3],
                tint_symbols: true,
            },
        }
    }
}

/// Colors used to draw the machine under one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Linear RGB clear color.
    pub background: [f64; 3],
    pub reel_face: egui::Color32,
    pub reel_edge: egui::Color32,
    pub text: egui::Color32,
    pub payline: egui::Color32,
    /// Clear color the background is blended toward during a win flash.
    pub flash: [f64; 3],
    /// Draw glyphs in the symbol's catalog color instead of `text`.
    pub tint_symbols: bool,
}

impl Palette {
    /// Background clear color with the win flash blended in.
    pub fn clear_color(&self, flash_alpha: f32) -> wgpu::Color {
        let a = flash_alpha.clamp(0.0, 1.0) as f64 * 0.6;
        let mix = |bg: f64, fl: f64| bg + (fl - bg) * a;
        wgpu::Color {
            r: mix(self.background[0], self.flash[0]),
            g: mix(self.background[1], self.flash[1]),
            b: mix(self.background[2], self.flash[2]),
            a: 1.0,
        }
    }
}

/// Player preferences. Owned by the presentation layer and passed down
/// explicitly; the simulation never sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub theme: Theme,
    pub screen_shake: bool,
    pub muted: bool,
    pub volume: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            screen_shake: true,
            muted: true,
            volume: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.theme, Theme::Default);
        assert!(settings.screen_shake);
        assert!(settings.muted);
        assert_eq!(settings.volume, 0.5);
    }

    #[test]
    fn test_clear_color_blends_toward_flash() {
        let palette = Theme::Matrix.palette();
        let calm = palette.clear_color(0.0);
        let flashing = palette.clear_color(1.0);
        assert_eq!(calm.g, palette.background[1]);
        assert!(flashing.g > calm.g);
        assert!(flashing.g <= 1.0);
    }

    #[test]
    fn test_theme_names_unique() {
        assert_ne!(Theme::ALL[0].name(), Theme::ALL[1].name());
    }
}
