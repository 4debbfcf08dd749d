use crate::settings::{GameSettings, Theme};

/// Settings panel: theme, screen shake, mute and volume.
pub fn show(ctx: &egui::Context, settings: &mut GameSettings) {
    egui::Window::new("Settings")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
        .resizable(false)
        .collapsible(true)
        .default_open(false)
        .show(ctx, |ui| {
            ui.label("Theme");
            ui.horizontal(|ui| {
                for theme in Theme::ALL {
                    if ui
                        .selectable_label(settings.theme == theme, theme.name())
                        .clicked()
                    {
                        settings.theme = theme;
                    }
                }
            });

            ui.separator();

            ui.checkbox(&mut settings.screen_shake, "Screen shake");

            ui.separator();

            ui.label("Audio");
            ui.checkbox(&mut settings.muted, "Mute");
            if !settings.muted {
                ui.add(egui::Slider::new(&mut settings.volume, 0.0..=1.0).text("Volume"));
            }
        });
}
