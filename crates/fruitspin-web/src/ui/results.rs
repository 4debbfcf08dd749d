use crate::settings::Palette;
use fruitspin_core::types::WinTier;
use fruitspin_sim::{RoundCoordinator, RoundPhase};

fn tier_color(tier: WinTier, palette: &Palette) -> egui::Color32 {
    match tier {
        WinTier::NoWin => egui::Color32::GRAY,
        WinTier::Win => palette.payline,
        WinTier::Jackpot => egui::Color32::from_rgb(255, 215, 0),
    }
}

/// Status line for the round in progress, or the prompt when idle.
pub fn status_line(machine: &RoundCoordinator) -> String {
    match machine.round_phase() {
        RoundPhase::Running => format!(
            "Spinning... {}/{} reels stopped",
            machine.completed_count(),
            machine.reel_count()
        ),
        _ if machine.can_start() => "Click to pull the lever".to_string(),
        _ => "Get ready...".to_string(),
    }
}

/// Last round's symbols, score and tier under the reels.
pub fn show(ctx: &egui::Context, machine: &RoundCoordinator, palette: &Palette) {
    egui::Area::new(egui::Id::new("results"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    if let Some(result) = machine.last_result() {
                        let glyphs: Vec<&str> = result
                            .symbols
                            .iter()
                            .map(|&s| machine.catalog().glyph(s))
                            .collect();
                        ui.label(egui::RichText::new(glyphs.join(" ")).size(28.0));
                        ui.label(
                            egui::RichText::new(format!(
                                "Score {} - {}",
                                result.total_score,
                                result.tier.name()
                            ))
                            .size(18.0)
                            .color(tier_color(result.tier, palette)),
                        );
                    }
                    ui.label(status_line(machine));
                });
            });
        });
}
