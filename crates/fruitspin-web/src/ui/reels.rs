use crate::settings::Palette;
use fruitspin_core::symbol::{SymbolCatalog, SymbolId};
use fruitspin_sim::RoundCoordinator;

/// Faces drawn per reel window: the payline face plus one above and below.
pub const VISIBLE_ROWS: i32 = 3;

/// Which faces show through a reel window at `rotation`, as
/// `(face index, vertical offset in face heights)` pairs, top to bottom.
///
/// The payline face is the one `segment_index_at` reports; increasing
/// rotation scrolls faces downward, so the next face enters from above.
pub fn visible_faces(rotation: f32, segment_count: usize) -> Vec<(usize, f32)> {
    if segment_count == 0 {
        return Vec::new();
    }
    let segment_angle = std::f32::consts::TAU / segment_count as f32;
    let position = rotation / segment_angle;
    let centre = position.round();
    let frac = position - centre;
    let centre_index = (centre as i64).rem_euclid(segment_count as i64);

    let half = VISIBLE_ROWS / 2;
    (-half..=half)
        .rev()
        .map(|k| {
            let index = (centre_index + k as i64).rem_euclid(segment_count as i64) as usize;
            (index, -(k as f32) + frac)
        })
        .collect()
}

fn symbol_color(catalog: &SymbolCatalog, palette: &Palette, id: SymbolId) -> egui::Color32 {
    if !palette.tint_symbols {
        return palette.text;
    }
    match catalog.get(id) {
        Some(def) => egui::Color32::from_rgb(
            (def.color.0.clamp(0.0, 1.0) * 255.0) as u8,
            (def.color.1.clamp(0.0, 1.0) * 255.0) as u8,
            (def.color.2.clamp(0.0, 1.0) * 255.0) as u8,
        ),
        None => palette.text,
    }
}

/// Paint the reel bank and the lever on the background layer.
pub fn show(
    ctx: &egui::Context,
    machine: &RoundCoordinator,
    lever_angle: f32,
    palette: &Palette,
    shake: glam::Vec2,
) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let screen = ctx.screen_rect();
    let reel_count = machine.reel_count();
    if reel_count == 0 {
        return;
    }
    let segment_count = machine.config().segment_count;
    let catalog = machine.catalog();

    let face_h = (screen.height() * 0.14).clamp(40.0, 110.0);
    let reel_w = face_h * 1.1;
    let gap = face_h * 0.15;
    let bank_w = reel_count as f32 * reel_w + (reel_count - 1) as f32 * gap;
    let origin = screen.center() + egui::vec2(shake.x, shake.y)
        - egui::vec2(bank_w / 2.0, face_h * VISIBLE_ROWS as f32 / 2.0);

    for reel in 0..reel_count {
        let x = origin.x + reel as f32 * (reel_w + gap);
        let window = egui::Rect::from_min_size(
            egui::pos2(x, origin.y),
            egui::vec2(reel_w, face_h * VISIBLE_ROWS as f32),
        );
        painter.rect_filled(window.expand(3.0), 6.0, palette.reel_edge);
        painter.rect_filled(window, 4.0, palette.reel_face);

        let (Some(rotation), Some(faces)) =
            (machine.current_rotation(reel), machine.symbol_sequence(reel))
        else {
            continue;
        };
        if faces.is_empty() {
            // Never spun: leave the window blank
            continue;
        }

        let clipped = painter.with_clip_rect(window);
        for (face, offset) in visible_faces(rotation, segment_count) {
            let Some(&symbol) = faces.get(face) else {
                continue;
            };
            let centre = egui::pos2(window.center().x, window.center().y + offset * face_h);
            clipped.text(
                centre,
                egui::Align2::CENTER_CENTER,
                catalog.glyph(symbol),
                egui::FontId::proportional(face_h * 0.6),
                symbol_color(catalog, palette, symbol),
            );
        }
    }

    // Payline across the middle row
    let mid_y = origin.y + face_h * VISIBLE_ROWS as f32 / 2.0;
    let stroke = egui::Stroke::new(2.0, palette.payline);
    painter.line_segment(
        [
            egui::pos2(origin.x - 12.0, mid_y),
            egui::pos2(origin.x + bank_w + 12.0, mid_y),
        ],
        stroke,
    );

    // Lever pivots on the right of the bank; angle 0 points straight up
    let pivot = egui::pos2(origin.x + bank_w + face_h * 0.8, mid_y);
    let length = face_h * 1.2;
    let tip = pivot + egui::vec2(lever_angle.sin(), -lever_angle.cos()) * length;
    painter.line_segment([pivot, tip], egui::Stroke::new(6.0, palette.reel_edge));
    painter.circle_filled(pivot, 8.0, palette.reel_edge);
    painter.circle_filled(tip, face_h * 0.18, palette.payline);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_at_rest() {
        let angle = std::f32::consts::TAU / 20.0;
        let faces = visible_faces(3.0 * angle, 20);
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[0].0, 4);
        assert_eq!(faces[1].0, 3);
        assert_eq!(faces[2].0, 2);
        assert!((faces[0].1 + 1.0).abs() < 1e-4);
        assert!(faces[1].1.abs() < 1e-4);
        assert!((faces[2].1 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_faces_wrap_around() {
        let faces = visible_faces(0.0, 20);
        let indices: Vec<usize> = faces.iter().map(|f| f.0).collect();
        assert_eq!(indices, vec![1, 0, 19]);

        let angle = std::f32::consts::TAU / 20.0;
        let faces = visible_faces(-angle, 20);
        let indices: Vec<usize> = faces.iter().map(|f| f.0).collect();
        assert_eq!(indices, vec![0, 19, 18]);
    }

    #[test]
    fn test_faces_scroll_down_with_rotation() {
        let angle = std::f32::consts::TAU / 20.0;
        let before = visible_faces(5.0 * angle, 20);
        let after = visible_faces(5.3 * angle, 20);
        assert_eq!(before[1].0, after[1].0);
        assert!(after[1].1 > before[1].1);
    }

    #[test]
    fn test_payline_matches_settle_index() {
        let angle = std::f32::consts::TAU / 20.0;
        for step in 0..80 {
            let rotation = step as f32 * angle * 0.37 - 3.0;
            let faces = visible_faces(rotation, 20);
            assert_eq!(
                faces[1].0,
                fruitspin_sim::reel::segment_index_at(rotation, 20)
            );
        }
    }

    #[test]
    fn test_no_faces_without_segments() {
        assert!(visible_faces(1.0, 0).is_empty());
    }
}
