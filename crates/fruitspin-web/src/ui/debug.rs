use fruitspin_sim::{ReelPhase, RoundCoordinator};

/// Debug panel: adapter, frame timing, round and per-reel state.
pub struct DebugPanel {
    adapter_name: String,
    backend: String,
    frame_times: [f64; 60],
    frame_index: usize,
    avg_frame_time_ms: f64,
    rounds_played: u64,
    total_points: u64,
}

impl DebugPanel {
    pub fn new(adapter_name: String, backend: String) -> Self {
        Self {
            adapter_name,
            backend,
            frame_times: [0.0; 60],
            frame_index: 0,
            avg_frame_time_ms: 0.0,
            rounds_played: 0,
            total_points: 0,
        }
    }

    /// Record a frame's delta time and update the rolling average.
    pub fn update(&mut self, delta_ms: f64) {
        self.frame_times[self.frame_index] = delta_ms;
        self.frame_index = (self.frame_index + 1) % 60;
        let sum: f64 = self.frame_times.iter().sum();
        self.avg_frame_time_ms = sum / 60.0;
    }

    pub fn record_round(&mut self, score: u32) {
        self.rounds_played += 1;
        self.total_points += score as u64;
    }

    pub fn show(&self, ctx: &egui::Context, machine: &RoundCoordinator) {
        egui::Window::new("Debug")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .default_open(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(&self.adapter_name);
                ui.label(&self.backend);
                ui.separator();
                let fps = if self.avg_frame_time_ms > 0.0 {
                    1000.0 / self.avg_frame_time_ms
                } else {
                    0.0
                };
                ui.label(format!("{:.2} ms", self.avg_frame_time_ms));
                ui.label(format!("{:.0} FPS", fps));
                ui.separator();
                ui.label(format!(
                    "Round {} | {:?} | cooldown {:.2}s",
                    machine.round_id(),
                    machine.round_phase(),
                    machine.cooldown_remaining()
                ));
                ui.label(format!("Pending triggers: {}", machine.pending_triggers()));
                for i in 0..machine.reel_count() {
                    let Some(reel) = machine.reel(i) else {
                        continue;
                    };
                    let phase = match reel.phase() {
                        ReelPhase::Idle => "idle",
                        ReelPhase::Spinning if reel.is_released() => "spin",
                        ReelPhase::Spinning => "hold",
                        ReelPhase::Snapping => "snap",
                        ReelPhase::Settled => "done",
                    };
                    ui.label(format!(
                        "Reel {}: {} {:6.2} rad/s @ {:.2}",
                        i,
                        phase,
                        reel.angular_velocity(),
                        reel.rotation()
                    ));
                }
                ui.separator();
                let mean = if self.rounds_played > 0 {
                    self.total_points as f64 / self.rounds_played as f64
                } else {
                    0.0
                };
                ui.label(format!(
                    "Rounds: {} | mean score {:.2}",
                    self.rounds_played, mean
                ));
            });
    }
}
