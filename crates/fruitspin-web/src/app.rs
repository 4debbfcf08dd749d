use crate::effects::WinEffects;
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::lever::Lever;
use crate::settings::GameSettings;
use crate::ui::debug::DebugPanel;
use crate::ui::UiState;
use fruitspin_audio::cues::{reel_position, stop_semitones};
use fruitspin_audio::{AudioCue, AudioSystem};
use fruitspin_core::types::WinTier;
use fruitspin_sim::{GameEvent, ReelPhase, RoundCoordinator, RoundPhase};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Longest simulated step; anything slower is treated as a stall.
const MAX_FRAME_SECS: f32 = 0.1;

/// Main application struct. Owns the machine and every presentation subsystem.
pub struct Application {
    gpu: GpuContext,
    ui_state: UiState,
    debug_panel: DebugPanel,
    input: Rc<RefCell<InputState>>,
    machine: RoundCoordinator,
    lever: Lever,
    effects: WinEffects,
    audio: AudioSystem,
    settings: GameSettings,
    /// Pointer was over an egui window last frame; presses there are not pulls.
    pointer_over_ui: bool,
    last_frame_time: f64,
}

impl Application {
    pub fn new(
        gpu: GpuContext,
        dpi_scale: f32,
        input: Rc<RefCell<InputState>>,
        machine: RoundCoordinator,
    ) -> Self {
        let ui_state = UiState::new(&gpu.device, gpu.surface_format, dpi_scale);
        let debug_panel = DebugPanel::new(gpu.adapter_name.clone(), gpu.backend.clone());
        let settings = GameSettings::default();

        let mut audio = AudioSystem::new();
        audio.set_volume(settings.volume);
        audio.set_muted(settings.muted);

        Self {
            gpu,
            ui_state,
            debug_panel,
            input,
            machine,
            lever: Lever::new(),
            effects: WinEffects::new(),
            audio,
            settings,
            pointer_over_ui: false,
            last_frame_time: 0.0,
        }
    }

    /// Start the requestAnimationFrame loop. The closure is created once.
    pub fn start_loop(app: Rc<RefCell<Self>>) {
        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();

        let window = web_sys::window().expect("no global window");

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let mut app_ref = app.borrow_mut();

            let delta = timestamp - app_ref.last_frame_time;
            let first_frame = app_ref.last_frame_time <= 0.0;
            app_ref.last_frame_time = timestamp;

            // Backgrounded tab: resume without replaying the gap
            let dt = if first_frame || delta > MAX_FRAME_SECS as f64 * 1000.0 {
                0.0
            } else {
                (delta / 1000.0) as f32
            };

            app_ref.debug_panel.update(delta);
            app_ref.update(dt);
            app_ref.render_frame(timestamp / 1000.0);

            let window = web_sys::window().expect("no global window");
            window
                .request_animation_frame(
                    closure_clone
                        .borrow()
                        .as_ref()
                        .expect("rAF closure missing")
                        .as_ref()
                        .unchecked_ref(),
                )
                .expect("rAF registration failed");
        }) as Box<dyn FnMut(f64)>));

        window
            .request_animation_frame(
                closure
                    .borrow()
                    .as_ref()
                    .expect("rAF closure missing")
                    .as_ref()
                    .unchecked_ref(),
            )
            .expect("rAF registration failed");
    }

    /// One frame of game logic: input, lever, machine, events, audio, effects.
    fn update(&mut self, dt: f32) {
        let (visibility, pull) = {
            let mut input = self.input.borrow_mut();
            (input.visibility_change.take(), input.take_pull())
        };

        if visibility == Some(true) {
            if let Some(round) = self.machine.abort_round() {
                log::info!("Tab hidden, round {} abandoned", round);
            }
            self.lever.reset();
            self.effects.clear();
        }

        if pull && !self.pointer_over_ui && self.machine.can_start() && self.lever.pull() {
            let lever_pos = reel_position(self.machine.reel_count(), self.machine.reel_count());
            self.audio
                .register_cue(lever_pos, AudioCue::LeverPull, 1.0, 0.0);
        }

        let running = self.machine.round_phase() == RoundPhase::Running;
        if self.lever.update(dt, running) {
            if let Err(reason) = self.machine.start_round() {
                log::warn!("Lever pull ignored: {reason}");
            }
        }

        if dt > 0.0 {
            self.machine.tick(dt);
        }

        for event in self.machine.drain_events() {
            self.handle_event(event);
        }

        self.register_spin_whirr();
        self.apply_settings();
        self.audio.update(dt, glam::Vec3::ZERO);
        self.effects.update(dt);
    }

    fn handle_event(&mut self, event: GameEvent) {
        let reel_count = self.machine.reel_count();
        match event {
            GameEvent::ReelSettled {
                round,
                reel,
                symbol,
            } => {
                log::debug!(
                    "Reel {} stopped on {}",
                    reel,
                    self.machine.catalog().glyph(symbol)
                );
                self.audio.register_cue(
                    reel_position(reel, reel_count),
                    AudioCue::ReelStop,
                    0.8,
                    stop_semitones(round.0, reel),
                );
            }
            GameEvent::RoundComplete(result) => {
                self.debug_panel.record_round(result.total_score);
                self.effects.trigger(result.tier);
                let cue = match result.tier {
                    WinTier::NoWin => None,
                    WinTier::Win => Some(AudioCue::Win),
                    WinTier::Jackpot => Some(AudioCue::Jackpot),
                };
                if let Some(cue) = cue {
                    self.audio.register_cue(glam::Vec3::ZERO, cue, 1.0, 0.0);
                }
            }
            GameEvent::RoundStarted { .. }
            | GameEvent::ReelReleased { .. }
            | GameEvent::RoundAborted { .. } => {}
        }
    }

    /// Keep the whirr alive while any reel spins, louder the faster it goes.
    fn register_spin_whirr(&mut self) {
        let fastest = (0..self.machine.reel_count())
            .filter_map(|i| self.machine.reel(i))
            .filter(|r| r.phase() == ReelPhase::Spinning)
            .map(|r| r.angular_velocity().abs())
            .fold(0.0f32, f32::max);
        if fastest <= 0.0 {
            return;
        }
        let base = self.machine.config().base_speed.max(f32::EPSILON);
        let intensity = (fastest / base).clamp(0.1, 1.0);
        self.audio
            .register_cue(glam::Vec3::ZERO, AudioCue::ReelSpin, intensity, 0.0);
    }

    fn apply_settings(&mut self) {
        if self.audio.is_muted() != self.settings.muted {
            self.audio.set_muted(self.settings.muted);
            // Mixer creation can fail; reflect the real state back
            self.settings.muted = self.audio.is_muted();
        }
        if (self.audio.volume() - self.settings.volume).abs() > f32::EPSILON {
            self.audio.set_volume(self.settings.volume);
        }
    }

    /// Render a single frame.
    fn render_frame(&mut self, time_secs: f64) {
        let egui_events = self.input.borrow_mut().take_egui_events();

        // Destructure for disjoint borrows across the egui closure and the render pass
        let Application {
            gpu,
            ui_state,
            debug_panel,
            machine,
            lever,
            effects,
            settings,
            pointer_over_ui,
            ..
        } = self;

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {e:?}");
                return;
            }
        };

        let view = output.texture.create_view(&Default::default());

        let screen =
            ui_state.screen_descriptor(gpu.surface_config.width, gpu.surface_config.height);
        let raw_input = ui_state.raw_input(&screen, time_secs, egui_events);

        let palette = settings.theme.palette();
        let shake = effects.shake_offset(settings.screen_shake);
        let full_output = ui_state.ctx.run(raw_input, |ctx| {
            crate::ui::reels::show(ctx, machine, lever.angle(), &palette, shake);
            crate::ui::results::show(ctx, machine, &palette);
            crate::ui::settings::show(ctx, settings);
            debug_panel.show(ctx, machine);
        });
        *pointer_over_ui = ui_state.ctx.is_pointer_over_area();

        let clipped_primitives = ui_state
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // Background, flashing on wins
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(palette.clear_color(effects.flash_alpha())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        for (id, delta) in &full_output.textures_delta.set {
            ui_state
                .renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        ui_state.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped_primitives,
            &screen,
        );

        // forget_lifetime() lets the renderer borrow the pass without tying it to the encoder
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            ui_state
                .renderer
                .render(&mut pass, &clipped_primitives, &screen);
        }

        for id in &full_output.textures_delta.free {
            ui_state.renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
