use fruitspin_core::types::WinTier;

/// Cosmetic celebration state: screen shake and a background flash.
/// Both timers count down in seconds and never affect the simulation.
#[derive(Debug, Clone, Default)]
pub struct WinEffects {
    shake_remaining: f32,
    shake_duration: f32,
    shake_amplitude: f32,
    flash_remaining: f32,
    flash_duration: f32,
    elapsed: f32,
}

impl WinEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the effects for a finished round. `NoWin` does nothing.
    pub fn trigger(&mut self, tier: WinTier) {
        let (shake, amplitude, flash) = match tier {
            WinTier::NoWin => return,
            WinTier::Win => (0.4, 6.0, 0.3),
            WinTier::Jackpot => (1.2, 14.0, 0.9),
        };
        self.shake_remaining = shake;
        self.shake_duration = shake;
        self.shake_amplitude = amplitude;
        self.flash_remaining = flash;
        self.flash_duration = flash;
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.shake_remaining = (self.shake_remaining - dt).max(0.0);
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);
    }

    /// Current shake offset in points. Zero when shaking is disabled or over.
    pub fn shake_offset(&self, enabled: bool) -> glam::Vec2 {
        if !enabled || self.shake_remaining <= 0.0 || self.shake_duration <= 0.0 {
            return glam::Vec2::ZERO;
        }
        let falloff = self.shake_remaining / self.shake_duration;
        let t = self.elapsed;
        glam::Vec2::new((t * 67.0).sin(), (t * 53.0 + 1.3).cos()) * self.shake_amplitude * falloff
    }

    /// Flash overlay strength in 0..1, fading linearly.
    pub fn flash_alpha(&self) -> f32 {
        if self.flash_duration <= 0.0 {
            return 0.0;
        }
        (self.flash_remaining / self.flash_duration).clamp(0.0, 1.0)
    }

    pub fn is_active(&self) -> bool {
        self.shake_remaining > 0.0 || self.flash_remaining > 0.0
    }

    pub fn clear(&mut self) {
        self.shake_remaining = 0.0;
        self.flash_remaining = 0.0;
    }
}
