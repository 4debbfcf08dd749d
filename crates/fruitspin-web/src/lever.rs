use fruitspin_core::constants::{
    LEVER_PULLED_ANGLE, LEVER_PULL_SPEED, LEVER_REST_ANGLE, LEVER_RETURN_RATE,
};

/// Within this many radians of rest the return animation snaps home.
const REST_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeverState {
    Rest,
    /// Travelling toward the pulled angle; `progress` in 0..1.
    Pulling { progress: f32 },
    /// Fully pulled, waiting for the round to finish.
    Held,
    Returning,
}

/// The pull lever at the side of the machine. Purely presentational: it
/// tells the frame loop when a pull completes and never touches the reels.
#[derive(Debug, Clone)]
pub struct Lever {
    state: LeverState,
    angle: f32,
}

impl Default for Lever {
    fn default() -> Self {
        Self::new()
    }
}

impl Lever {
    pub fn new() -> Self {
        Self {
            state: LeverState::Rest,
            angle: LEVER_REST_ANGLE,
        }
    }

    /// Begin a pull. Ignored unless the lever is at rest.
    pub fn pull(&mut self) -> bool {
        if self.state != LeverState::Rest {
            return false;
        }
        self.state = LeverState::Pulling { progress: 0.0 };
        true
    }

    /// Advance the animation. Returns true on the frame the pull completes,
    /// which is when the round should start.
    pub fn update(&mut self, dt: f32, round_running: bool) -> bool {
        match self.state {
            LeverState::Rest => false,
            LeverState::Pulling { progress } => {
                let progress = (progress + LEVER_PULL_SPEED * dt).min(1.0);
                self.angle = LEVER_REST_ANGLE + (LEVER_PULLED_ANGLE - LEVER_REST_ANGLE) * progress;
                if progress >= 1.0 {
                    self.state = LeverState::Held;
                    true
                } else {
                    self.state = LeverState::Pulling { progress };
                    false
                }
            }
            LeverState::Held => {
                if !round_running {
                    self.state = LeverState::Returning;
                }
                false
            }
            LeverState::Returning => {
                self.angle += (LEVER_REST_ANGLE - self.angle) * LEVER_RETURN_RATE;
                if (self.angle - LEVER_REST_ANGLE).abs() < REST_EPSILON {
                    self.angle = LEVER_REST_ANGLE;
                    self.state = LeverState::Rest;
                }
                false
            }
        }
    }

    /// Drop any animation and return to rest immediately.
    pub fn reset(&mut self) {
        self.state = LeverState::Rest;
        self.angle = LEVER_REST_ANGLE;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn state(&self) -> LeverState {
        self.state
    }
}
