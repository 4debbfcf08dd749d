pub mod cues;

#[cfg(target_arch = "wasm32")]
pub mod bridge;
#[cfg(target_arch = "wasm32")]
pub mod mixer;
#[cfg(target_arch = "wasm32")]
pub mod synth;

pub use cues::{AudioCue, CueSource};

/// Top-level audio facade. Owns the cue tracker (platform-independent) and
/// the Web Audio mixer (WASM-only). While muted, nothing is tracked and
/// `update` returns immediately.
pub struct AudioSystem {
    tracker: cues::CueTracker,
    #[cfg(target_arch = "wasm32")]
    mixer: Option<mixer::AudioMixer>,
    muted: bool,
    volume: f32,
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSystem {
    /// Starts muted. The mixer is created on unmute, which must happen inside
    /// a user gesture for the browser to allow playback.
    pub fn new() -> Self {
        Self {
            tracker: cues::CueTracker::new(),
            #[cfg(target_arch = "wasm32")]
            mixer: None,
            muted: true,
            volume: 0.5,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if muted == self.muted {
            return;
        }
        self.muted = muted;

        #[cfg(target_arch = "wasm32")]
        {
            if !muted {
                match mixer::AudioMixer::new() {
                    Ok(m) => {
                        m.resume();
                        m.set_volume(self.volume);
                        self.mixer = Some(m);
                        log::info!("Audio unmuted");
                    }
                    Err(e) => {
                        log::error!("Failed to create audio mixer: {:?}", e);
                        self.muted = true;
                    }
                }
            } else {
                if let Some(ref mut m) = self.mixer {
                    m.stop_all();
                }
                self.mixer = None;
                log::info!("Audio muted");
            }
        }

        if muted {
            self.tracker.clear();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Master volume, clamped to 0.0-1.0.
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        #[cfg(target_arch = "wasm32")]
        if let Some(ref m) = self.mixer {
            m.set_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Queue a cue. No-op while muted.
    pub fn register_cue(
        &mut self,
        position: glam::Vec3,
        cue: AudioCue,
        intensity: f32,
        semitones: f32,
    ) {
        if self.muted {
            return;
        }
        self.tracker.register(position, cue, intensity, semitones);
    }

    /// Number of cues currently tracked.
    pub fn pending_cues(&self) -> usize {
        self.tracker.len()
    }

    pub fn update(&mut self, dt_secs: f32, listener: glam::Vec3) {
        if self.muted {
            return;
        }

        let sources = self.tracker.update(dt_secs);

        #[cfg(target_arch = "wasm32")]
        if let Some(ref mut m) = self.mixer {
            m.update(listener, &sources);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (listener, &sources);
        }
    }
}
