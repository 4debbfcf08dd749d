use fruitspin_core::types::reel_position_x;

/// Sounds the machine can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Ratchet noise when the lever is pulled.
    LeverPull,
    /// Whirr that lasts while any reel is spinning. Refreshed every frame.
    ReelSpin,
    /// Plucked note as a reel comes to rest.
    ReelStop,
    Win,
    Jackpot,
}

impl AudioCue {
    /// Seconds a registered cue stays audible without being refreshed.
    fn default_ttl(self) -> f32 {
        match self {
            AudioCue::LeverPull => 0.4,
            AudioCue::ReelSpin => 0.15,
            AudioCue::ReelStop => 0.3,
            AudioCue::Win => 1.2,
            AudioCue::Jackpot => 2.5,
        }
    }

    /// Whether the cue plays as a fire-and-forget envelope rather than a held voice.
    pub fn is_one_shot(self) -> bool {
        !matches!(self, AudioCue::ReelSpin)
    }
}

/// A positioned cue ready for the mixer.
#[derive(Debug, Clone)]
pub struct CueSource {
    pub position: glam::Vec3,
    pub cue: AudioCue,
    /// 0.0-1.0, faded by remaining lifetime for held voices.
    pub intensity: f32,
    /// Pitch offset from concert A in semitones.
    pub semitones: f32,
    /// True only on the update that first reports this cue.
    pub fresh: bool,
}

struct TrackedCue {
    source: CueSource,
    ttl: f32,
}

/// Collects cues raised by game events between audio updates and ages them out.
pub struct CueTracker {
    cues: Vec<TrackedCue>,
    max_cues: usize,
}

impl Default for CueTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CueTracker {
    pub fn new() -> Self {
        Self {
            cues: Vec::new(),
            max_cues: 32,
        }
    }

    pub fn register(&mut self, position: glam::Vec3, cue: AudioCue, intensity: f32, semitones: f32) {
        // Held voices are refreshed in place instead of stacking
        if !cue.is_one_shot() {
            if let Some(existing) = self.cues.iter_mut().find(|c| c.source.cue == cue) {
                existing.ttl = cue.default_ttl();
                existing.source.intensity = intensity.clamp(0.0, 1.0);
                existing.source.position = position;
                return;
            }
        }

        self.cues.push(TrackedCue {
            source: CueSource {
                position,
                cue,
                intensity: intensity.clamp(0.0, 1.0),
                semitones,
                fresh: true,
            },
            ttl: cue.default_ttl(),
        });

        while self.cues.len() > self.max_cues {
            self.cues.remove(0);
        }
    }

    /// Age every cue by `dt_secs`, drop expired ones and report the rest.
    pub fn update(&mut self, dt_secs: f32) -> Vec<CueSource> {
        let sources = self
            .cues
            .iter()
            .map(|c| {
                let mut source = c.source.clone();
                if !source.cue.is_one_shot() {
                    source.intensity *= (c.ttl / source.cue.default_ttl()).clamp(0.0, 1.0);
                }
                source
            })
            .collect();

        for cue in &mut self.cues {
            cue.ttl -= dt_secs;
            cue.source.fresh = false;
        }
        self.cues.retain(|c| c.ttl > 0.0);

        sources
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }
}

/// Scene position of reel `reel` on a machine with `reel_count` reels.
pub fn reel_position(reel: usize, reel_count: usize) -> glam::Vec3 {
    glam::Vec3::new(reel_position_x(reel, reel_count), 0.0, 0.0)
}

/// Stereo pan for a source relative to a listener facing -Z.
/// `half_width` is the distance at which a source is hard left or right.
pub fn stereo_pan(source: glam::Vec3, listener: glam::Vec3, half_width: f32) -> f32 {
    if half_width <= 0.0 {
        return 0.0;
    }
    ((source - listener).dot(glam::Vec3::X) / half_width).clamp(-1.0, 1.0)
}

/// Pseudo-random microtone offset in `[-12, 12]` semitones for a reel stop.
/// Keyed on round and reel so replays of the same round sound the same.
pub fn stop_semitones(round: u64, reel: usize) -> f32 {
    let mut state = (round as u32)
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(((round >> 32) as u32).wrapping_mul(0x6C62_272E))
        .wrapping_add((reel as u32).wrapping_mul(0x517C_C1B7));

    state ^= state >> 16;
    state = state.wrapping_mul(0x045D_9F3B);
    state ^= state >> 16;
    state = state.wrapping_mul(0x045D_9F3B);
    state ^= state >> 16;

    (state as f64 / u32::MAX as f64 * 24.0 - 12.0) as f32
}

/// Equal-tempered frequency `semitones` away from A4 (440 Hz).
pub fn semitone_frequency(semitones: f32) -> f32 {
    440.0 * 2f32.powf(semitones / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_reported_fresh_once() {
        let mut tracker = CueTracker::new();
        tracker.register(glam::Vec3::ZERO, AudioCue::ReelStop, 1.0, 3.0);

        let first = tracker.update(0.016);
        assert_eq!(first.len(), 1);
        assert!(first[0].fresh);
        assert_eq!(first[0].semitones, 3.0);

        let second = tracker.update(0.016);
        assert_eq!(second.len(), 1);
        assert!(!second[0].fresh);
    }

    #[test]
    fn test_cues_expire() {
        let mut tracker = CueTracker::new();
        tracker.register(glam::Vec3::ZERO, AudioCue::LeverPull, 1.0, 0.0);
        tracker.update(0.5);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_held_voice_refreshes_in_place() {
        let mut tracker = CueTracker::new();
        for _ in 0..10 {
            tracker.register(glam::Vec3::ZERO, AudioCue::ReelSpin, 0.8, 0.0);
            tracker.update(0.1);
        }
        assert_eq!(tracker.len(), 1);

        // Stops being refreshed once the reels stop
        tracker.update(0.1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_held_voice_fades() {
        let mut tracker = CueTracker::new();
        tracker.register(glam::Vec3::ZERO, AudioCue::ReelSpin, 1.0, 0.0);
        let full = tracker.update(0.1);
        let faded = tracker.update(0.01);
        assert!((full[0].intensity - 1.0).abs() < 1e-6);
        assert!(faded[0].intensity < full[0].intensity);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut tracker = CueTracker::new();
        for i in 0..40 {
            tracker.register(glam::Vec3::ZERO, AudioCue::ReelStop, 1.0, i as f32);
        }
        assert_eq!(tracker.len(), 32);
        let sources = tracker.update(0.0);
        assert_eq!(sources[0].semitones, 8.0);
    }

    #[test]
    fn test_intensity_clamped() {
        let mut tracker = CueTracker::new();
        tracker.register(glam::Vec3::ZERO, AudioCue::Win, 4.0, 0.0);
        assert_eq!(tracker.update(0.0)[0].intensity, 1.0);
    }

    #[test]
    fn test_stop_semitones_range_and_determinism() {
        for round in 0..50u64 {
            for reel in 0..5 {
                let s = stop_semitones(round, reel);
                assert!((-12.0..=12.0).contains(&s));
                assert_eq!(s, stop_semitones(round, reel));
            }
        }
        let distinct: std::collections::HashSet<i32> = (0..200u64)
            .map(|r| stop_semitones(r, 0) as i32)
            .collect();
        assert!(distinct.len() > 10);
    }

    #[test]
    fn test_stop_semitones_are_microtones() {
        let offsets: Vec<f32> = (0..500u64)
            .flat_map(|round| (0..5).map(move |reel| stop_semitones(round, reel)))
            .collect();
        let fractional = offsets.iter().filter(|s| s.fract().abs() > 1e-3).count();
        assert!(fractional > offsets.len() / 2, "only {fractional} fractional offsets");
        assert!(offsets.iter().any(|&s| s < -6.0));
        assert!(offsets.iter().any(|&s| s > 6.0));
    }

    #[test]
    fn test_semitone_frequency() {
        assert!((semitone_frequency(0.0) - 440.0).abs() < 1e-3);
        assert!((semitone_frequency(12.0) - 880.0).abs() < 1e-2);
        assert!((semitone_frequency(-12.0) - 220.0).abs() < 1e-2);
    }

    #[test]
    fn test_stereo_pan_follows_reel() {
        let listener = glam::Vec3::ZERO;
        let left = stereo_pan(reel_position(0, 5), listener, 3.0);
        let middle = stereo_pan(reel_position(2, 5), listener, 3.0);
        let right = stereo_pan(reel_position(4, 5), listener, 3.0);
        assert!(left < 0.0);
        assert!(middle.abs() < 1e-6);
        assert!(right > 0.0);
        assert!((left + right).abs() < 1e-6);
        assert_eq!(stereo_pan(glam::Vec3::X * 100.0, listener, 3.0), 1.0);
        assert_eq!(stereo_pan(glam::Vec3::X, listener, 0.0), 0.0);
    }
}
