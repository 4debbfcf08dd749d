use crate::bridge::AudioBridge;
use crate::cues::{stereo_pan, AudioCue, CueSource};
use crate::synth::{self, Voice};
use wasm_bindgen::prelude::*;

/// Half-width of the stereo field in scene units; the outer reels sit inside it.
const STEREO_HALF_WIDTH: f32 = 3.0;

struct HeldVoice {
    cue: AudioCue,
    voice: Box<dyn Voice>,
}

/// Turns cue sources into Web Audio voices. One-shots are started on the
/// frame they appear and left to their scheduled envelopes; held voices
/// live as long as their cue keeps being reported.
pub struct AudioMixer {
    bridge: AudioBridge,
    held: Vec<HeldVoice>,
    one_shots: Vec<Box<dyn Voice>>,
    max_one_shots: usize,
}

impl AudioMixer {
    pub fn new() -> Result<Self, JsValue> {
        let bridge = AudioBridge::new()?;
        Ok(Self {
            bridge,
            held: Vec::new(),
            one_shots: Vec::new(),
            max_one_shots: 16,
        })
    }

    pub fn update(&mut self, listener: glam::Vec3, sources: &[CueSource]) {
        for source in sources {
            let pan = stereo_pan(source.position, listener, STEREO_HALF_WIDTH);

            if source.cue.is_one_shot() {
                if !source.fresh {
                    continue;
                }
                let mut voice = synth::create_voice(source.cue);
                voice.start(&self.bridge, source, pan);
                self.one_shots.push(voice);
                while self.one_shots.len() > self.max_one_shots {
                    let mut oldest = self.one_shots.remove(0);
                    oldest.stop();
                }
                continue;
            }

            match self.held.iter_mut().find(|h| h.cue == source.cue) {
                Some(held) => held.voice.update(source, pan),
                None => {
                    let mut voice = synth::create_voice(source.cue);
                    voice.start(&self.bridge, source, pan);
                    self.held.push(HeldVoice {
                        cue: source.cue,
                        voice,
                    });
                }
            }
        }

        // Held voices whose cue expired
        self.held.retain_mut(|h| {
            let alive = sources.iter().any(|s| s.cue == h.cue);
            if !alive {
                h.voice.stop();
            }
            alive
        });
    }

    pub fn set_volume(&self, vol: f32) {
        self.bridge.set_master_volume(vol);
    }

    pub fn resume(&self) {
        self.bridge.resume();
    }

    pub fn stop_all(&mut self) {
        for held in &mut self.held {
            held.voice.stop();
        }
        for voice in &mut self.one_shots {
            voice.stop();
        }
        self.held.clear();
        self.one_shots.clear();
    }
}
