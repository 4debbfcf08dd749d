use crate::bridge::AudioBridge;
use crate::cues::{semitone_frequency, AudioCue, CueSource};
use wasm_bindgen::prelude::*;
use web_sys::{
    AudioBufferSourceNode, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorType,
    StereoPannerNode,
};

/// A voice the mixer can start, steer and stop.
pub trait Voice {
    fn start(&mut self, bridge: &AudioBridge, source: &CueSource, pan: f32);
    fn update(&mut self, source: &CueSource, pan: f32);
    fn stop(&mut self);
}

/// Schedule a plucked note: near-instant attack, exponential decay.
#[allow(deprecated)]
fn pluck(
    bridge: &AudioBridge,
    panner: &StereoPannerNode,
    freq: f32,
    osc_type: OscillatorType,
    peak: f32,
    at: f64,
    decay: f64,
) -> Result<(), JsValue> {
    let (osc, gain) = bridge.create_oscillator(freq, osc_type, panner)?;
    let g = gain.gain();
    g.set_value_at_time(0.0, at)?;
    g.linear_ramp_to_value_at_time(peak, at + 0.001)?;
    g.exponential_ramp_to_value_at_time(0.001, at + decay)?;
    osc.start_with_when(at)?;
    osc.stop_with_when(at + decay + 0.05)?;
    Ok(())
}

/// Reel stop: one triangle pluck at the cue's microtone.
#[derive(Default)]
pub struct PluckVoice {
    panner: Option<StereoPannerNode>,
}

impl Voice for PluckVoice {
    fn start(&mut self, bridge: &AudioBridge, source: &CueSource, pan: f32) {
        let result: Result<(), JsValue> = (|| {
            let panner = bridge.create_panner(pan)?;
            let freq = semitone_frequency(source.semitones);
            pluck(
                bridge,
                &panner,
                freq,
                OscillatorType::Triangle,
                source.intensity * 0.6,
                bridge.current_time(),
                0.25,
            )?;
            self.panner = Some(panner);
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("PluckVoice start failed: {:?}", e);
        }
    }

    fn update(&mut self, _source: &CueSource, _pan: f32) {
        // Envelope is fully scheduled at start
    }

    fn stop(&mut self) {
        if let Some(panner) = self.panner.take() {
            let _ = panner.disconnect();
        }
    }
}

/// Win and jackpot: rising major arpeggio. Jackpot repeats it an octave up.
#[derive(Default)]
pub struct FanfareVoice {
    panner: Option<StereoPannerNode>,
}

impl Voice for FanfareVoice {
    fn start(&mut self, bridge: &AudioBridge, source: &CueSource, pan: f32) {
        let result: Result<(), JsValue> = (|| {
            let panner = bridge.create_panner(pan)?;
            let now = bridge.current_time();
            let octaves: &[f32] = match source.cue {
                AudioCue::Jackpot => &[0.0, 12.0],
                _ => &[0.0],
            };
            let mut at = now;
            for &octave in octaves {
                for step in [0.0, 4.0, 7.0, 12.0] {
                    let freq = semitone_frequency(source.semitones + octave + step);
                    pluck(
                        bridge,
                        &panner,
                        freq,
                        OscillatorType::Sine,
                        source.intensity * 0.4,
                        at,
                        0.4,
                    )?;
                    at += 0.09;
                }
            }
            self.panner = Some(panner);
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("FanfareVoice start failed: {:?}", e);
        }
    }

    fn update(&mut self, _source: &CueSource, _pan: f32) {}

    fn stop(&mut self) {
        if let Some(panner) = self.panner.take() {
            let _ = panner.disconnect();
        }
    }
}

/// Lever pull: short bandpassed noise burst.
#[derive(Default)]
pub struct RatchetVoice {
    source: Option<AudioBufferSourceNode>,
}

impl Voice for RatchetVoice {
    #[allow(deprecated)]
    fn start(&mut self, bridge: &AudioBridge, source: &CueSource, pan: f32) {
        let result: Result<(), JsValue> = (|| {
            let panner = bridge.create_panner(pan)?;
            let (noise, _filter, gain) =
                bridge.create_filtered_noise(BiquadFilterType::Bandpass, 1800.0, 4.0, &panner)?;
            let now = bridge.current_time();
            let g = gain.gain();
            g.set_value_at_time(0.0, now)?;
            g.linear_ramp_to_value_at_time(source.intensity * 0.35, now + 0.01)?;
            g.exponential_ramp_to_value_at_time(0.001, now + 0.3)?;
            noise.start()?;
            noise.stop_with_when(now + 0.35)?;
            self.source = Some(noise);
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("RatchetVoice start failed: {:?}", e);
        }
    }

    fn update(&mut self, _source: &CueSource, _pan: f32) {}

    #[allow(deprecated)]
    fn stop(&mut self) {
        if let Some(source) = self.source.take() {
            let _ = source.stop();
        }
    }
}

/// Spinning reels: held lowpassed noise, brighter the faster it is fed.
#[derive(Default)]
pub struct WhirrVoice {
    source: Option<AudioBufferSourceNode>,
    filter: Option<BiquadFilterNode>,
    gain: Option<GainNode>,
    panner: Option<StereoPannerNode>,
}

impl Voice for WhirrVoice {
    #[allow(deprecated)]
    fn start(&mut self, bridge: &AudioBridge, source: &CueSource, pan: f32) {
        if self.source.is_some() {
            return;
        }
        let result: Result<(), JsValue> = (|| {
            let panner = bridge.create_panner(pan)?;
            let (noise, filter, gain) =
                bridge.create_filtered_noise(BiquadFilterType::Lowpass, 400.0, 0.9, &panner)?;
            noise.start()?;
            self.source = Some(noise);
            self.filter = Some(filter);
            self.gain = Some(gain);
            self.panner = Some(panner);
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("WhirrVoice start failed: {:?}", e);
            return;
        }
        self.update(source, pan);
    }

    fn update(&mut self, source: &CueSource, pan: f32) {
        if let Some(gain) = &self.gain {
            gain.gain().set_value(source.intensity * 0.15);
        }
        if let Some(filter) = &self.filter {
            filter.frequency().set_value(250.0 + source.intensity * 900.0);
        }
        if let Some(panner) = &self.panner {
            panner.pan().set_value(pan);
        }
    }

    #[allow(deprecated)]
    fn stop(&mut self) {
        if let Some(source) = self.source.take() {
            let _ = source.stop();
        }
        self.filter = None;
        self.gain = None;
        self.panner = None;
    }
}

pub fn create_voice(cue: AudioCue) -> Box<dyn Voice> {
    match cue {
        AudioCue::LeverPull => Box::new(RatchetVoice::default()),
        AudioCue::ReelSpin => Box::new(WhirrVoice::default()),
        AudioCue::ReelStop => Box::new(PluckVoice::default()),
        AudioCue::Win | AudioCue::Jackpot => Box::new(FanfareVoice::default()),
    }
}
