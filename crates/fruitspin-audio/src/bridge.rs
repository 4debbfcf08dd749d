use wasm_bindgen::prelude::*;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, AudioNode, BiquadFilterNode,
    BiquadFilterType, GainNode, OscillatorNode, OscillatorType, StereoPannerNode,
};

/// Owns the AudioContext, the master gain and a shared noise buffer.
pub struct AudioBridge {
    ctx: AudioContext,
    master_gain: GainNode,
    /// Half a second of white noise for ratchet and whirr voices.
    noise_buffer: AudioBuffer,
}

impl AudioBridge {
    pub fn new() -> Result<Self, JsValue> {
        let ctx = AudioContext::new()?;
        let master_gain = ctx.create_gain()?;
        master_gain.connect_with_audio_node(&ctx.destination())?;
        master_gain.gain().set_value(0.5);

        let sample_rate = ctx.sample_rate();
        let length = (sample_rate * 0.5) as u32;
        let noise_buffer = ctx.create_buffer(1, length, sample_rate)?;
        {
            let mut channel_data = noise_buffer.get_channel_data(0)?;
            // LCG noise, quality is irrelevant here
            let mut seed: u32 = 0xF2A1_7C3B;
            for sample in channel_data.iter_mut() {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
                *sample = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            }
            noise_buffer.copy_to_channel(&channel_data, 0)?;
        }

        Ok(Self {
            ctx,
            master_gain,
            noise_buffer,
        })
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.master_gain.gain().set_value(volume.clamp(0.0, 1.0));
    }

    /// Resume the AudioContext. Browsers keep it suspended until a user gesture.
    pub fn resume(&self) {
        let _ = self.ctx.resume();
    }

    /// Stereo panner routed to master. Voices connect into it.
    pub fn create_panner(&self, pan: f32) -> Result<StereoPannerNode, JsValue> {
        let panner = self.ctx.create_stereo_panner()?;
        panner.pan().set_value(pan.clamp(-1.0, 1.0));
        panner.connect_with_audio_node(&self.master_gain)?;
        Ok(panner)
    }

    /// Oscillator -> gain -> `output`. Returns both so the caller can shape the envelope.
    pub fn create_oscillator(
        &self,
        freq: f32,
        osc_type: OscillatorType,
        output: &AudioNode,
    ) -> Result<(OscillatorNode, GainNode), JsValue> {
        let osc = self.ctx.create_oscillator()?;
        osc.set_type(osc_type);
        osc.frequency().set_value(freq);

        let gain_node = self.ctx.create_gain()?;
        gain_node.gain().set_value(0.0);

        osc.connect_with_audio_node(&gain_node)?;
        gain_node.connect_with_audio_node(output)?;

        Ok((osc, gain_node))
    }

    /// Looping noise -> filter -> gain -> `output`.
    pub fn create_filtered_noise(
        &self,
        filter_type: BiquadFilterType,
        freq: f32,
        q: f32,
        output: &AudioNode,
    ) -> Result<(AudioBufferSourceNode, BiquadFilterNode, GainNode), JsValue> {
        let source = self.ctx.create_buffer_source()?;
        source.set_buffer(Some(&self.noise_buffer));
        source.set_loop(true);

        let filter = self.ctx.create_biquad_filter()?;
        filter.set_type(filter_type);
        filter.frequency().set_value(freq);
        filter.q().set_value(q);

        let gain_node = self.ctx.create_gain()?;
        gain_node.gain().set_value(0.0);

        source.connect_with_audio_node(&filter)?;
        filter.connect_with_audio_node(&gain_node)?;
        gain_node.connect_with_audio_node(output)?;

        Ok((source, filter, gain_node))
    }

    pub fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }
}
