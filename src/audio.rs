use crate::constants::{
    KICK_DECAY_SEC, KICK_END_HZ, KICK_GAIN, KICK_PITCH_DECAY_SEC, KICK_START_HZ, MASTER_GAIN,
    SNAP_TONE_LEVEL,
};
use anyhow::anyhow;
use snap_core::ToneSpec;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

// Silence floor for exponential ramps, which cannot reach zero
const RAMP_FLOOR: f32 = 0.0001;

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(|e| anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_oscillator(
    audio_ctx: &web::AudioContext,
    kind: web::OscillatorType,
) -> anyhow::Result<web::OscillatorNode> {
    let osc = web::OscillatorNode::new(audio_ctx).map_err(|e| anyhow!("OscillatorNode error: {:?}", e))?;
    osc.set_type(kind);
    Ok(osc)
}

/// Output graph: every voice feeds one master gain into the destination.
pub struct AudioEngine {
    ctx: web::AudioContext,
    master: web::GainNode,
}

impl AudioEngine {
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow!("AudioContext error: {:?}", e))?;
        let master = create_gain(&ctx, MASTER_GAIN, "Master")?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow!("connect master: {:?}", e))?;
        log::info!("[audio] context created at {} Hz", ctx.sample_rate());
        Ok(Self { ctx, master })
    }

    #[inline]
    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }

    /// Audio clock in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.ctx.current_time()
    }

    /// Kick drum at audio time `at`: a sine dropping from 150 Hz with a
    /// short exponential tail.
    pub fn schedule_kick(&self, at: f64) {
        if let Err(e) = self.try_kick(at) {
            log::warn!("[audio] kick dropped: {}", e);
        }
    }

    fn try_kick(&self, at: f64) -> anyhow::Result<()> {
        let osc = create_oscillator(&self.ctx, web::OscillatorType::Sine)?;
        let env = create_gain(&self.ctx, 0.0, "Kick env")?;
        let freq = osc.frequency();
        _ = freq.set_value_at_time(KICK_START_HZ, at);
        _ = freq.exponential_ramp_to_value_at_time(KICK_END_HZ, at + KICK_PITCH_DECAY_SEC);
        let gain = env.gain();
        _ = gain.set_value_at_time(KICK_GAIN, at);
        _ = gain.exponential_ramp_to_value_at_time(RAMP_FLOOR, at + KICK_DECAY_SEC);
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&self.master);
        _ = osc.start_with_when(at);
        _ = osc.stop_with_when(at + KICK_DECAY_SEC + 0.05);
        Ok(())
    }

    /// One-shot snap feedback tone, starting now.
    pub fn play_tone(&self, tone: ToneSpec) {
        let result = (|| -> anyhow::Result<()> {
            let osc = create_oscillator(&self.ctx, web::OscillatorType::Triangle)?;
            osc.frequency().set_value(tone.frequency_hz);
            let env = create_gain(&self.ctx, 0.0, "Tone env")?;
            let t0 = self.now() + 0.005;
            let dur = tone.duration_sec as f64;
            let peak = (tone.gain * SNAP_TONE_LEVEL).max(RAMP_FLOOR);
            _ = env.gain().linear_ramp_to_value_at_time(peak, t0 + 0.01);
            _ = env.gain().exponential_ramp_to_value_at_time(RAMP_FLOOR, t0 + dur);
            _ = osc.connect_with_audio_node(&env);
            _ = env.connect_with_audio_node(&self.master);
            _ = osc.start_with_when(t0);
            _ = osc.stop_with_when(t0 + dur + 0.05);
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("[audio] tone dropped: {}", e);
        }
    }
}

/// Resume a suspended context. Browsers only allow this from a user gesture.
pub async fn resume(ctx: web::AudioContext) -> anyhow::Result<()> {
    let promise = ctx.resume().map_err(|e| anyhow!("resume rejected: {:?}", e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow!("resume failed: {:?}", e))?;
    match ctx.state() {
        web::AudioContextState::Running => Ok(()),
        other => Err(anyhow!("context still {:?} after resume", other)),
    }
}
