//! Web Audio playback of level-up fanfares.
//!
//! The browser keeps an `AudioContext` suspended until the page has seen a
//! user gesture, so playback resumes the context first and schedules the
//! notes once it is running.

use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use skillhud_core::audio::{FanfarePlan, Note, Waveform};
use skillhud_core::{AudioCapability, CapabilityError, OutputChannel};
use skillhud_types::AudioConfig;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, AudioNode, GainNode, OscillatorType};

/// Attack time of every note envelope
const ATTACK_SECS: f64 = 0.01;
/// Exponential ramps cannot reach zero
const SILENCE: f32 = 0.001;

/// Fanfare player routed `effects -> master -> destination`.
#[derive(Clone)]
pub struct WebAudioFanfare {
    context: AudioContext,
    master: GainNode,
    effects: GainNode,
    gain: Rc<Cell<f32>>,
}

impl WebAudioFanfare {
    /// Create the audio graph, or `None` when the browser has no Web Audio.
    pub fn probe(config: &AudioConfig) -> Option<Self> {
        match Self::build(config) {
            Ok(player) => Some(player),
            Err(e) => {
                tracing::warn!(error = ?e, "Web Audio unavailable, fanfares disabled");
                None
            }
        }
    }

    fn build(config: &AudioConfig) -> Result<Self, JsValue> {
        let context = AudioContext::new()?;
        let master = context.create_gain()?;
        let effects = context.create_gain()?;
        effects.connect_with_audio_node(&master)?;
        master.connect_with_audio_node(&context.destination())?;

        let player = Self {
            context,
            master,
            effects,
            gain: Rc::new(Cell::new(0.0)),
        };
        player.set_volume(config);
        Ok(player)
    }

    /// Apply volume settings to the mixer.
    pub fn set_volume(&self, config: &AudioConfig) {
        let master = if config.enabled {
            config.master_volume.min(100) as f32 / 100.0
        } else {
            0.0
        };
        let effects = config.effects_volume.min(100) as f32 / 100.0;
        self.master.gain().set_value(master);
        self.effects.gain().set_value(effects);
        self.gain.set(config.effective_gain());
    }

    fn output(&self, channel: OutputChannel) -> &AudioNode {
        match channel {
            OutputChannel::Master => &self.master,
            OutputChannel::Effects => &self.effects,
        }
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

fn schedule_note(
    context: &AudioContext,
    output: &AudioNode,
    waveform: Waveform,
    note: &Note,
    origin: f64,
) -> Result<(), JsValue> {
    let start = origin + note.start_secs as f64;
    let end = origin + note.end_secs() as f64;

    let envelope = context.create_gain()?;
    let gain = envelope.gain();
    gain.set_value_at_time(0.0, start)?;
    gain.linear_ramp_to_value_at_time(note.gain, start + ATTACK_SECS)?;
    gain.exponential_ramp_to_value_at_time(SILENCE, end)?;
    envelope.connect_with_audio_node(output)?;

    let osc = context.create_oscillator()?;
    osc.set_type(oscillator_type(waveform));
    osc.frequency().set_value(note.frequency_hz);
    osc.connect_with_audio_node(&envelope)?;
    osc.start_with_when(start)?;
    osc.stop_with_when(end)?;
    Ok(())
}

fn schedule_plan(context: &AudioContext, output: &AudioNode, plan: &FanfarePlan) -> Result<(), JsValue> {
    let origin = context.current_time();
    for voice in &plan.voices {
        for note in &voice.notes {
            schedule_note(context, output, voice.waveform, note, origin)?;
        }
    }
    Ok(())
}

impl AudioCapability for WebAudioFanfare {
    fn effective_gain(&self) -> f32 {
        self.gain.get()
    }

    fn play_when_ready(&self, level: i32, output: OutputChannel) -> Result<(), CapabilityError> {
        let plan = FanfarePlan::for_level(level);

        if self.context.state() != AudioContextState::Suspended {
            return schedule_plan(&self.context, self.output(output), &plan)
                .map_err(|e| CapabilityError::Failed(format!("{:?}", e)));
        }

        let resume = self
            .context
            .resume()
            .map_err(|e| CapabilityError::NotReady(format!("{:?}", e)))?;
        let player = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(resume).await {
                tracing::warn!(error = ?e, "Audio context refused to resume");
                return;
            }
            if let Err(e) = schedule_plan(&player.context, player.output(output), &plan) {
                tracing::warn!(error = ?e, level, "Failed to schedule fanfare");
            }
        });
        Ok(())
    }
}

/// Create the fanfare player at app root. `None` without Web Audio.
pub fn use_audio_provider() -> Option<WebAudioFanfare> {
    use_context_provider(|| WebAudioFanfare::probe(&AudioConfig::default()))
}

pub fn use_audio() -> Option<WebAudioFanfare> {
    use_context::<Option<WebAudioFanfare>>()
}
