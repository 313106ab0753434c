//! Audio through the Web Audio API
//!
//! Every effect and the background pad are synthesized from oscillator and
//! gain nodes; no audio assets are shipped.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Fixed effect loudness; settings only toggle, never mix
const SFX_VOLUME: f32 = 0.8;
/// Steady-state loudness of the music pad
const MUSIC_VOLUME: f32 = 0.12;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Safe touch-down on a ring
    Landing,
    /// Ball dropped through a gap
    FellThrough,
    /// Kill field contact
    KillField,
    /// Run ended
    GameOver,
    /// Run started
    Start,
    /// Menu button press
    UiClick,
}

/// Sustained chord behind gameplay; held until stopped
struct MusicPad {
    oscs: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_enabled: bool,
    music_enabled: bool,
    music: Option<MusicPad>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_enabled: true,
            music_enabled: true,
            music: None,
        }
    }

    /// Resume the audio context (required after a user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Sync enabled flags with the player's settings, starting or stopping
    /// the music pad as needed
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_enabled = settings.sound_effects;
        self.music_enabled = settings.music;
        if self.music_enabled {
            self.start_music();
        } else {
            self.stop_music();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if !self.sfx_enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = SFX_VOLUME;
        match effect {
            SoundEffect::Landing => self.play_landing(ctx, vol),
            SoundEffect::FellThrough => self.play_fall(ctx, vol),
            SoundEffect::KillField => self.play_kill(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::UiClick => self.play_click(ctx, vol),
        }
    }

    // === Music pad ===

    fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Ok(gain) = ctx.create_gain() else { return };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let t = ctx.current_time();
        gain.gain().set_value(0.0);
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(MUSIC_VOLUME, t + 2.0)
            .ok();

        // A low open fifth with a slow detune shimmer on top
        let voices = [
            (55.0, OscillatorType::Sine),
            (110.0, OscillatorType::Sine),
            (164.8, OscillatorType::Triangle),
            (165.6, OscillatorType::Triangle),
        ];
        let mut oscs = Vec::with_capacity(voices.len());
        for (freq, osc_type) in voices {
            let Ok(osc) = ctx.create_oscillator() else {
                continue;
            };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                oscs.push(osc);
            }
        }

        self.music = Some(MusicPad { oscs, gain });
    }

    fn stop_music(&mut self) {
        let Some(pad) = self.music.take() else { return };
        let Some(ctx) = &self.ctx else { return };

        let t = ctx.current_time();
        pad.gain.gain().set_value_at_time(pad.gain.gain().value(), t).ok();
        pad.gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();
        for osc in &pad.oscs {
            osc.stop_with_when(t + 0.6).ok();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Landing - soft bounce thump
    fn play_landing(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.09)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.09)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Fall-through - long descending whistle
    fn play_fall(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.7)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.7)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.8).ok();
    }

    /// Kill field - harsh buzz with a sub punch
    fn play_kill(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency().set_value_at_time(380.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(140.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(320.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.12).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 45.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Game over - sad descending notes
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Start - rising whoosh
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Menu click - short tick
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.07).ok();
    }
}
