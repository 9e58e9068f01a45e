//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a looping music bed - no
//! external files needed!
//! Every failure is swallowed: a game without sound is still a game.

use web_sys::{
    AudioContext, AudioContextState, AudioNode, AudioParam, GainNode, OscillatorNode,
    OscillatorType,
};

use crate::audio_gate::{AudioGate, MusicCommand, MusicState};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Upward impulse
    Jump,
    /// Obstacle passed
    Score,
    /// Tier promotion
    TierUp,
    /// Run ended
    Crash,
    /// New best score
    NewBest,
}

impl SoundEffect {
    /// Sound for a game notification, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump { .. } => Some(SoundEffect::Jump),
            GameEvent::ScoreChanged { .. } => Some(SoundEffect::Score),
            GameEvent::TierChanged { .. } => Some(SoundEffect::TierUp),
            GameEvent::Collide { .. } => Some(SoundEffect::Crash),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    gate: AudioGate,
    /// Volumes and mute, kept in step with the game's settings
    settings: Settings,
    music: Option<MusicBed>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            gate: AudioGate::new(ctx.is_some(), settings.muted),
            ctx,
            settings: settings.clone(),
            music: None,
        }
    }

    /// Call from every user gesture; retries the resume until it sticks and
    /// starts the music once audio is unlocked
    pub fn on_gesture(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let running = ctx.state() == AudioContextState::Running;
        if self.gate.on_gesture(running) && ctx.resume().is_err() {
            self.gate.resume_failed();
        }
        self.sync_music();
    }

    /// Flip mute; returns the new value. Pauses or resumes the music.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.gate.toggle_mute();
        self.settings.muted = muted;
        self.sync_music();
        muted
    }

    pub fn is_muted(&self) -> bool {
        self.gate.is_muted()
    }

    /// Pick up changed volumes or mute without a reload
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        self.gate.set_muted(settings.muted);
        self.sync_music();

        if let (Some(ctx), Some(bed), MusicState::Playing) =
            (&self.ctx, &self.music, self.gate.music_state())
        {
            bed.fade_to(ctx, self.settings.effective_music_volume());
        }
    }

    fn sync_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some(command) = self.gate.sync_music() else {
            return;
        };
        let vol = self.settings.effective_music_volume();

        match command {
            MusicCommand::Start => match MusicBed::start(ctx, vol) {
                Some(bed) => {
                    log::info!("Music started");
                    self.music = Some(bed);
                }
                None => {
                    log::warn!("Failed to build music graph");
                    self.gate.music_failed();
                }
            },
            MusicCommand::Pause => {
                if let Some(bed) = &self.music {
                    bed.fade_to(ctx, 0.0);
                }
            }
            MusicCommand::Resume => {
                if let Some(bed) = &self.music {
                    bed.fade_to(ctx, vol);
                }
            }
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 || !self.gate.can_play() {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::Score => self.play_score(ctx, vol),
            SoundEffect::TierUp => self.play_tier_up(ctx, vol),
            SoundEffect::Crash => self.play_crash(ctx, vol),
            SoundEffect::NewBest => self.play_new_best(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Jump - short rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) =
            create_osc(ctx, 220.0, OscillatorType::Triangle, &ctx.destination())
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.14).ok();
    }

    /// Score - bright two-note blip
    fn play_score(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) =
            create_osc(ctx, 880.0, OscillatorType::Square, &ctx.destination())
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.12, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency().set_value_at_time(1320.0, t + 0.05).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.16).ok();
    }

    /// Tier up - ascending arpeggio
    fn play_tier_up(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [523.25, 659.25, 783.99, 1046.5]; // C5, E5, G5, C6

        for (i, &freq) in notes.iter().enumerate() {
            if let Some((osc, gain)) =
                create_osc(ctx, freq, OscillatorType::Sawtooth, &ctx.destination())
            {
                let start = t + i as f64 * 0.07;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.15, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }

    /// Crash - noisy boom with falling pitch
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Deep bass impact
        if let Some((osc, gain)) =
            create_osc(ctx, 120.0, OscillatorType::Sine, &ctx.destination())
        {
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.45)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }

        // Crackle
        if let Some((osc, gain)) =
            create_osc(ctx, 300.0, OscillatorType::Sawtooth, &ctx.destination())
        {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency().set_value_at_time(2200.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(180.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(1400.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.12).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.32).ok();
        }
    }

    /// New best - triumphant fanfare
    fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [783.99, 987.77, 1174.66, 1567.98]; // G5, B5, D6, G6

        for (i, &freq) in notes.iter().enumerate() {
            if let Some((osc, gain)) =
                create_osc(ctx, freq, OscillatorType::Triangle, &ctx.destination())
            {
                let start = t + 0.35 + i as f64 * 0.1;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.4)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.45).ok();
            }
        }
    }
}

/// Create an oscillator feeding `dest` through its own gain
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
    dest: &AudioNode,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(dest).ok()?;

    Some((osc, gain))
}

/// Low-frequency oscillator swinging `param` by +/- `depth`
fn modulate(
    ctx: &AudioContext,
    rate: f32,
    osc_type: OscillatorType,
    depth: f32,
    param: &AudioParam,
) -> Option<OscillatorNode> {
    let lfo = ctx.create_oscillator().ok()?;
    let amount = ctx.create_gain().ok()?;

    lfo.set_type(osc_type);
    lfo.frequency().set_value(rate);
    amount.gain().set_value(depth);
    lfo.connect_with_audio_node(&amount).ok()?;
    amount.connect_with_audio_param(param).ok()?;

    Some(lfo)
}

/// Looping background music: a bass drone pulsing at 120 BPM under a pad
/// that alternates A3 and C4 every two seconds. Runs until the page closes;
/// pausing fades the bus to silence.
struct MusicBed {
    bus: GainNode,
}

impl MusicBed {
    /// Fade time constant (s)
    const FADE: f64 = 0.4;

    fn start(ctx: &AudioContext, vol: f32) -> Option<Self> {
        let bus = ctx.create_gain().ok()?;
        bus.gain().set_value(0.0);
        bus.connect_with_audio_node(&ctx.destination()).ok()?;

        let (root, root_gain) = create_osc(ctx, 55.0, OscillatorType::Sine, &bus)?;
        root_gain.gain().set_value(0.5);
        let pulse = modulate(ctx, 2.0, OscillatorType::Sine, 0.3, &root_gain.gain())?;

        let (fifth, fifth_gain) = create_osc(ctx, 82.41, OscillatorType::Triangle, &bus)?;
        fifth_gain.gain().set_value(0.2);

        // Square LFO centered between A3 (220) and C4 (261.63)
        let (pad, pad_gain) = create_osc(ctx, 240.8, OscillatorType::Sawtooth, &bus)?;
        pad_gain.gain().set_value(0.06);
        let step = modulate(ctx, 0.25, OscillatorType::Square, 20.8, &pad.frequency())?;

        for osc in [&root, &pulse, &fifth, &pad, &step] {
            osc.start().ok()?;
        }

        let bed = Self { bus };
        bed.fade_to(ctx, vol);
        Some(bed)
    }

    fn fade_to(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let gain = self.bus.gain();
        gain.cancel_scheduled_values(t).ok();
        gain.set_target_at_time(vol, t, Self::FADE).ok();
    }
}
