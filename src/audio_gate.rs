//! Audio unlock bookkeeping
//!
//! Browsers keep an `AudioContext` suspended until a user gesture. Resuming
//! can still be refused, so every gesture re-checks the context and retries
//! until it reports running. This module holds that state machine without
//! touching Web Audio so it can be tested natively, along with the transport
//! of the looping music bed.

/// Where the audio context is in its unlock lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No gesture seen yet
    AwaitingGesture,
    /// A resume was requested and not yet confirmed
    Resuming,
    /// Context confirmed running
    Running,
    /// No audio context could be created; stays here
    Unavailable,
}

/// Music bed transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    /// Never started (or the last start failed)
    Stopped,
    Playing,
    Paused,
}

/// What the audio layer must do to the music bed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCommand {
    Start,
    Pause,
    Resume,
}

#[derive(Debug, Clone)]
pub struct AudioGate {
    state: GateState,
    muted: bool,
    resume_attempts: u32,
    music: MusicState,
}

impl AudioGate {
    pub fn new(available: bool, muted: bool) -> Self {
        Self {
            state: if available {
                GateState::AwaitingGesture
            } else {
                GateState::Unavailable
            },
            muted,
            resume_attempts: 0,
            music: MusicState::Stopped,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// A user gesture happened. `context_running` is the context's observed
    /// state. Returns true when the caller should request a resume.
    pub fn on_gesture(&mut self, context_running: bool) -> bool {
        match self.state {
            GateState::Unavailable => false,
            _ if context_running => {
                if self.state != GateState::Running {
                    log::info!("Audio unlocked after {} attempt(s)", self.resume_attempts);
                }
                self.state = GateState::Running;
                false
            }
            GateState::Resuming => {
                log::warn!("Audio resume not confirmed, retrying");
                self.resume_attempts += 1;
                true
            }
            GateState::AwaitingGesture | GateState::Running => {
                // Running contexts can be suspended again by the browser
                self.state = GateState::Resuming;
                self.resume_attempts += 1;
                true
            }
        }
    }

    /// The resume request was rejected outright; wait for the next gesture
    pub fn resume_failed(&mut self) {
        if self.state != GateState::Unavailable {
            self.state = GateState::AwaitingGesture;
        }
    }

    pub fn resume_attempts(&self) -> u32 {
        self.resume_attempts
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute; returns the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Whether a sound may be attempted right now
    pub fn can_play(&self) -> bool {
        !self.muted && matches!(self.state, GateState::Running | GateState::Resuming)
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    /// Bring the music transport in line with the unlock and mute state.
    /// Call after every gesture and mute change.
    pub fn sync_music(&mut self) -> Option<MusicCommand> {
        let (next, command) = match (self.music, self.can_play()) {
            (MusicState::Stopped, true) => (MusicState::Playing, MusicCommand::Start),
            (MusicState::Playing, false) => (MusicState::Paused, MusicCommand::Pause),
            (MusicState::Paused, true) => (MusicState::Playing, MusicCommand::Resume),
            _ => return None,
        };
        self.music = next;
        Some(command)
    }

    /// Building the music graph failed; the next sync tries again
    pub fn music_failed(&mut self) {
        self.music = MusicState::Stopped;
    }
}
