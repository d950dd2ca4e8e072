//! Sound cues derived from simulation events
//!
//! The simulation never plays sound; it raises events. This module maps them
//! to cues and hands the cues to whatever backend the frontend provides.

use crate::settings::Settings;
use crate::sim::SimEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Jump,
    /// Pair passed
    Score,
    /// Ground or obstacle hit
    Crash,
    /// Level cleared
    LevelComplete,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &SimEvent) -> Option<Self> {
        match event {
            SimEvent::Jumped => Some(SoundEffect::Jump),
            SimEvent::Scored { .. } => Some(SoundEffect::Score),
            SimEvent::Collided(_) => Some(SoundEffect::Crash),
            SimEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            SimEvent::Started | SimEvent::ReturnToMenu => None,
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, gain: f32);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, gain: f32) {
        log::debug!("Sound {:?} at gain {:.2}", effect, gain);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volumes and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let gain = self.gain();
        if gain > 0.0 {
            self.backend.play(effect, gain);
        }
    }

    /// Play the cues for one tick's events, in order
    pub fn dispatch(&mut self, events: &[SimEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
