//! Audio-side helpers
//!
//! The simulation only publishes a desired engine intensity and a list of
//! events. Fading the engine loop and picking one-shot cues happens here, so
//! any playback backend just reads gains and cue names.

use serde::{Deserialize, Serialize};

use crate::sim::SimEvent;

/// Rate (1/s) at which the engine loop chases its target intensity
const ENGINE_FADE_RATE: f32 = 2.0;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// New round
    RoundStart,
    /// A police car joined the chase
    Siren,
    /// Pursuer rammed the player
    Crash,
    /// Lead pursuer fired
    Gunshot,
    /// Projectile struck the player
    Impact,
    /// Player scraped a building
    Bump,
}

impl SoundEffect {
    /// Cue for a simulation event
    pub fn for_event(event: &SimEvent) -> Self {
        match event {
            SimEvent::RoundStarted { .. } => Self::RoundStart,
            SimEvent::PursuerSpawned { .. } => Self::Siren,
            SimEvent::PursuerHit { .. } => Self::Crash,
            SimEvent::ProjectileFired { .. } => Self::Gunshot,
            SimEvent::ProjectileHit { .. } => Self::Impact,
            SimEvent::BuildingBumped { .. } => Self::Bump,
        }
    }

    /// Relative loudness before master volume
    pub fn base_volume(&self) -> f32 {
        match self {
            Self::RoundStart => 0.6,
            Self::Siren => 0.5,
            Self::Crash => 1.0,
            Self::Gunshot => 0.7,
            Self::Impact => 0.9,
            Self::Bump => 0.4,
        }
    }
}

/// Smoothed engine loop volume
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSound {
    /// Current intensity in [0, 1], before master volume
    current: f32,
    master_volume: f32,
    muted: bool,
}

impl Default for EngineSound {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineSound {
    pub fn new() -> Self {
        Self {
            current: 0.0,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Ease toward `target` and return the gain to play the loop at
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        let target = target.clamp(0.0, 1.0);
        let blend = 1.0 - (-ENGINE_FADE_RATE * dt.max(0.0)).exp();
        self.current += (target - self.current) * blend;
        self.gain()
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        self.current
    }

    pub fn gain(&self) -> f32 {
        self.current * self.effective_volume()
    }

    /// Gains for each cue raised by a tick, in event order
    pub fn cues(&self, events: &[SimEvent]) -> Vec<(SoundEffect, f32)> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }
        events
            .iter()
            .map(|e| {
                let effect = SoundEffect::for_event(e);
                (effect, effect.base_volume() * vol)
            })
            .collect()
    }
}
