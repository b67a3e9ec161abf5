//! Police Chase - infinite procedural terrain driving game
//!
//! Core modules:
//! - `sim`: Simulation (terrain, chunk streaming, vehicle physics, pursuers, projectiles)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `audio`: Engine sound smoothing for the audio collaborator
//! - `renderer`: GPU vertex layout for streamed chunk geometry

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec3;

/// Fixed gameplay constants that are not exposed as tuning
pub mod consts {
    /// Terrain height thresholds (below ROAD -> road, below GRASS -> grass, else dirt)
    pub const ROAD_HEIGHT_MAX: f32 = 0.5;
    pub const GRASS_HEIGHT_MAX: f32 = 3.0;

    /// Player steering rates (rad/s) before terrain scaling
    pub const STEER_SPEED: f32 = 2.2;
    pub const DRIFT_STEER_SPEED: f32 = 3.5;
    /// Turn rate factor while drifting
    pub const DRIFT_TURN_RATE: f32 = 0.7;
    /// Below this |speed| the car neither turns nor coasts
    pub const STOP_SPEED: f32 = 0.1;
    /// Rate (1/s) of the pull-back when speed exceeds the terrain cap
    pub const OVERSPEED_PULLBACK: f32 = 5.0;
    /// Cosmetic drift offset: target = steer * GAIN, approached at RATE
    pub const DRIFT_ANGLE_GAIN: f32 = 0.3;
    pub const DRIFT_ANGLE_RATE: f32 = 5.0;
    /// Per-tick decay of the drift offset when not drifting
    pub const DRIFT_ANGLE_DECAY: f32 = 0.9;
    /// Fraction of speed kept after bumping into a building
    pub const BUMP_SPEED_FACTOR: f32 = 0.2;

    /// Pursuer steering
    pub const PURSUER_TURN_RATE: f32 = 3.0;
    pub const PURSUER_SPEED_RATE: f32 = 2.0;
    pub const PURSUER_CHASE_SPEED: f32 = 18.0;
    pub const PURSUER_CLOSE_SPEED: f32 = 12.0;
    /// Beyond this distance pursuers use the chase speed
    pub const PURSUER_CHASE_DISTANCE: f32 = 30.0;
    /// Within this distance pursuers stop steering
    pub const PURSUER_ARRIVE_DISTANCE: f32 = 1.0;

    /// Engine intensity signal sent to the audio collaborator
    pub const ENGINE_INTENSITY_DRIVING: f32 = 0.8;
    pub const ENGINE_INTENSITY_IDLE: f32 = 0.2;
}

/// Wrap an angle to [-π, π]
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Unit forward vector on the XZ plane for a yaw (rotation 0 points +Z)
#[inline]
pub fn forward_vector(rotation: f32) -> Vec3 {
    Vec3::new(rotation.sin(), 0.0, rotation.cos())
}

/// Yaw that points from the origin along (dx, dz)
#[inline]
pub fn yaw_toward(dx: f32, dz: f32) -> f32 {
    dx.atan2(dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-4);
        assert!((wrap_angle(-3.0 * PI) + PI).abs() < 1e-4);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_forward_convention() {
        let f = forward_vector(0.0);
        assert!((f.z - 1.0).abs() < 1e-6 && f.x.abs() < 1e-6);
        let f = forward_vector(FRAC_PI_2);
        assert!((f.x - 1.0).abs() < 1e-6);
        assert!((yaw_toward(1.0, 0.0) - FRAC_PI_2).abs() < 1e-6);
    }
}
