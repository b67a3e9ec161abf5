//! Player car kinematics
//!
//! Simplified arcade model: speed is a signed scalar along the heading, the
//! surface under the car scales acceleration, top speed and steering, and a
//! drift mode trades grip for a faster, looser turn.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Building, step_with_collision};
use super::terrain::{TerrainCategory, TerrainClassifier, TerrainSample};
use crate::consts::*;
use crate::settings::VehicleTuning;

/// Driver controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub drift: bool,
}

impl DriveInput {
    /// Throttle or brake held
    pub fn is_driving(&self) -> bool {
        self.forward || self.backward
    }
}

/// What one vehicle update observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleStep {
    /// Surface sampled at the start of the tick
    pub terrain: TerrainSample,
    /// Building that stopped the car this tick
    pub bumped: Option<usize>,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec3,
    /// Yaw about +Y in radians; 0 faces +Z
    pub rotation: f32,
    /// Signed speed, forward positive
    pub speed: f32,
    pub steer_angle: f32,
    /// Cosmetic heading offset for presentation only
    pub drift_angle: f32,
    pub is_drifting: bool,
    /// Surface under the car at the last update
    pub terrain: TerrainCategory,
}

impl Vehicle {
    /// At rest on the origin, resting on the terrain
    pub fn new(terrain: &TerrainClassifier<'_>, tuning: &VehicleTuning) -> Self {
        let sample = terrain.classify(0.0, 0.0);
        Self {
            position: Vec3::new(0.0, sample.height + tuning.ride_height, 0.0),
            rotation: 0.0,
            speed: 0.0,
            steer_angle: 0.0,
            drift_angle: 0.0,
            is_drifting: false,
            terrain: sample.category,
        }
    }

    /// Top speed on the given surface
    pub fn terrain_max_speed(tuning: &VehicleTuning, category: TerrainCategory) -> f32 {
        tuning.max_speed * category.handling().speed_mult
    }

    /// Advance the car by one tick
    pub fn update(
        &mut self,
        dt: f32,
        input: &DriveInput,
        tuning: &VehicleTuning,
        terrain: &TerrainClassifier<'_>,
        buildings: &[Building],
    ) -> VehicleStep {
        // Terrain-follow uses the column the car starts the tick in
        let sample = terrain.classify(self.position.x, self.position.z);
        self.position.y = sample.height + tuning.ride_height;
        self.terrain = sample.category;

        let handling = sample.handling();
        let drifting = input.drift || handling.forces_drift;
        self.is_drifting = drifting;

        let steer_speed = if drifting {
            DRIFT_STEER_SPEED
        } else {
            STEER_SPEED
        } * handling.steer_mult;

        self.integrate_speed(dt, input, tuning, handling.speed_mult);

        self.steer_angle = if input.left {
            steer_speed
        } else if input.right {
            -steer_speed
        } else {
            0.0
        };

        if self.speed.abs() > STOP_SPEED {
            let turn_rate = if drifting { DRIFT_TURN_RATE } else { 1.0 };
            self.rotation += self.steer_angle * dt * (self.speed / tuning.max_speed) * turn_rate;
        }

        if drifting {
            let target = self.steer_angle * DRIFT_ANGLE_GAIN;
            self.drift_angle += (target - self.drift_angle) * DRIFT_ANGLE_RATE * dt;
        } else {
            // Per tick, not per second
            self.drift_angle *= DRIFT_ANGLE_DECAY;
        }

        let moved = step_with_collision(
            self.position,
            self.rotation,
            self.speed,
            dt,
            buildings,
            tuning.car_radius,
        );
        self.position = moved.position;
        self.speed = moved.speed;

        VehicleStep {
            terrain: sample,
            bumped: moved.blocked_by,
        }
    }

    fn integrate_speed(
        &mut self,
        dt: f32,
        input: &DriveInput,
        tuning: &VehicleTuning,
        speed_mult: f32,
    ) {
        if input.forward {
            self.speed += tuning.accel * speed_mult * dt;
        }
        if input.backward {
            self.speed -= tuning.brake * speed_mult * dt;
        }

        if !input.is_driving() {
            // Rougher surfaces (lower speed_mult) drag harder
            let friction = tuning.friction * (2.0 - speed_mult);
            if self.speed > 0.0 {
                self.speed -= friction * dt;
            }
            if self.speed < 0.0 {
                self.speed += friction * dt;
            }
            if self.speed.abs() < STOP_SPEED {
                self.speed = 0.0;
            }
        }

        let cap = tuning.max_speed * speed_mult;
        let reverse_cap = -cap * 0.5;
        self.speed = self.speed.clamp(reverse_cap, cap);

        if self.speed > cap {
            self.speed -= (self.speed - cap) * OVERSPEED_PULLBACK * dt;
        }
        if self.speed < reverse_cap {
            self.speed -= (self.speed - reverse_cap) * OVERSPEED_PULLBACK * dt;
        }
    }

    /// Heading used for drawing: rotation plus the drift offset
    pub fn visual_heading(&self) -> f32 {
        self.rotation + self.drift_angle
    }
}
