//! Adversary cars that seek the player
//!
//! Each tick a pursuer turns a fraction of the way toward the player and eases
//! its speed toward a chase or close-in target. No building collision.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use crate::consts::*;
use crate::{forward_vector, wrap_angle, yaw_toward};

/// A pursuing car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pursuer {
    pub position: Vec3,
    pub rotation: f32,
    pub speed: f32,
}

impl Pursuer {
    /// Stationary pursuer resting on the terrain at (x, z)
    pub fn spawn(x: f32, z: f32, field: &NoiseField, ride_height: f32) -> Self {
        Self {
            position: Vec3::new(x, field.height(x, z) + ride_height, z),
            rotation: 0.0,
            speed: 0.0,
        }
    }

    /// Steer toward `target` and advance one tick
    pub fn update(&mut self, dt: f32, target: Vec3, field: &NoiseField, ride_height: f32) {
        let to_target = target - self.position;
        let distance = to_target.length();

        // Too close to have a meaningful heading: keep coasting
        if distance > PURSUER_ARRIVE_DISTANCE {
            let desired = yaw_toward(to_target.x, to_target.z);
            let delta = wrap_angle(desired - self.rotation);
            self.rotation = wrap_angle(self.rotation + delta * PURSUER_TURN_RATE * dt);

            let desired_speed = if distance > PURSUER_CHASE_DISTANCE {
                PURSUER_CHASE_SPEED
            } else {
                PURSUER_CLOSE_SPEED
            };
            self.speed += (desired_speed - self.speed) * PURSUER_SPEED_RATE * dt;
        }

        self.position += forward_vector(self.rotation) * self.speed * dt;
        self.position.y = field.height(self.position.x, self.position.z) + ride_height;
    }

    /// 3D distance to a point
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}
