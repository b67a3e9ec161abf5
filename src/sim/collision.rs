//! Building collision and wall sliding
//!
//! Buildings are axis-aligned boxes. The car is treated as a point tested
//! against each footprint grown by the car radius. A blocked step reverts to
//! the pre-step position, bleeds off speed, then tries the X-only and Z-only
//! parts of the (slowed) step separately so the car slides along walls.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::BUMP_SPEED_FACTOR;

/// A static box obstacle, fixed for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Footprint center on XZ; y is the ground height at the center
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Building {
    /// Axis-aligned footprint grown by `margin` on every side
    pub fn footprint(&self, margin: f32) -> Footprint {
        let half_w = self.width / 2.0 + margin;
        let half_d = self.depth / 2.0 + margin;
        Footprint {
            min_x: self.position.x - half_w,
            max_x: self.position.x + half_w,
            min_z: self.position.z - half_d,
            max_z: self.position.z + half_d,
        }
    }
}

/// Closed XZ rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Footprint {
    #[inline]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// Index of the first building (in list order) whose grown footprint holds (x, z)
pub fn first_blocking(buildings: &[Building], x: f32, z: f32, car_radius: f32) -> Option<usize> {
    buildings
        .iter()
        .position(|b| b.footprint(car_radius).contains(x, z))
}

/// Result of one collision-checked step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Final position (y untouched)
    pub position: Vec3,
    /// Speed after any bump
    pub speed: f32,
    /// Building that blocked the full step, if any
    pub blocked_by: Option<usize>,
    /// Slide axes that were accepted after a bump
    pub slid_x: bool,
    pub slid_z: bool,
}

impl MoveResult {
    fn free(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed,
            blocked_by: None,
            slid_x: false,
            slid_z: false,
        }
    }

    pub fn collided(&self) -> bool {
        self.blocked_by.is_some()
    }
}

/// Advance `start` by `speed * dt` along `rotation`, resolving building hits
///
/// Both slide attempts start from the pre-step position, so a diagonal
/// approach into a corner can be blocked on both axes.
pub fn step_with_collision(
    start: Vec3,
    rotation: f32,
    speed: f32,
    dt: f32,
    buildings: &[Building],
    car_radius: f32,
) -> MoveResult {
    let (sin, cos) = rotation.sin_cos();
    let mut position = start;
    position.x += sin * speed * dt;
    position.z += cos * speed * dt;

    let Some(index) = first_blocking(buildings, position.x, position.z, car_radius) else {
        return MoveResult::free(position, speed);
    };

    let speed = speed * BUMP_SPEED_FACTOR;
    let mut position = start;

    let slide_x = start.x + sin * speed * dt;
    let slid_x = first_blocking(buildings, slide_x, start.z, car_radius).is_none();

    let slide_z = start.z + cos * speed * dt;
    let slid_z = first_blocking(buildings, start.x, slide_z, car_radius).is_none();

    if slid_x {
        position.x = slide_x;
    }
    if slid_z {
        position.z = slide_z;
    }

    MoveResult {
        position,
        speed,
        blocked_by: Some(index),
        slid_x,
        slid_z,
    }
}
