//! Shots fired by pursuers
//!
//! Straight-line movers with a lifetime. A projectile that reaches the player
//! is spent immediately so it can only score once.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A live projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds left; spent at or below zero
    pub remaining_lifetime: f32,
}

impl Projectile {
    /// Aim from `muzzle` at `target`; None when they coincide
    pub fn aimed(muzzle: Vec3, target: Vec3, speed: f32, lifetime: f32) -> Option<Self> {
        let direction = (target - muzzle).normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self {
            position: muzzle,
            velocity: direction * speed,
            remaining_lifetime: lifetime,
        })
    }

    /// Move and age by one tick
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.remaining_lifetime -= dt;
    }

    /// Consume the projectile if it is within `radius` of `target`
    ///
    /// Checked once per tick after `advance`, so a shot that runs out of
    /// lifetime on the tick it arrives still lands.
    pub fn try_hit(&mut self, target: Vec3, radius: f32) -> bool {
        if self.position.distance(target) >= radius {
            return false;
        }
        self.remaining_lifetime = 0.0;
        true
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.remaining_lifetime <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aimed_and_advance() {
        let mut p = Projectile::aimed(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 30.0, 3.0)
            .expect("distinct points");
        assert!((p.velocity - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-5);

        p.advance(0.5);
        assert!((p.position.z - 15.0).abs() < 1e-5);
        assert!((p.remaining_lifetime - 2.5).abs() < 1e-6);
        assert!(!p.is_spent());

        for _ in 0..5 {
            p.advance(0.5);
        }
        assert!(p.is_spent());
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        let at = Vec3::new(4.0, 1.0, -2.0);
        assert!(Projectile::aimed(at, at, 30.0, 3.0).is_none());
    }

    #[test]
    fn test_hit_spends_projectile() {
        let mut p = Projectile {
            position: Vec3::new(1.5, 0.0, 0.0),
            velocity: Vec3::ZERO,
            remaining_lifetime: 2.0,
        };
        assert!(p.try_hit(Vec3::ZERO, 2.0));
        assert!(p.is_spent());

        let mut far = Projectile {
            position: Vec3::new(2.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
            remaining_lifetime: 2.0,
        };
        assert!(!far.try_hit(Vec3::ZERO, 2.0));
    }
}
