//! Pursuer and projectile lifecycle
//!
//! Spawns pursuers on a timer around the player, lets the lead pursuer shoot,
//! and turns contact into survival-time penalties. A pursuer that reaches the
//! player is moved away rather than removed.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::noise::NoiseField;
use super::projectile::Projectile;
use super::pursuer::Pursuer;
use super::state::{RoundState, SimEvent};
use crate::settings::EncounterTuning;

/// Read-only inputs the director needs each tick
#[derive(Debug, Clone, Copy)]
pub struct EncounterEnv<'a> {
    pub tuning: &'a EncounterTuning,
    pub field: &'a NoiseField,
    /// Height above terrain pursuers ride at
    pub ride_height: f32,
}

/// Owns all live pursuers and projectiles
#[derive(Debug, Clone, Default)]
pub struct EncounterDirector {
    pub pursuers: Vec<Pursuer>,
    pub projectiles: Vec<Projectile>,
    spawn_timer: f32,
    fire_timer: f32,
}

impl EncounterDirector {
    /// Drop every adversary and restart both timers
    pub fn reset(&mut self) {
        self.pursuers.clear();
        self.projectiles.clear();
        self.spawn_timer = 0.0;
        self.fire_timer = 0.0;
    }

    /// Run one tick of spawning, chasing, shooting and scoring
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        player: Vec3,
        env: &EncounterEnv<'_>,
        round: &mut RoundState,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) {
        let tuning = env.tuning;
        round.advance(dt);

        self.spawn_timer += dt;
        if self.spawn_timer > tuning.spawn_interval && self.pursuers.len() < tuning.max_pursuers {
            let angle = rng.random_range(0.0..TAU);
            let pursuer = self.spawn_pursuer(player, angle, env);
            log::debug!(
                "Pursuer {} spawned at ({:.1}, {:.1})",
                self.pursuers.len(),
                pursuer.position.x,
                pursuer.position.z
            );
            events.push(SimEvent::PursuerSpawned {
                position: pursuer.position,
            });
            self.pursuers.push(pursuer);
            self.spawn_timer = 0.0;
        }

        for (index, pursuer) in self.pursuers.iter_mut().enumerate() {
            pursuer.update(dt, player, env.field, env.ride_height);

            if pursuer.distance_to(player) < tuning.pursuer_hit_radius {
                round.penalize(tuning.pursuer_penalty);
                pursuer.position = player + tuning.pursuer_reset_offset;
                log::info!("Hit by pursuer {index}! -{}s", tuning.pursuer_penalty);
                events.push(SimEvent::PursuerHit { index });
            }
        }

        self.fire_timer += dt;
        if self.fire_timer > tuning.fire_interval {
            // Only the lead pursuer shoots
            if let Some(lead) = self.pursuers.first() {
                let muzzle = lead.position + Vec3::Y * tuning.muzzle_height;
                if let Some(shot) = Projectile::aimed(
                    muzzle,
                    player,
                    tuning.projectile_speed,
                    tuning.projectile_lifetime,
                ) {
                    events.push(SimEvent::ProjectileFired { position: muzzle });
                    self.projectiles.push(shot);
                }
                self.fire_timer = 0.0;
            }
        }

        for projectile in &mut self.projectiles {
            projectile.advance(dt);
            if projectile.try_hit(player, tuning.projectile_hit_radius) {
                round.penalize(tuning.projectile_penalty);
                log::info!("Shot! -{}s", tuning.projectile_penalty);
                events.push(SimEvent::ProjectileHit {
                    position: projectile.position,
                });
            }
        }
        self.projectiles.retain(|p| !p.is_spent());
    }

    fn spawn_pursuer(&self, player: Vec3, angle: f32, env: &EncounterEnv<'_>) -> Pursuer {
        let radius = env.tuning.spawn_radius;
        Pursuer::spawn(
            player.x + angle.cos() * radius,
            player.z + angle.sin() * radius,
            env.field,
            env.ride_height,
        )
    }

    pub fn pursuer_count(&self) -> usize {
        self.pursuers.len()
    }
}
