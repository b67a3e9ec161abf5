//! Read-only view of the world after a tick
//!
//! Presentation, audio and HUD layers consume this; nothing here can mutate
//! simulation state.

use glam::Vec3;
use serde::Serialize;

use super::chunks::ChunkStore;
use super::collision::Building;
use super::noise::NoiseField;
use super::projectile::Projectile;
use super::pursuer::Pursuer;
use super::state::{RoundPhase, SimEvent, SimulationWorld};
use super::terrain::{Puddle, TerrainCategory};
use super::vehicle::Vehicle;
use crate::forward_vector;
use crate::settings::CameraSettings;

/// Numbers a HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub survival_time: f32,
    pub high_score: f32,
    pub pursuer_count: usize,
    pub player_speed: f32,
    pub is_drifting: bool,
    pub terrain: TerrainCategory,
}

/// Third-person camera trailing the car
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaseCamera {
    pub eye: Vec3,
    pub target: Vec3,
}

impl ChaseCamera {
    /// Sit behind and above the car, looking just over its roof
    pub fn follow(vehicle: &Vehicle, settings: &CameraSettings) -> Self {
        let behind = forward_vector(vehicle.rotation) * settings.distance;
        Self {
            eye: vehicle.position - behind + Vec3::Y * settings.height,
            target: vehicle.position + Vec3::Y * settings.look_height,
        }
    }
}

/// Frame-consistent borrow of everything a frame needs
#[derive(Debug, Clone, Copy)]
pub struct WorldSnapshot<'a> {
    pub phase: RoundPhase,
    pub vehicle: &'a Vehicle,
    pub pursuers: &'a [Pursuer],
    pub projectiles: &'a [Projectile],
    pub buildings: &'a [Building],
    pub puddles: &'a [Puddle],
    pub chunks: &'a ChunkStore,
    /// Height field, for placing decals on the ground
    pub field: &'a NoiseField,
    /// What happened during the tick that produced this snapshot
    pub events: &'a [SimEvent],
    pub hud: HudSnapshot,
    pub camera: ChaseCamera,
    /// Desired engine loudness in [0, 1]
    pub engine_intensity: f32,
}

impl SimulationWorld {
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            survival_time: self.round.survival_time,
            high_score: self.round.high_score,
            pursuer_count: self.encounters.pursuer_count(),
            player_speed: self.vehicle.speed,
            is_drifting: self.vehicle.is_drifting,
            terrain: self.vehicle.terrain,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            phase: self.round.phase,
            vehicle: &self.vehicle,
            pursuers: &self.encounters.pursuers,
            projectiles: &self.encounters.projectiles,
            buildings: &self.buildings,
            puddles: &self.puddles,
            chunks: &self.chunks,
            field: &self.field,
            events: &self.events,
            hud: self.hud(),
            camera: ChaseCamera::follow(&self.vehicle, &self.settings.camera),
            engine_intensity: self.engine_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_camera_trails_vehicle() {
        let world = SimulationWorld::new(Settings::default(), 3);
        let mut car = world.vehicle.clone();
        car.position = Vec3::new(10.0, 2.0, 10.0);
        car.rotation = FRAC_PI_2;

        let cam = ChaseCamera::follow(&car, &CameraSettings::default());
        // Facing +X, so the camera sits 15 back along -X
        assert!((cam.eye - Vec3::new(-5.0, 8.0, 10.0)).length() < 1e-4);
        assert_eq!(cam.target, Vec3::new(10.0, 3.0, 10.0));
    }

    #[test]
    fn test_snapshot_mirrors_world() {
        let mut world = SimulationWorld::new(Settings::default(), 3);
        world.start_round();
        world.round.survival_time = 12.5;
        world.vehicle.speed = 7.0;

        let snap = world.snapshot();
        assert_eq!(snap.phase, RoundPhase::Running);
        assert_eq!(snap.buildings.len(), world.buildings.len());
        assert_eq!(snap.puddles.len(), 20);
        assert_eq!(snap.hud.survival_time, 12.5);
        assert_eq!(snap.hud.player_speed, 7.0);
        assert_eq!(snap.hud.pursuer_count, 0);
        assert_eq!(snap.events, &[SimEvent::RoundStarted { round: 1 }]);
    }

    #[test]
    fn test_hud_serializes() {
        let world = SimulationWorld::new(Settings::default(), 3);
        let json = serde_json::to_string(&world.hud()).expect("hud serializes");
        assert!(json.contains("\"survival_time\":0.0"));
        assert!(json.contains("\"pursuer_count\":0"));
    }
}
