//! Per-frame simulation tick
//!
//! One call advances the whole world: vehicle, then encounters, then chunk
//! streaming around wherever the car ended up.

use serde::{Deserialize, Serialize};

use super::encounter::EncounterEnv;
use super::snapshot::WorldSnapshot;
use super::state::{SimEvent, SimulationWorld};
use super::terrain::TerrainClassifier;
use super::vehicle::DriveInput;
use crate::consts::{ENGINE_INTENSITY_DRIVING, ENGINE_INTENSITY_IDLE};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held driving controls
    pub drive: DriveInput,
    /// Begin a round, or restart the current one
    pub start_round: bool,
}

/// Clamp a raw frame delta into [0, max_dt]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max_dt) } else { 0.0 }
}

/// Advance the world by one frame and return a view of the result
pub fn tick<'w>(world: &'w mut SimulationWorld, input: &TickInput, dt: f32) -> WorldSnapshot<'w> {
    let dt = clamp_dt(dt, world.settings.max_dt);
    world.events.clear();

    if input.start_round {
        world.start_round();
    }

    if world.round.is_running() {
        let drive = input.drive;
        let classifier = TerrainClassifier::new(&world.field, &world.puddles);
        let step = world.vehicle.update(
            dt,
            &drive,
            &world.settings.vehicle,
            &classifier,
            &world.buildings,
        );
        if let Some(index) = step.bumped {
            world.events.push(SimEvent::BuildingBumped { index });
        }

        world.engine_intensity = if drive.is_driving() {
            ENGINE_INTENSITY_DRIVING
        } else {
            ENGINE_INTENSITY_IDLE
        };

        let env = EncounterEnv {
            tuning: &world.settings.encounter,
            field: &world.field,
            ride_height: world.settings.vehicle.ride_height,
        };
        world.encounters.advance(
            dt,
            world.vehicle.position,
            &env,
            &mut world.round,
            &mut world.rng,
            &mut world.events,
        );
    } else {
        world.engine_intensity = 0.0;
    }

    world
        .chunks
        .reconcile(world.vehicle.position.x, world.vehicle.position.z);

    world.snapshot()
}
