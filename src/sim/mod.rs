//! Deterministic simulation module
//!
//! Terrain, the player's car, pursuers and projectiles. This module must stay
//! pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (entities update in list order)
//! - No windowing, GPU or audio dependencies

pub mod chunks;
pub mod collision;
pub mod encounter;
pub mod noise;
pub mod projectile;
pub mod pursuer;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use chunks::{
    Chunk, ChunkCoord, ChunkMesh, ChunkStore, GeometryHandle, GeometrySink, HeadlessSink,
    ReconcileStats, TerrainVertex,
};
pub use collision::{Building, Footprint, MoveResult, first_blocking, step_with_collision};
pub use encounter::{EncounterDirector, EncounterEnv};
pub use noise::NoiseField;
pub use projectile::Projectile;
pub use pursuer::Pursuer;
pub use snapshot::{ChaseCamera, HudSnapshot, WorldSnapshot};
pub use state::{RoundPhase, RoundState, SimEvent, SimulationWorld};
pub use terrain::{Handling, Puddle, TerrainCategory, TerrainClassifier, TerrainSample};
pub use tick::{TickInput, clamp_dt, tick};
pub use vehicle::{DriveInput, Vehicle, VehicleStep};
