//! Simulation world and round state
//!
//! Everything the simulation mutates lives in one `SimulationWorld`, owned by
//! the caller and advanced only through `tick`.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chunks::{ChunkStore, GeometrySink};
use super::collision::Building;
use super::encounter::EncounterDirector;
use super::noise::NoiseField;
use super::terrain::{Puddle, TerrainClassifier};
use super::vehicle::Vehicle;
use crate::settings::Settings;

/// Attempts to place one building clear of the player before giving up on it
const BUILDING_PLACEMENT_ATTEMPTS: usize = 16;

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the first start signal; the car does not move
    NotStarted,
    /// Clock running, pursuers spawning
    Running,
}

/// Something that happened during a tick, for audio/HUD reactions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RoundStarted { round: u32 },
    PursuerSpawned { position: Vec3 },
    PursuerHit { index: usize },
    ProjectileFired { position: Vec3 },
    ProjectileHit { position: Vec3 },
    BuildingBumped { index: usize },
}

/// Score clock for the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Seconds survived this round, minus penalties
    pub survival_time: f32,
    /// Best survival time this session
    pub high_score: f32,
    /// Rounds started this session
    pub round: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: RoundPhase::NotStarted,
            survival_time: 0.0,
            high_score: 0.0,
            round: 0,
        }
    }
}

impl RoundState {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Advance the clock and raise the high score if beaten
    pub fn advance(&mut self, dt: f32) {
        self.survival_time += dt;
        self.high_score = self.high_score.max(self.survival_time);
    }

    /// Take seconds off the clock, never below zero
    pub fn penalize(&mut self, seconds: f32) {
        self.survival_time = (self.survival_time - seconds).max(0.0);
    }

    fn begin(&mut self) {
        self.phase = RoundPhase::Running;
        self.survival_time = 0.0;
        self.round += 1;
    }
}

/// Complete simulation state
#[derive(Debug)]
pub struct SimulationWorld {
    pub settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub field: NoiseField,
    pub vehicle: Vehicle,
    pub encounters: EncounterDirector,
    pub buildings: Vec<Building>,
    pub puddles: Vec<Puddle>,
    pub chunks: ChunkStore,
    pub round: RoundState,
    /// Desired engine loudness in [0, 1] for the audio collaborator
    pub engine_intensity: f32,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
}

impl SimulationWorld {
    /// Create a world with headless chunk geometry
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.validated();
        let field = NoiseField::new(&settings.noise);
        let chunks = ChunkStore::new(settings.streaming, field);
        Self::assemble(settings, seed, field, chunks)
    }

    /// Create a world that hands chunk geometry to `sink`
    pub fn with_sink(settings: Settings, seed: u64, sink: Box<dyn GeometrySink>) -> Self {
        let settings = settings.validated();
        let field = NoiseField::new(&settings.noise);
        let chunks = ChunkStore::with_sink(settings.streaming, field, sink);
        Self::assemble(settings, seed, field, chunks)
    }

    fn assemble(settings: Settings, seed: u64, field: NoiseField, chunks: ChunkStore) -> Self {
        let vehicle = Vehicle::new(&TerrainClassifier::new(&field, &[]), &settings.vehicle);
        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            vehicle,
            encounters: EncounterDirector::default(),
            buildings: Vec::new(),
            puddles: Vec::new(),
            chunks,
            round: RoundState::default(),
            engine_intensity: 0.0,
            events: Vec::new(),
        }
    }

    /// Terrain view over this round's puddles
    pub fn classifier(&self) -> TerrainClassifier<'_> {
        TerrainClassifier::new(&self.field, &self.puddles)
    }

    /// Begin (or restart) a round: fresh layout, no adversaries, clock at zero
    pub fn start_round(&mut self) {
        self.encounters.reset();
        self.spawn_puddles();
        self.spawn_buildings();
        self.round.begin();
        self.events.push(SimEvent::RoundStarted {
            round: self.round.round,
        });
        log::info!(
            "Round {} started ({} buildings, {} puddles, best {:.1}s)",
            self.round.round,
            self.buildings.len(),
            self.puddles.len(),
            self.round.high_score
        );
    }

    fn spawn_puddles(&mut self) {
        let layout = self.settings.layout;
        self.puddles.clear();
        for _ in 0..layout.puddle_count {
            let x = self.rng.random_range(-layout.puddle_extent..=layout.puddle_extent);
            let z = self.rng.random_range(-layout.puddle_extent..=layout.puddle_extent);
            let radius = self
                .rng
                .random_range(layout.puddle_radius_min..=layout.puddle_radius_max);
            self.puddles.push(Puddle::new(Vec2::new(x, z), radius));
        }
    }

    fn spawn_buildings(&mut self) {
        let layout = self.settings.layout;
        let car_radius = self.settings.vehicle.car_radius;
        let player = self.vehicle.position;
        self.buildings.clear();

        for _ in 0..layout.building_count {
            let placed = (0..BUILDING_PLACEMENT_ATTEMPTS).find_map(|_| {
                let x = self.rng.random_range(-layout.building_extent..=layout.building_extent);
                let z = self.rng.random_range(-layout.building_extent..=layout.building_extent);
                let building = Building {
                    position: Vec3::new(x, self.field.height(x, z), z),
                    width: layout.building_width,
                    depth: layout.building_depth,
                    height: layout.building_height,
                };
                // Never wall the player in
                (!building.footprint(car_radius).contains(player.x, player.z)).then_some(building)
            });

            match placed {
                Some(building) => self.buildings.push(building),
                None => log::debug!("No clear spot for a building, skipping it"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::first_blocking;

    #[test]
    fn test_new_world_waits_for_start() {
        let world = SimulationWorld::new(Settings::default(), 1);
        assert_eq!(world.round.phase, RoundPhase::NotStarted);
        assert!(world.buildings.is_empty() && world.puddles.is_empty());
        assert_eq!(world.vehicle.position.y, world.field.height(0.0, 0.0) + 0.5);
    }

    #[test]
    fn test_start_round_builds_layout() {
        let mut world = SimulationWorld::new(Settings::default(), 42);
        world.start_round();

        assert!(world.round.is_running());
        assert_eq!(world.round.round, 1);
        assert_eq!(world.puddles.len(), 20);
        assert_eq!(world.buildings.len(), 10);
        for p in &world.puddles {
            assert!(p.center.x.abs() <= 100.0 && p.center.y.abs() <= 100.0);
            assert!((3.0..=8.0).contains(&p.radius));
        }
        for b in &world.buildings {
            assert!(b.position.x.abs() <= 50.0 && b.position.z.abs() <= 50.0);
            assert_eq!(b.position.y, world.field.height(b.position.x, b.position.z));
            assert_eq!((b.width, b.depth, b.height), (8.0, 8.0, 12.0));
        }
        let car = world.vehicle.position;
        assert_eq!(first_blocking(&world.buildings, car.x, car.z, 2.5), None);
        assert_eq!(world.events, vec![SimEvent::RoundStarted { round: 1 }]);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = SimulationWorld::new(Settings::default(), 7);
        let mut b = SimulationWorld::new(Settings::default(), 7);
        a.start_round();
        b.start_round();
        assert_eq!(a.buildings, b.buildings);
        assert_eq!(a.puddles, b.puddles);
    }

    #[test]
    fn test_bad_layout_ranges_still_start() {
        let mut settings = Settings::default();
        settings.layout.puddle_extent = -10.0;
        settings.layout.building_extent = -1.0;
        settings.layout.puddle_radius_max = f32::NAN;

        let mut world = SimulationWorld::new(settings, 3);
        world.start_round();
        assert_eq!(world.puddles.len(), 20);
        for p in &world.puddles {
            assert!(p.center.x.abs() <= 100.0 && p.center.y.abs() <= 100.0);
            assert!((3.0..=8.0).contains(&p.radius));
        }
        assert!(world.buildings.iter().all(|b| b.position.x.abs() <= 50.0));
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let mut round = RoundState::default();
        round.advance(3.0);
        round.penalize(1.0);
        assert_eq!(round.survival_time, 2.0);
        assert_eq!(round.high_score, 3.0);
        round.penalize(5.0);
        assert_eq!(round.survival_time, 0.0);
    }
}
