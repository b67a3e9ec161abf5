//! Police Chase headless driver
//!
//! Runs a scripted session against the simulation at a fixed 60 Hz and
//! prints the HUD once per simulated second.
//!
//! Usage: `police-chase [settings.json] [seconds]`

use std::time::{SystemTime, UNIX_EPOCH};

use police_chase::Settings;
use police_chase::audio::EngineSound;
use police_chase::renderer::SceneInstances;
use police_chase::sim::{
    DriveInput, SimulationWorld, TerrainCategory, TickInput, WorldSnapshot, tick,
};
use police_chase::{wrap_angle, yaw_toward};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;
const HUD_INTERVAL: f32 = 1.0;

/// Keeps the car moving and turns it away from the nearest pursuer
#[derive(Debug, Default)]
struct Autopilot {
    elapsed: f32,
}

impl Autopilot {
    fn drive(&mut self, snapshot: &WorldSnapshot<'_>, dt: f32) -> DriveInput {
        self.elapsed += dt;
        let car = snapshot.vehicle;

        let threat = snapshot
            .pursuers
            .iter()
            .map(|p| (p.position - car.position, p.distance_to(car.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let steer = match threat {
            Some((offset, distance)) if distance < 40.0 => {
                // Head directly away from it
                let away = yaw_toward(-offset.x, -offset.z);
                wrap_angle(away - car.rotation)
            }
            // Lazy weave otherwise
            _ => (self.elapsed * 0.4).sin(),
        };

        DriveInput {
            forward: true,
            backward: false,
            left: steer > 0.1,
            right: steer < -0.1,
            drift: steer.abs() > 1.2,
        }
    }
}

fn session_seed(settings: &Settings) -> u64 {
    settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    })
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    }
    .validated();
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let seed = session_seed(&settings);
    log::info!("Police Chase (headless) starting, seed {seed}, {seconds}s");

    let mut world = SimulationWorld::new(settings, seed);
    let mut autopilot = Autopilot::default();
    let mut engine = EngineSound::new();
    let mut input = TickInput {
        start_round: true,
        ..Default::default()
    };

    let mut hud_timer = 0.0;
    let mut last_terrain: Option<TerrainCategory> = None;
    let frames = (seconds / FRAME_DT).ceil() as u64;

    for _ in 0..frames {
        let snapshot = tick(&mut world, &input, FRAME_DT);
        input.start_round = false;

        let gain = engine.update(snapshot.engine_intensity, FRAME_DT);
        for (cue, volume) in engine.cues(snapshot.events) {
            log::debug!("cue {cue:?} at {volume:.2}");
        }

        let terrain = snapshot.hud.terrain;
        if last_terrain != Some(terrain) {
            log::info!("Terrain: {}", terrain.as_str());
            last_terrain = Some(terrain);
        }

        hud_timer += FRAME_DT;
        if hud_timer > HUD_INTERVAL {
            hud_timer = 0.0;
            let hud = snapshot.hud;
            let scene = SceneInstances::from_snapshot(&snapshot);
            log::info!(
                "Time: {:.1}s | Best: {:.1}s | Police: {} | Speed: {:.1}{}",
                hud.survival_time,
                hud.high_score,
                hud.pursuer_count,
                hud.player_speed,
                if hud.is_drifting { " | DRIFTING" } else { "" }
            );
            log::debug!(
                "{} chunks live, {} instances, engine gain {gain:.2}",
                snapshot.chunks.len(),
                scene.len()
            );
        }

        input.drive = autopilot.drive(&snapshot, FRAME_DT);
    }

    let hud = world.hud();
    log::info!(
        "Session over: survived {:.1}s, best {:.1}s over {} round(s)",
        hud.survival_time,
        hud.high_score,
        world.round.round
    );
    match serde_json::to_string(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Failed to serialize HUD: {e}"),
    }
}
