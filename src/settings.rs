//! Game tuning and world configuration
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Noise octave parameters (the sole source of elevation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Base lattice frequency in world units
    pub scale: f32,
    /// Amplitude of each octave; octave k samples at `scale * 2^k`
    pub amplitudes: [f32; 3],
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 0.02,
            amplitudes: [5.0, 2.0, 0.5],
        }
    }
}

/// Chunk streaming parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Grid cells per chunk side
    pub chunk_size: u32,
    /// World units per grid cell
    pub tile_size: f32,
    /// Chebyshev radius (in chunks) that is always loaded
    pub render_distance: i32,
    /// Extra chunks kept beyond `render_distance` before eviction
    pub evict_margin: i32,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            tile_size: 2.0,
            render_distance: 5,
            evict_margin: 2,
        }
    }
}

impl StreamingSettings {
    /// World-space edge length of one chunk
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_size as f32 * self.tile_size
    }
}

/// Player car handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub accel: f32,
    pub brake: f32,
    pub max_speed: f32,
    pub friction: f32,
    /// Footprint expansion used against buildings
    pub car_radius: f32,
    /// Height above terrain the car rides at
    pub ride_height: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            accel: 18.0,
            brake: 25.0,
            max_speed: 25.0,
            friction: 4.0,
            car_radius: 2.5,
            ride_height: 0.5,
        }
    }
}

/// Pursuer and projectile pacing, penalties and geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    /// Seconds between pursuer spawns
    pub spawn_interval: f32,
    pub max_pursuers: usize,
    /// Distance from the player at which pursuers appear
    pub spawn_radius: f32,
    pub pursuer_hit_radius: f32,
    /// Survival seconds lost when a pursuer reaches the player
    pub pursuer_penalty: f32,
    /// Where a pursuer is moved (relative to the player) after a hit
    pub pursuer_reset_offset: Vec3,
    /// Seconds between shots from the lead pursuer
    pub fire_interval: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_hit_radius: f32,
    pub projectile_penalty: f32,
    /// Projectiles leave the pursuer this far above its position
    pub muzzle_height: f32,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 8.0,
            max_pursuers: 5,
            spawn_radius: 60.0,
            pursuer_hit_radius: 3.0,
            pursuer_penalty: 5.0,
            pursuer_reset_offset: Vec3::new(50.0, 0.0, 50.0),
            fire_interval: 2.0,
            projectile_speed: 30.0,
            projectile_lifetime: 3.0,
            projectile_hit_radius: 2.0,
            projectile_penalty: 1.0,
            muzzle_height: 1.0,
        }
    }
}

/// Per-round static layout (buildings and puddles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub building_count: usize,
    /// Buildings are placed in [-extent, extent]² around the origin
    pub building_extent: f32,
    pub building_width: f32,
    pub building_depth: f32,
    pub building_height: f32,
    pub puddle_count: usize,
    pub puddle_extent: f32,
    pub puddle_radius_min: f32,
    pub puddle_radius_max: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            building_count: 10,
            building_extent: 50.0,
            building_width: 8.0,
            building_depth: 8.0,
            building_height: 12.0,
            puddle_count: 20,
            puddle_extent: 100.0,
            puddle_radius_min: 3.0,
            puddle_radius_max: 8.0,
        }
    }
}

/// Third-person chase camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub distance: f32,
    pub height: f32,
    pub look_height: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 15.0,
            height: 6.0,
            look_height: 1.0,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for layouts and spawn angles (None = pick one at startup)
    pub seed: Option<u64>,
    /// Frame delta clamp in seconds
    pub max_dt: f32,
    pub noise: NoiseSettings,
    pub streaming: StreamingSettings,
    pub vehicle: VehicleTuning,
    pub encounter: EncounterTuning,
    pub layout: LayoutSettings,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_dt: 0.1,
            noise: NoiseSettings::default(),
            streaming: StreamingSettings::default(),
            vehicle: VehicleTuning::default(),
            encounter: EncounterTuning::default(),
            layout: LayoutSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::validated)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read settings {}: {err}; using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot run with by their defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.max_dt > 0.0) {
            log::warn!("max_dt must be positive, got {}", self.max_dt);
            self.max_dt = defaults.max_dt;
        }
        if self.streaming.chunk_size == 0 {
            log::warn!("chunk_size must be at least 1");
            self.streaming.chunk_size = defaults.streaming.chunk_size;
        }
        if !(self.streaming.tile_size > 0.0) {
            log::warn!("tile_size must be positive, got {}", self.streaming.tile_size);
            self.streaming.tile_size = defaults.streaming.tile_size;
        }
        if self.streaming.render_distance < 0 {
            log::warn!("render_distance must not be negative");
            self.streaming.render_distance = defaults.streaming.render_distance;
        }
        if self.streaming.evict_margin < 0 {
            log::warn!("evict_margin must not be negative");
            self.streaming.evict_margin = defaults.streaming.evict_margin;
        }
        if !(self.vehicle.max_speed > 0.0) {
            log::warn!("vehicle.max_speed must be positive");
            self.vehicle.max_speed = defaults.vehicle.max_speed;
        }
        let layout = &mut self.layout;
        for (name, value, default) in [
            ("building_extent", &mut layout.building_extent, defaults.layout.building_extent),
            ("puddle_extent", &mut layout.puddle_extent, defaults.layout.puddle_extent),
            ("puddle_radius_min", &mut layout.puddle_radius_min, defaults.layout.puddle_radius_min),
            ("puddle_radius_max", &mut layout.puddle_radius_max, defaults.layout.puddle_radius_max),
        ] {
            if !(value.is_finite() && *value >= 0.0) {
                log::warn!("layout.{name} must be finite and non-negative, got {value}");
                *value = default;
            }
        }
        if self.layout.puddle_radius_min > self.layout.puddle_radius_max {
            log::warn!("puddle radius range is inverted, swapping");
            std::mem::swap(
                &mut self.layout.puddle_radius_min,
                &mut self.layout.puddle_radius_max,
            );
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "seed": 7, "streaming": { "render_distance": 2 } }"#)
                .expect("valid json");
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.streaming.render_distance, 2);
        assert_eq!(settings.streaming.chunk_size, 32);
        assert_eq!(settings.vehicle, VehicleTuning::default());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = Settings::from_json(
            r#"{ "max_dt": -1.0, "streaming": { "chunk_size": 0, "render_distance": -3 } }"#,
        )
        .expect("valid json");
        assert_eq!(settings.max_dt, 0.1);
        assert_eq!(settings.streaming.chunk_size, 32);
        assert_eq!(settings.streaming.render_distance, 5);
    }

    #[test]
    fn test_negative_layout_ranges_fall_back() {
        let settings = Settings::from_json(
            r#"{ "layout": { "puddle_extent": -10.0, "building_extent": -1.0,
                 "puddle_radius_min": -2.0, "puddle_radius_max": 6.0 } }"#,
        )
        .expect("valid json");
        assert_eq!(settings.layout.puddle_extent, 100.0);
        assert_eq!(settings.layout.building_extent, 50.0);
        assert_eq!(settings.layout.puddle_radius_min, 3.0);
        assert_eq!(settings.layout.puddle_radius_max, 6.0);

        let mut direct = Settings::default();
        direct.layout.puddle_radius_max = f32::INFINITY;
        direct.layout.building_extent = f32::NAN;
        let fixed = direct.validated();
        assert_eq!(fixed.layout.puddle_radius_max, 8.0);
        assert_eq!(fixed.layout.building_extent, 50.0);
    }

    #[test]
    fn test_json_roundtrip_and_missing_file() {
        let json = Settings::default().to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("parse"), Settings::default());
        assert!(Settings::from_json("{ not json").is_err());
        assert_eq!(Settings::load("/nonexistent/police-chase.json"), Settings::default());
    }
}
