//! Terrain classification and per-category handling
//!
//! A world point is Road, Grass or Dirt by elevation, unless it lies inside a
//! puddle. Category drives both the vertex palette and the car's handling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use crate::consts::{GRASS_HEIGHT_MAX, ROAD_HEIGHT_MAX};

/// Surface category of a world point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCategory {
    Road,
    Grass,
    Dirt,
    Puddle,
}

/// How a surface modifies the player's car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handling {
    /// Scales acceleration, braking and the top speed
    pub speed_mult: f32,
    /// Scales the steering rate
    pub steer_mult: f32,
    /// Surface forces drift mode on
    pub forces_drift: bool,
}

/// Handling per category, indexed by `TerrainCategory as usize`
const HANDLING_TABLE: [Handling; 4] = [
    // Road
    Handling {
        speed_mult: 1.5,
        steer_mult: 1.2,
        forces_drift: false,
    },
    // Grass
    Handling {
        speed_mult: 0.5,
        steer_mult: 0.7,
        forces_drift: false,
    },
    // Dirt
    Handling {
        speed_mult: 0.3,
        steer_mult: 0.5,
        forces_drift: false,
    },
    // Puddle
    Handling {
        speed_mult: 0.1,
        steer_mult: 0.15,
        forces_drift: true,
    },
];

impl TerrainCategory {
    /// Fixed handling modifiers for this surface
    #[inline]
    pub const fn handling(self) -> Handling {
        HANDLING_TABLE[self as usize]
    }

    /// Category from elevation alone (puddles are applied on top)
    pub fn from_height(height: f32) -> Self {
        if height < ROAD_HEIGHT_MAX {
            TerrainCategory::Road
        } else if height < GRASS_HEIGHT_MAX {
            TerrainCategory::Grass
        } else {
            TerrainCategory::Dirt
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainCategory::Road => "Road",
            TerrainCategory::Grass => "Grass",
            TerrainCategory::Dirt => "Dirt",
            TerrainCategory::Puddle => "Puddle",
        }
    }
}

/// Vertex colors for the height bands of chunk meshes
pub mod palette {
    pub const ROAD: [f32; 3] = [0.3, 0.3, 0.3];
    pub const GRASS: [f32; 3] = [0.35, 0.55, 0.25];
    pub const DIRT: [f32; 3] = [0.45, 0.5, 0.45];
    pub const PUDDLE: [f32; 3] = [0.3, 0.5, 1.0];
}

/// Vertex color for a terrain height (puddles are drawn separately)
pub fn height_color(height: f32) -> [f32; 3] {
    match TerrainCategory::from_height(height) {
        TerrainCategory::Road => palette::ROAD,
        TerrainCategory::Grass => palette::GRASS,
        TerrainCategory::Dirt => palette::DIRT,
        TerrainCategory::Puddle => palette::PUDDLE,
    }
}

/// A circular slick that forces drift; fixed for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Puddle {
    /// Center on the XZ plane (x, z)
    pub center: Vec2,
    pub radius: f32,
}

impl Puddle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        (Vec2::new(x, z) - self.center).length() < self.radius
    }
}

/// Elevation and category at one world point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    pub height: f32,
    pub category: TerrainCategory,
}

impl TerrainSample {
    #[inline]
    pub fn handling(&self) -> Handling {
        self.category.handling()
    }
}

/// Classifies world points against the height field and the active puddles
#[derive(Debug, Clone, Copy)]
pub struct TerrainClassifier<'a> {
    field: &'a NoiseField,
    puddles: &'a [Puddle],
}

impl<'a> TerrainClassifier<'a> {
    pub fn new(field: &'a NoiseField, puddles: &'a [Puddle]) -> Self {
        Self { field, puddles }
    }

    #[inline]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.field.height(x, z)
    }

    pub fn classify(&self, x: f32, z: f32) -> TerrainSample {
        let height = self.field.height(x, z);
        let category = if self.puddles.iter().any(|p| p.contains(x, z)) {
            TerrainCategory::Puddle
        } else {
            TerrainCategory::from_height(height)
        };
        TerrainSample { height, category }
    }
}
